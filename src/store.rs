//! Persistent key-value store
//!
//! Values are JSON-encoded strings addressed by key. Two implementations:
//! - `SqliteStore`: one SQLite connection owned by a blocking worker thread,
//!   fed through a channel so callers never block the async runtime.
//! - `MemoryStore`: in-process map used by tests and one-off runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection, Statement};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tokio::task::spawn_blocking;

use crate::error::StoreError;

/// Get/set by key. Values are opaque strings (JSON by convention).
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

enum KvMsg {
    Get {
        key: String,
        resp: oneshot::Sender<Result<Option<String>, StoreError>>,
    },
    Set {
        key: String,
        value: String,
        resp: oneshot::Sender<Result<(), StoreError>>,
    },
}

#[derive(Clone)]
pub struct SqliteStore {
    tx: UnboundedSender<KvMsg>,
}

impl SqliteStore {
    /// Open (or create) the database and start the worker.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn open(db_path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "busy_timeout", 250)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv(
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
        "#,
        )?;

        let (tx, rx) = unbounded_channel::<KvMsg>();
        spawn_blocking(move || {
            if let Err(e) = run_worker(conn, rx) {
                log::error!("[store] worker stopped: {e}");
            }
        });

        log::info!("[store] opened {db_path}");
        Ok(Self { tx })
    }
}

fn run_worker(conn: Connection, mut rx: UnboundedReceiver<KvMsg>) -> Result<(), StoreError> {
    let mut stmt_get = conn.prepare("SELECT value FROM kv WHERE key = ?")?;
    let mut stmt_put = conn.prepare("INSERT OR REPLACE INTO kv(key, value) VALUES (?, ?)")?;

    while let Some(msg) = rx.blocking_recv() {
        match msg {
            KvMsg::Get { key, resp } => {
                let _ = resp.send(get_db(&mut stmt_get, &key));
            }
            KvMsg::Set { key, value, resp } => {
                let res = stmt_put
                    .execute(params![key, value])
                    .map(|_| ())
                    .map_err(StoreError::from);
                let _ = resp.send(res);
            }
        }
    }
    Ok(())
}

fn get_db(stmt: &mut Statement<'_>, key: &str) -> Result<Option<String>, StoreError> {
    let mut rows = stmt.query(params![key])?;
    if let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        return Ok(Some(value));
    }
    Ok(None)
}

#[async_trait]
impl KvStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.tx
            .send(KvMsg::Get { key: key.to_string(), resp: resp_tx })
            .map_err(|_| StoreError::WorkerGone)?;
        resp_rx.await.map_err(|_| StoreError::WorkerGone)?
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let (resp_tx, resp_rx) = oneshot::channel();
        self.tx
            .send(KvMsg::Set { key: key.to_string(), value, resp: resp_tx })
            .map_err(|_| StoreError::WorkerGone)?;
        resp_rx.await.map_err(|_| StoreError::WorkerGone)?
    }
}

/// In-memory store. Counts every `get`/`set` so callers can assert on access.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = values
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: Mutex::new(map),
            ..Self::default()
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    /// Peek at a raw value without counting it as a read
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        self.values
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value);
        Ok(())
    }
}
