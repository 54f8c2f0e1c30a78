//! Search history persistence
//!
//! History is a JSON array of `{"term": ...}` objects stored under
//! `searchHistory`, newest first, bounded to `HISTORY_LIMIT` entries.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::KvStore;

pub const HISTORY_KEY: &str = "searchHistory";
pub const HISTORY_LIMIT: usize = 10;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// The query exactly as typed (case and surrounding whitespace kept)
    pub term: String,
}

/// Read history. A missing key is an empty list; unparseable data is an error.
pub async fn load(store: &dyn KvStore) -> Result<Vec<HistoryEntry>, StoreError> {
    match store.get(HISTORY_KEY).await? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

pub async fn save(store: &dyn KvStore, entries: &[HistoryEntry]) -> Result<(), StoreError> {
    store.set(HISTORY_KEY, serde_json::to_string(entries)?).await
}

/// New entry first, then the existing ones, truncated to `HISTORY_LIMIT`
pub fn prepend(existing: Vec<HistoryEntry>, term: &str) -> Vec<HistoryEntry> {
    std::iter::once(HistoryEntry { term: term.to_string() })
        .chain(existing)
        .take(HISTORY_LIMIT)
        .collect()
}

/// Record a search term and return the history as written.
///
/// Unparseable stored history is replaced. A failed read is returned as an
/// error without writing, so an unreadable store is never overwritten.
pub async fn record(store: &dyn KvStore, term: &str) -> Result<Vec<HistoryEntry>, StoreError> {
    let existing = match load(store).await {
        Ok(entries) => entries,
        Err(StoreError::Json(e)) => {
            log::warn!("[history] stored history is corrupt, starting fresh: {e}");
            Vec::new()
        }
        Err(e) => return Err(e),
    };

    let updated = prepend(existing, term);
    save(store, &updated).await?;
    Ok(updated)
}

pub async fn clear(store: &dyn KvStore) -> Result<(), StoreError> {
    save(store, &[]).await
}
