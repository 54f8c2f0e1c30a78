//! vidsearch - terminal video search
//!
//! Searches the YouTube Data API from a terminal UI, refusing queries that
//! contain a locally blocklisted term and remembering the last ten searches.
//!
//! ## Architecture
//!
//! - `store`: persistent key-value store (SQLite worker or in-memory)
//! - `blocklist` / `history`: the two persisted JSON lists
//! - `youtube`: the remote search client
//! - `search`: the per-submit handler tying the above together
//! - `app` / `ui`: view state and ratatui rendering

pub mod config;
pub mod error;
pub mod types;

pub mod store;
pub mod blocklist;
pub mod history;
pub mod youtube;
pub mod search;

pub mod theme;
pub mod links;
pub mod app;
pub mod ui;

// Re-export commonly used types
pub use app::{App, InputMode};
pub use config::Config;
pub use search::{SearchOutcome, Searcher};
pub use types::{AppEvent, VideoCard};
