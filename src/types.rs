use serde::{Deserialize, Serialize};

use crate::search::SearchOutcome;
use crate::history::HistoryEntry;

/// One search result as displayed: a card with title, watch link and
/// optional thumbnail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoCard {
    pub title: String,
    pub link: String,
    pub thumbnail: Option<String>,
}

#[derive(Debug)]
pub enum AppEvent {
    /// A search task finished. `seq` identifies the submit that started it.
    SearchFinished { seq: u64, outcome: SearchOutcome },
    HistoryLoaded(Vec<HistoryEntry>),
}
