//! The search handler: blocklist check, history write, remote fetch.
//!
//! Every failure in here is recovered locally; callers only ever see a
//! `SearchOutcome`.

use std::sync::Arc;

use crate::blocklist;
use crate::error::SearchError;
use crate::history;
use crate::store::KvStore;
use crate::types::VideoCard;
use crate::youtube::VideoSearch;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was blank; nothing was read, written or fetched
    Skipped,
    /// The query contains a blocked term; no history write, no fetch
    Blocked { term: String },
    /// Results to display (possibly empty)
    Completed { videos: Vec<VideoCard> },
    /// The fetch failed; displayed results should be cleared
    Failed { error: String },
}

impl SearchOutcome {
    /// Whether the view should drop input focus (the fetch ran to completion)
    pub fn dismisses_input(&self) -> bool {
        matches!(self, SearchOutcome::Completed { .. } | SearchOutcome::Failed { .. })
    }
}

#[derive(Clone)]
pub struct Searcher {
    store: Arc<dyn KvStore>,
    client: Arc<dyn VideoSearch>,
}

impl Searcher {
    pub fn new(store: Arc<dyn KvStore>, client: Arc<dyn VideoSearch>) -> Self {
        Self { store, client }
    }

    pub fn store(&self) -> &Arc<dyn KvStore> {
        &self.store
    }

    pub async fn run(&self, raw_query: &str) -> SearchOutcome {
        let query = raw_query.trim();
        if query.is_empty() {
            return SearchOutcome::Skipped;
        }

        let terms = blocklist::load_or_empty(self.store.as_ref()).await;
        if let Some(term) = blocklist::matching_term(query, &terms) {
            log::info!("[search] blocked query (matched {term:?})");
            return SearchOutcome::Blocked { term: term.to_string() };
        }

        // Best effort: a history failure never stops the search
        if let Err(e) = history::record(self.store.as_ref(), raw_query).await {
            log::error!("[search] failed to save search history: {e}");
        }

        match self.client.search(query).await {
            Ok(videos) => SearchOutcome::Completed { videos },
            Err(SearchError::UnexpectedShape(body)) => {
                log::warn!("[search] unexpected API response: {body}");
                SearchOutcome::Completed { videos: Vec::new() }
            }
            Err(e) => {
                log::error!("[search] video search error: {e}");
                SearchOutcome::Failed { error: e.to_string() }
            }
        }
    }
}
