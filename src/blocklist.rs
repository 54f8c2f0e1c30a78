//! Query blocklist
//!
//! The blocklist is a JSON array of lowercase substrings stored under
//! `blockedTerms`. A query is blocked when its lowercased, trimmed form
//! contains any term.

use crate::error::StoreError;
use crate::store::KvStore;

pub const BLOCKLIST_KEY: &str = "blockedTerms";

/// Read the blocklist. A missing key is an empty list.
pub async fn load(store: &dyn KvStore) -> Result<Vec<String>, StoreError> {
    match store.get(BLOCKLIST_KEY).await? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

/// Read the blocklist, failing open: any read or parse error is logged and
/// treated as an empty list.
pub async fn load_or_empty(store: &dyn KvStore) -> Vec<String> {
    load(store).await.unwrap_or_else(|e| {
        log::warn!("[blocklist] failed to load blocked terms, continuing without: {e}");
        Vec::new()
    })
}

/// First term contained in the query, if any
pub fn matching_term<'a>(query: &str, terms: &'a [String]) -> Option<&'a str> {
    let lowered = query.trim().to_lowercase();
    terms
        .iter()
        .map(String::as_str)
        .filter(|t| !t.is_empty())
        .find(|t| lowered.contains(&t.to_lowercase()))
}

/// Add a term (stored lowercased and trimmed). Returns false if it was
/// already present.
pub async fn add_term(store: &dyn KvStore, term: &str) -> anyhow::Result<bool> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        anyhow::bail!("blocked term cannot be empty");
    }

    let mut terms = load(store).await?;
    if terms.iter().any(|t| *t == term) {
        return Ok(false);
    }
    terms.push(term);
    store.set(BLOCKLIST_KEY, serde_json::to_string(&terms)?).await?;
    Ok(true)
}

/// Remove a term. Returns false if it was not present.
pub async fn remove_term(store: &dyn KvStore, term: &str) -> anyhow::Result<bool> {
    let term = term.trim().to_lowercase();
    let mut terms = load(store).await?;
    let before = terms.len();
    terms.retain(|t| *t != term);
    if terms.len() == before {
        return Ok(false);
    }
    store.set(BLOCKLIST_KEY, serde_json::to_string(&terms)?).await?;
    Ok(true)
}
