//! End-to-end search handler behavior against an in-memory store and a fake
//! search backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use vidsearch::error::SearchError;
use vidsearch::history::{self, HistoryEntry, HISTORY_KEY, HISTORY_LIMIT};
use vidsearch::blocklist::BLOCKLIST_KEY;
use vidsearch::store::MemoryStore;
use vidsearch::youtube::{parse_search_response, VideoSearch};
use vidsearch::{App, InputMode, SearchOutcome, Searcher, VideoCard};

/// Replays a canned API body through the real response parser
struct FakeSearch {
    body: serde_json::Value,
    fail: bool,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl FakeSearch {
    fn returning(body: serde_json::Value) -> Arc<Self> {
        Arc::new(Self { body, fail: false, calls: AtomicUsize::new(0), queries: Mutex::new(Vec::new()) })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            body: json!(null),
            fail: true,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoSearch for FakeSearch {
    async fn search(&self, query: &str) -> Result<Vec<VideoCard>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(SearchError::Decode("connection reset".to_string()));
        }
        parse_search_response(&self.body)
    }
}

fn cats_body() -> serde_json::Value {
    json!({
        "items": [{
            "id": { "videoId": "abc123" },
            "snippet": {
                "title": "Cats",
                "thumbnails": { "high": { "url": "https://i.ytimg.com/vi/abc123/hqdefault.jpg" } }
            }
        }]
    })
}

fn searcher(store: &Arc<MemoryStore>, client: &Arc<FakeSearch>) -> Searcher {
    Searcher::new(store.clone(), client.clone())
}

#[tokio::test]
async fn blank_query_touches_nothing() {
    let store = Arc::new(MemoryStore::new());
    let client = FakeSearch::returning(cats_body());
    let s = searcher(&store, &client);

    for q in ["", "   ", "\t\n"] {
        assert_eq!(s.run(q).await, SearchOutcome::Skipped);
    }
    assert_eq!(store.reads(), 0);
    assert_eq!(store.writes(), 0);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn blocked_query_skips_history_and_network() {
    let store = Arc::new(MemoryStore::with_values([(BLOCKLIST_KEY, r#"["great"]"#)]));
    let client = FakeSearch::returning(cats_body());
    let s = searcher(&store, &client);

    let outcome = s.run("Dogs are GREAT").await;
    assert_eq!(outcome, SearchOutcome::Blocked { term: "great".to_string() });
    assert!(!outcome.dismisses_input());
    assert_eq!(client.calls(), 0);
    assert_eq!(store.writes(), 0);
    assert_eq!(store.raw(HISTORY_KEY), None);
}

#[tokio::test]
async fn successful_search_records_history_and_returns_cards() {
    let store = Arc::new(MemoryStore::with_values([(BLOCKLIST_KEY, r#"["spoiler"]"#)]));
    let client = FakeSearch::returning(cats_body());
    let s = searcher(&store, &client);

    let outcome = s.run("  cats ").await;
    assert_eq!(
        outcome,
        SearchOutcome::Completed {
            videos: vec![VideoCard {
                title: "Cats".to_string(),
                link: "https://www.youtube.com/watch?v=abc123".to_string(),
                thumbnail: Some("https://i.ytimg.com/vi/abc123/hqdefault.jpg".to_string()),
            }]
        }
    );

    // the client sees the trimmed query, history keeps it as typed
    assert_eq!(client.queries.lock().unwrap().as_slice(), ["cats"]);
    let stored = history::load(store.as_ref()).await.unwrap();
    assert_eq!(stored, vec![HistoryEntry { term: "  cats ".to_string() }]);
}

#[tokio::test]
async fn history_grows_to_the_limit_newest_first() {
    let store = Arc::new(MemoryStore::new());
    let client = FakeSearch::returning(json!({ "items": [] }));
    let s = searcher(&store, &client);

    for i in 0..HISTORY_LIMIT + 3 {
        let term = format!("query {i}");
        s.run(&term).await;
        let stored = history::load(store.as_ref()).await.unwrap();
        assert_eq!(stored.len(), (i + 1).min(HISTORY_LIMIT));
        assert_eq!(stored[0].term, term);
    }

    let stored = history::load(store.as_ref()).await.unwrap();
    assert_eq!(stored.last().map(|e| e.term.as_str()), Some("query 3"));
}

#[tokio::test]
async fn unexpected_shape_is_an_empty_result() {
    let store = Arc::new(MemoryStore::new());
    let client = FakeSearch::returning(json!({ "error": { "code": 403, "message": "quota" } }));
    let s = searcher(&store, &client);

    let outcome = s.run("cats").await;
    assert_eq!(outcome, SearchOutcome::Completed { videos: Vec::new() });
    // history is written before the fetch, regardless of how it ends
    assert_eq!(history::load(store.as_ref()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn incomplete_items_are_dropped_in_order() {
    let store = Arc::new(MemoryStore::new());
    let client = FakeSearch::returning(json!({
        "items": [
            { "id": { "videoId": "one" }, "snippet": { "title": "One",
                "thumbnails": { "high": { "url": "https://img/1" } } } },
            { "id": { "kind": "youtube#channel" }, "snippet": { "title": "Channel",
                "thumbnails": { "high": { "url": "https://img/c" } } } },
            { "id": { "videoId": "two" }, "snippet": { "title": "Two",
                "thumbnails": { "default": { "url": "https://img/2" } } } },
            { "id": { "videoId": "three" }, "snippet": { "title": "Three",
                "thumbnails": { "high": { "url": "https://img/3" } } } }
        ]
    }));
    let s = searcher(&store, &client);

    let SearchOutcome::Completed { videos } = s.run("mixed").await else {
        panic!("expected completed search");
    };
    let titles: Vec<&str> = videos.iter().map(|v| v.title.as_str()).collect();
    assert_eq!(titles, ["One", "Three"]);
    assert_eq!(videos[1].link, "https://www.youtube.com/watch?v=three");
}

#[tokio::test]
async fn network_failure_clears_results_in_the_view() {
    let store = Arc::new(MemoryStore::new());
    let ok = searcher(&store, &FakeSearch::returning(cats_body()));
    let broken = searcher(&store, &FakeSearch::failing());

    let mut app = App::new(30, Default::default());
    app.set_query("cats".to_string());
    let (seq, q) = app.submit().unwrap();
    app.apply_outcome(seq, ok.run(&q).await);
    assert_eq!(app.videos().len(), 1);
    assert_eq!(app.input_mode(), InputMode::Browse);

    app.focus_input();
    let (seq, q) = app.submit().unwrap();
    let outcome = broken.run(&q).await;
    assert!(matches!(outcome, SearchOutcome::Failed { .. }));
    app.apply_outcome(seq, outcome);
    assert!(app.videos().is_empty());
    // no cards to move to, so the search box keeps focus
    assert_eq!(app.input_mode(), InputMode::Editing);
}

#[tokio::test]
async fn unreadable_blocklist_fails_open() {
    let store = Arc::new(MemoryStore::with_values([(BLOCKLIST_KEY, "not json")]));
    let client = FakeSearch::returning(cats_body());
    let s = searcher(&store, &client);

    assert!(matches!(s.run("cats").await, SearchOutcome::Completed { .. }));
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn blocked_search_keeps_current_results() {
    let store = Arc::new(MemoryStore::with_values([(BLOCKLIST_KEY, r#"["dogs"]"#)]));
    let client = FakeSearch::returning(cats_body());
    let s = searcher(&store, &client);

    let mut app = App::new(30, Default::default());
    app.set_query("cats".to_string());
    let (seq, q) = app.submit().unwrap();
    app.apply_outcome(seq, s.run(&q).await);
    assert_eq!(app.videos()[0].link, "https://www.youtube.com/watch?v=abc123");

    app.focus_input();
    app.set_query("dogs are great".to_string());
    let (seq, q) = app.submit().unwrap();
    app.apply_outcome(seq, s.run(&q).await);

    assert_eq!(app.input_mode(), InputMode::BlockedDialog);
    assert_eq!(app.videos().len(), 1);
    assert_eq!(client.calls(), 1);
    let stored = history::load(store.as_ref()).await.unwrap();
    assert_eq!(stored, vec![HistoryEntry { term: "cats".to_string() }]);
}
