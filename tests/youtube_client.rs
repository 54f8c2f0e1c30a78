//! YouTube client against a local mock server

use std::net::TcpListener;
use std::thread;
use std::time::{Duration, Instant};

use mockito::{Matcher, Server};

use vidsearch::error::SearchError;
use vidsearch::youtube::{VideoSearch, YouTubeClient};

fn search_params(q: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("part".into(), "snippet".into()),
        Matcher::UrlEncoded("q".into(), q.into()),
        Matcher::UrlEncoded("type".into(), "video".into()),
        Matcher::UrlEncoded("maxResults".into(), "6".into()),
        Matcher::UrlEncoded("key".into(), "test-key".into()),
    ])
}

#[tokio::test]
async fn sends_fixed_parameters_and_maps_items() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(search_params("cats & dogs"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"items":[
                {"id":{"videoId":"abc123"},"snippet":{"title":"Cats and dogs",
                 "thumbnails":{"high":{"url":"https://i.ytimg.com/vi/abc123/hqdefault.jpg"}}}},
                {"id":{"videoId":"nothumb"},"snippet":{"title":"No thumbnail"}}
            ]}"#,
        )
        .create_async()
        .await;

    let client = YouTubeClient::new(&server.url(), "test-key", 2000).unwrap();
    let videos = client.search("cats & dogs").await.unwrap();

    mock.assert_async().await;
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].title, "Cats and dogs");
    assert_eq!(videos[0].link, "https://www.youtube.com/watch?v=abc123");
}

#[tokio::test]
async fn error_body_is_an_unexpected_shape() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"code":403,"message":"quotaExceeded"}}"#)
        .create_async()
        .await;

    let client = YouTubeClient::new(&server.url(), "test-key", 2000).unwrap();
    let err = client.search("cats").await.unwrap_err();
    assert!(matches!(err, SearchError::UnexpectedShape(_)), "got {err:?}");
}

#[tokio::test]
async fn items_that_are_not_an_array_are_rejected() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"items":{"id":"x"}}"#)
        .create_async()
        .await;

    let client = YouTubeClient::new(&server.url(), "test-key", 2000).unwrap();
    let err = client.search("cats").await.unwrap_err();
    assert!(matches!(err, SearchError::UnexpectedShape(_)));
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let client = YouTubeClient::new(&server.url(), "test-key", 2000).unwrap();
    let err = client.search("cats").await.unwrap_err();
    assert!(matches!(err, SearchError::Decode(_)));
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    // nothing listens on the discard port
    let client = YouTubeClient::new("http://127.0.0.1:9", "test-key", 1000).unwrap();
    let err = client.search("cats").await.unwrap_err();
    assert!(matches!(err, SearchError::Http(_)));
}

#[tokio::test]
async fn silent_server_times_out_as_a_network_error() {
    // accepts connections but never answers
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().flatten() {
            held.push(stream);
        }
    });

    let client = YouTubeClient::new(&format!("http://{addr}"), "test-key", 1000).unwrap();
    let started = Instant::now();
    let err = client.search("cats").await.unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(err, SearchError::Http(ref e) if e.is_timeout()), "got {err:?}");
    assert!(elapsed >= Duration::from_millis(900), "gave up after {elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "took {elapsed:?}");
}

#[test]
fn blank_api_key_is_rejected() {
    assert!(matches!(
        YouTubeClient::new("https://example.test", "  ", 1000),
        Err(SearchError::MissingApiKey)
    ));
}
