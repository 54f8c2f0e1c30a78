//! YouTube Data API search client
//!
//! Issues a single `GET <api_url>/search` per query and maps the response's
//! `items` array into `VideoCard`s. Items missing a video id, title or high
//! resolution thumbnail are dropped.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::SearchError;
use crate::types::VideoCard;

pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const MAX_RESULTS: u32 = 6;
pub const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Anything that can turn a query into result cards
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<VideoCard>, SearchError>;
}

pub struct YouTubeClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    timeout: Duration,
}

impl YouTubeClient {
    pub fn new(api_url: &str, api_key: &str, timeout_ms: u64) -> Result<Self, SearchError> {
        if api_key.trim().is_empty() {
            return Err(SearchError::MissingApiKey);
        }
        let http = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout: Duration::from_millis(timeout_ms),
        })
    }

    /// Full request URL. Contains the credential, so never log it.
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?part=snippet&q={}&type=video&maxResults={}&key={}",
            self.api_url,
            urlencoding::encode(query),
            MAX_RESULTS,
            urlencoding::encode(&self.api_key),
        )
    }
}

#[async_trait]
impl VideoSearch for YouTubeClient {
    async fn search(&self, query: &str) -> Result<Vec<VideoCard>, SearchError> {
        log::info!("[youtube] searching for {query:?}");

        let response = self
            .http
            .get(self.search_url(query))
            .timeout(self.timeout)
            .send()
            .await?;

        // Error bodies carry no `items`, so they fall through to the shape check
        let status = response.status();
        if !status.is_success() {
            log::warn!("[youtube] API responded with {status}");
        }

        let body = response.text().await?;
        let data: Value =
            serde_json::from_str(&body).map_err(|e| SearchError::Decode(e.to_string()))?;

        let cards = parse_search_response(&data)?;
        log::info!("[youtube] {} usable results", cards.len());
        Ok(cards)
    }
}

/// Map a search response body into cards, preserving item order
pub fn parse_search_response(data: &Value) -> Result<Vec<VideoCard>, SearchError> {
    let items = data
        .get("items")
        .and_then(Value::as_array)
        .ok_or_else(|| SearchError::UnexpectedShape(preview(data, 200)))?;

    Ok(items.iter().filter_map(card_from_item).collect())
}

fn card_from_item(item: &Value) -> Option<VideoCard> {
    let video_id = non_empty_str(item.pointer("/id/videoId"))?;
    let title = non_empty_str(item.pointer("/snippet/title"))?;
    let thumbnail = non_empty_str(item.pointer("/snippet/thumbnails/high/url"))?;

    Some(VideoCard {
        title: title.to_string(),
        link: watch_link(video_id),
        thumbnail: Some(thumbnail.to_string()),
    })
}

fn non_empty_str(v: Option<&Value>) -> Option<&str> {
    v.and_then(Value::as_str).filter(|s| !s.is_empty())
}

pub fn watch_link(video_id: &str) -> String {
    format!("{WATCH_URL_PREFIX}{video_id}")
}

fn preview(data: &Value, max_chars: usize) -> String {
    let s = data.to_string();
    if s.chars().count() <= max_chars {
        s
    } else {
        let cut: String = s.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}
