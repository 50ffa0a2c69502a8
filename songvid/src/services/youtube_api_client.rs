//! YouTube Data API search client
//!
//! Alternative to shelling out to yt-dlp for search. Needs an API key; every
//! `search.list` call costs quota, so requests are spaced by a minimum interval.

use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::models::SearchReference;
use crate::types::{SearchError, SearchProvider};

const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";
const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";
const USER_AGENT: &str = concat!("songvid/", env!("CARGO_PKG_VERSION"));
const RATE_LIMIT_MS: u64 = 250;
const API_KEY_HEADER: &str = "X-goog-api-key";

/// `search.list` response (only the fields we read)
#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

/// Spaces out `search.list` calls across concurrent songs
struct QuotaPacer {
    previous_call: Mutex<Option<Instant>>,
    spacing: Duration,
}

impl QuotaPacer {
    fn new(spacing: Duration) -> Self {
        Self {
            previous_call: Mutex::new(None),
            spacing,
        }
    }

    /// Hold the caller until `spacing` has passed since the previous call
    async fn pace(&self) {
        let mut previous = self.previous_call.lock().await;

        if let Some(wait) = (*previous).and_then(|at| self.spacing.checked_sub(at.elapsed())) {
            tracing::debug!(wait_ms = wait.as_millis() as u64, "Pacing YouTube API call");
            tokio::time::sleep(wait).await;
        }

        *previous = Some(Instant::now());
    }
}

/// YouTube Data API v3 client
pub struct YouTubeApiClient {
    http_client: reqwest::Client,
    api_key: String,
    search_url: String,
    pacer: QuotaPacer,
}

impl YouTubeApiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, SearchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SearchError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            search_url: YOUTUBE_SEARCH_URL.to_string(),
            pacer: QuotaPacer::new(Duration::from_millis(RATE_LIMIT_MS)),
        })
    }

    /// Point at a different `search` endpoint
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }
}

#[async_trait::async_trait]
impl SearchProvider for YouTubeApiClient {
    fn name(&self) -> &'static str {
        "youtube-api"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchReference>, SearchError> {
        self.pacer.pace().await;

        tracing::debug!(query = %query, "Querying YouTube Data API");

        let max_results = max_results.clamp(1, 50).to_string();
        let response = self
            .http_client
            .get(&self.search_url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .query(&[
                ("part", "id"),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("q", query),
            ])
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError(status.as_u16(), error_text));
        }

        let body = response.text().await.map_err(network_error)?;

        parse_search_response(&body)
    }
}

/// Request URLs never end up in error text
fn network_error(e: reqwest::Error) -> SearchError {
    SearchError::NetworkError(e.without_url().to_string())
}

/// Extract video references from a `search.list` body, in rank order
fn parse_search_response(body: &str) -> Result<Vec<SearchReference>, SearchError> {
    let response: SearchListResponse =
        serde_json::from_str(body).map_err(|e| SearchError::ParseError(e.to_string()))?;

    Ok(response
        .items
        .into_iter()
        .filter_map(|item| item.id.video_id)
        .map(|id| SearchReference::new(format!("{}{}", WATCH_URL_PREFIX, id)))
        .collect())
}
