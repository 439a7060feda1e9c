//! HTTP client for the camera backend API.
//!
//! Every call reports one of three failure kinds: the request never reached
//! the backend, the backend answered with a non-2xx status, or the body was
//! not the JSON we expected.

use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::protocol::{ConfigAck, ConfigUpdate, Episode, StatusSnapshot, SystemEvent};

pub const STATUS_PATH: &str = "/api/status";
pub const EPISODES_PATH: &str = "/api/episodes";
pub const EVENTS_PATH: &str = "/api/events";
pub const CONFIG_PATH: &str = "/api/config";
pub const STREAM_PATH: &str = "/video_feed";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error! status: {0}")]
    HttpStatus(u16),
    #[error("invalid response body: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Query for the episodes listing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeQuery {
    pub limit: u32,
    pub motion_only: bool,
}

impl Default for EpisodeQuery {
    fn default() -> Self {
        Self {
            limit: 5,
            motion_only: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying reqwest client, shared with the stream monitor.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// URL of the video feed.  `cache_buster` (epoch millis) forces the
    /// backend and any intermediary to treat the request as new.
    pub fn stream_url(&self, path: &str, cache_buster: Option<i64>) -> String {
        match cache_buster {
            Some(t) => format!("{}{}?t={}", self.base_url, path, t),
            None => self.url(path),
        }
    }

    pub async fn status(&self) -> Result<StatusSnapshot, ApiError> {
        let response = self.http.get(self.url(STATUS_PATH)).send().await?;
        read_json(response).await
    }

    pub async fn episodes(&self, query: EpisodeQuery) -> Result<Vec<Episode>, ApiError> {
        let response = self
            .http
            .get(self.url(EPISODES_PATH))
            .query(&[
                ("limit", query.limit.to_string()),
                ("motion_only", query.motion_only.to_string()),
            ])
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn events(&self, limit: u32) -> Result<Vec<SystemEvent>, ApiError> {
        let response = self
            .http
            .get(self.url(EVENTS_PATH))
            .query(&[("limit", limit.to_string())])
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn update_config(&self, update: &ConfigUpdate) -> Result<ConfigAck, ApiError> {
        let body = serde_json::to_vec(update)?;
        let response = self
            .http
            .post(self.url(CONFIG_PATH))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        debug!("[api] {} -> {}", response.url().path(), status);
        return Err(ApiError::HttpStatus(status.as_u16()));
    }
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}
