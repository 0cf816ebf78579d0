//! Metro timetable API client.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::timetable::files::{TrackFile, TrackIndexFile};

use super::error::FetchError;

/// Default base URL of the metro API.
pub const DEFAULT_BASE_URL: &str = "https://gdcj.gzmtr.com/metrogzApi/api";

/// Configuration for the metro API client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Value sent in the `Authorization` header
    pub token: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of line timetables fetched at once
    pub concurrency: usize,
    /// Pause after each line request
    pub delay: Duration,
}

impl FetchConfig {
    /// Create a new config with the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            concurrency: 1,
            delay: Duration::from_millis(200),
        }
    }

    /// Read `METRO_API_TOKEN` and, if set, `METRO_API_BASE`.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let token = lookup("METRO_API_TOKEN").filter(|t| !t.trim().is_empty())?;
        let config = Self::new(token.trim());
        Some(match lookup("METRO_API_BASE").filter(|b| !b.is_empty()) {
            Some(base) => config.with_base_url(base),
            None => config,
        })
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Client for the metro timetable API.
#[derive(Debug, Clone)]
pub struct MetroClient {
    http: reqwest::Client,
    base_url: String,
}

impl MetroClient {
    /// Create a new metro API client.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();

        let token = HeaderValue::from_str(&config.token).map_err(|_| FetchError::Api {
            status: 0,
            url: config.base_url.clone(),
            message: "Invalid token format".to_string(),
        })?;
        headers.insert(AUTHORIZATION, token);
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded; charset=UTF-8"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    pub fn track_index_url(&self) -> String {
        format!("{}/cityTrack/getSingleCityTrack?status=1", self.base_url)
    }

    pub fn track_url(&self, city_track_id: u32) -> String {
        format!(
            "{}/stationArriveTime/listByCityTrackId?cityTrackId={city_track_id}",
            self.base_url
        )
    }

    /// Fetch the list of lines.
    pub async fn fetch_track_index(&self) -> Result<TrackIndexFile, FetchError> {
        self.get_json(&self.track_index_url()).await
    }

    /// Fetch one line's stations and runs.
    pub async fn fetch_track(&self, city_track_id: u32) -> Result<TrackFile, FetchError> {
        self.get_json(&self.track_url(city_track_id)).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!(url, "requesting");
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(FetchError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Api {
                status: status.as_u16(),
                url: url.to_string(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_body(url, &body)
    }
}

/// Parse a response body. Fields the data files do not use are dropped.
pub fn parse_body<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|source| FetchError::Json {
        url: url.to_string(),
        source,
    })
}
