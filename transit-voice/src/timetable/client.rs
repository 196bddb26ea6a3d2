//! Timetable HTTP client.
//!
//! Async access to the stationboard, connections and locations endpoints.
//! One request per call, bounded by the configured timeout; nothing is
//! retried or cached.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::TimetableError;
use super::types::{ConnectionsResponse, LocationsResponse, StationboardResponse};
use super::{ConnectionsQuery, LocationsQuery, StationboardQuery, Timetable};

/// Default base URL of the timetable API.
pub const DEFAULT_BASE_URL: &str = "http://transport.opendata.ch/v1";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Upstream datetime format for `/stationboard`.
const BOARD_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Configuration for the timetable client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TimetableConfig {
    /// Production endpoint with the default timeout.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Timetable API client.
#[derive(Debug, Clone)]
pub struct TimetableClient {
    http: reqwest::Client,
    base_url: String,
}

impl TimetableClient {
    /// Create a client with the given configuration.
    pub fn new(config: TimetableConfig) -> Result<Self, TimetableError> {
        if config.base_url.is_empty() {
            return Err(TimetableError::NotConfigured("empty base URL".into()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// GET `{base_url}/{endpoint}` and decode the JSON body.
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, TimetableError> {
        let url = format!("{}/{endpoint}", self.base_url);
        let request = self.http.get(&url).query(params).build()?;
        debug!(url = %request.url(), "timetable request");

        let response = self.http.execute(request).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TimetableError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| TimetableError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

fn stationboard_params(query: &StationboardQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("station", query.station.clone())];
    if let Some(limit) = query.limit {
        params.push(("limit", limit.to_string()));
    }
    if let Some(at) = query.datetime {
        params.push(("datetime", at.format(BOARD_DATETIME_FORMAT).to_string()));
    }
    params
}

fn connections_params(query: &ConnectionsQuery) -> Vec<(&'static str, String)> {
    let mut params = vec![("from", query.from.clone()), ("to", query.to.clone())];
    if let Some(limit) = query.limit {
        params.push(("limit", limit.to_string()));
    }
    if let Some(at) = query.datetime {
        params.push(("date", at.format("%Y-%m-%d").to_string()));
        params.push(("time", at.format("%H:%M").to_string()));
    }
    params
}

fn locations_params(query: &LocationsQuery) -> Vec<(&'static str, String)> {
    vec![
        ("x", query.latitude.to_string()),
        ("y", query.longitude.to_string()),
    ]
}

impl Timetable for TimetableClient {
    async fn stationboard(
        &self,
        query: &StationboardQuery,
    ) -> Result<StationboardResponse, TimetableError> {
        self.get("stationboard", &stationboard_params(query)).await
    }

    async fn connections(
        &self,
        query: &ConnectionsQuery,
    ) -> Result<ConnectionsResponse, TimetableError> {
        self.get("connections", &connections_params(query)).await
    }

    async fn locations(&self, query: &LocationsQuery) -> Result<LocationsResponse, TimetableError> {
        self.get("locations", &locations_params(query)).await
    }
}
