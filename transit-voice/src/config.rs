//! Server configuration from the environment.

use std::net::SocketAddr;

use chrono_tz::Tz;

use crate::timetable::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, TimetableConfig};

/// Listen address when `TRANSIT_VOICE_ADDR` is unset.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Operating timezone when `TRANSIT_VOICE_TIMEZONE` is unset.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Zurich;

/// An environment variable with an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("TRANSIT_VOICE_ADDR: invalid socket address {value:?}")]
    Addr { value: String },

    #[error("TRANSIT_VOICE_TIMEZONE: unknown timezone {value:?}")]
    Timezone { value: String },

    #[error("TIMETABLE_TIMEOUT_SECS: expected whole seconds, got {value:?}")]
    Timeout { value: String },
}

/// Everything `main` needs to start serving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Address to listen on
    pub addr: SocketAddr,
    /// Zone departure times are read and spoken in
    pub timezone: Tz,
    /// Upstream timetable settings
    pub timetable: TimetableConfig,
}

impl Config {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`. Unset and blank variables
    /// take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let addr = match var("TRANSIT_VOICE_ADDR") {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|_| ConfigError::Addr { value })?,
            None => default_addr(),
        };

        let timezone = match var("TRANSIT_VOICE_TIMEZONE") {
            Some(value) => value
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigError::Timezone { value })?,
            None => DEFAULT_TIMEZONE,
        };

        let base_url = var("TIMETABLE_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match var("TIMETABLE_TIMEOUT_SECS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Timeout { value })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            addr,
            timezone,
            timetable: TimetableConfig::new()
                .with_base_url(base_url.trim())
                .with_timeout(timeout_secs),
        })
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}
