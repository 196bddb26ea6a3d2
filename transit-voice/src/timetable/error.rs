//! Timetable client error types.

/// Errors from a timetable collaborator.
#[derive(Debug, thiserror::Error)]
pub enum TimetableError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        /// Start of the offending body
        body: Option<String>,
    },

    /// API returned an error status code
    #[error("timetable API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Client could not be configured
    #[error("not configured: {0}")]
    NotConfigured(String),
}
