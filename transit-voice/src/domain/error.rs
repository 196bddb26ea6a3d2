//! Domain error types.
//!
//! These errors mean the upstream data contract changed in a way the
//! normalizer cannot safely guess around. They are distinct from API/IO
//! errors, which never reach the domain layer.

/// Errors raised while normalizing a raw departure record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// Delay field is neither empty, the unknown marker, nor a number
    #[error("invalid delay {value:?}: expected empty, \"X\" or whole minutes")]
    Delay { value: String },

    /// Departure time could not be resolved to a point in time
    #[error("unresolvable departure time {value:?}")]
    Timestamp { value: String },

    /// Record carries neither a time string nor an epoch timestamp
    #[error("departure has neither a time nor a timestamp")]
    MissingTimestamp,
}
