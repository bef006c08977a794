//! Error types for waypoint-core

use thiserror::Error;

/// Main error type for the waypoint-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A trip-level date that could not be parsed
    #[error("invalid {field}: {value:?}")]
    InvalidDate { field: &'static str, value: String },

    /// Trip start falls after trip end
    #[error("trip starts on {start} but ends on {end}")]
    InvalidDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    /// Unrecognized enum value (status, item kind, transport mode, ...)
    #[error("unknown {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },

    /// Trip status change not allowed by the status lifecycle
    #[error("cannot move trip from {from} to {to}")]
    InvalidTransition {
        from: crate::types::TripStatus,
        to: crate::types::TripStatus,
    },
}

/// Result type alias for waypoint-core
pub type Result<T> = std::result::Result<T, Error>;
