use thiserror::Error;

use crate::telemetry::signal::Signal;

/// Errors raised while querying, encoding or persisting captured telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A payload is missing a key the export schema requires.
    #[error("{signal} request #{index}: missing field `{path}`")]
    MissingField {
        signal: Signal,
        index: usize,
        path: String,
    },

    /// A payload has the key, but not the JSON type the schema requires.
    #[error("{signal} request #{index}: `{path}` is not {expected}")]
    TypeMismatch {
        signal: Signal,
        index: usize,
        path: String,
        expected: &'static str,
    },

    /// The structured form of a request or collection could not be decoded.
    #[error("malformed structured telemetry: {0}")]
    Malformed(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raised when a test definition does not supply every contract capability.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContractError {
    #[error("test definition does not implement contract method `{0}`")]
    Unimplemented(&'static str),
}
