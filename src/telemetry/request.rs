use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::TelemetryError;

/// Transport headers as received (names are not case-folded).
pub type Headers = BTreeMap<String, String>;

/// One export request received from the script under test: the decoded
/// message, the transport headers it arrived with, and the time elapsed
/// between the start of the test and its receipt.
///
/// Write-once: there are no setters, only accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Request {
    #[serde(rename = "request")]
    message: Value,
    headers: Headers,
    test_elapsed_ms: u64,
}

impl Request {
    /// No validation happens here; a message that does not follow the export
    /// schema is only rejected later, by the traversing queries on `Telemetry`.
    pub fn new(message: Value, headers: Headers, test_elapsed_ms: u64) -> Self {
        Self {
            message,
            headers,
            test_elapsed_ms,
        }
    }

    pub fn message(&self) -> &Value {
        &self.message
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn test_elapsed_ms(&self) -> u64 {
        self.test_elapsed_ms
    }

    /// Case-sensitive header lookup.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn to_value(&self) -> Value {
        json!({
            "request": self.message,
            "headers": self.headers,
            "test_elapsed_ms": self.test_elapsed_ms,
        })
    }

    pub fn to_json(&self) -> Result<String, TelemetryError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Rebuilds a request from its structured form. All three keys are
    /// required and no others are accepted.
    pub fn from_value(value: Value) -> Result<Self, TelemetryError> {
        serde_json::from_value(value).map_err(|e| TelemetryError::Malformed(e.to_string()))
    }
}
