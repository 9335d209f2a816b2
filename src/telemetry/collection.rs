use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::request::{Headers, Request};
use super::schema::{self, ExportSchema};
use super::signal::Signal;
use crate::error::TelemetryError;

/// Every log, metric and trace export request received during a single
/// script run, each list in arrival order. Handed to `OtelTest::on_stop`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Telemetry {
    #[serde(default)]
    log_requests: Vec<Request>,
    #[serde(default)]
    metric_requests: Vec<Request>,
    #[serde(default)]
    trace_requests: Vec<Request>,
}

impl Telemetry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded collection, used when rebuilding a run from persisted data.
    pub fn from_requests(
        log_requests: Vec<Request>,
        metric_requests: Vec<Request>,
        trace_requests: Vec<Request>,
    ) -> Self {
        Self {
            log_requests,
            metric_requests,
            trace_requests,
        }
    }

    pub fn add(&mut self, signal: Signal, message: Value, headers: Headers, test_elapsed_ms: u64) {
        let request = Request::new(message, headers, test_elapsed_ms);
        match signal {
            Signal::Log => self.log_requests.push(request),
            Signal::Metric => self.metric_requests.push(request),
            Signal::Trace => self.trace_requests.push(request),
        }
    }

    pub fn add_log(&mut self, log: Value, headers: Headers, test_elapsed_ms: u64) {
        self.add(Signal::Log, log, headers, test_elapsed_ms);
    }

    pub fn add_metric(&mut self, metric: Value, headers: Headers, test_elapsed_ms: u64) {
        self.add(Signal::Metric, metric, headers, test_elapsed_ms);
    }

    pub fn add_trace(&mut self, trace: Value, headers: Headers, test_elapsed_ms: u64) {
        self.add(Signal::Trace, trace, headers, test_elapsed_ms);
    }

    pub fn requests(&self, signal: Signal) -> &[Request] {
        match signal {
            Signal::Log => &self.log_requests,
            Signal::Metric => &self.metric_requests,
            Signal::Trace => &self.trace_requests,
        }
    }

    pub fn get_log_requests(&self) -> &[Request] {
        &self.log_requests
    }

    pub fn get_metric_requests(&self) -> &[Request] {
        &self.metric_requests
    }

    pub fn get_trace_requests(&self) -> &[Request] {
        &self.trace_requests
    }

    /// Number of requests (not data points) received for `signal`.
    pub fn len(&self, signal: Signal) -> usize {
        self.requests(signal).len()
    }

    pub fn is_empty(&self) -> bool {
        Signal::ALL.iter().all(|s| self.requests(*s).is_empty())
    }

    /// Total metric data points across all metric requests.
    pub fn num_metrics(&self) -> Result<usize, TelemetryError> {
        self.count(Signal::Metric)
    }

    pub fn metric_names(&self) -> Result<BTreeSet<String>, TelemetryError> {
        self.names(Signal::Metric)
    }

    pub fn num_spans(&self) -> Result<usize, TelemetryError> {
        self.count(Signal::Trace)
    }

    pub fn span_names(&self) -> Result<BTreeSet<String>, TelemetryError> {
        self.names(Signal::Trace)
    }

    pub fn num_log_records(&self) -> Result<usize, TelemetryError> {
        self.count(Signal::Log)
    }

    /// True if any trace request arrived with `key` set to exactly `expected`.
    pub fn has_trace_header(&self, key: &str, expected: &str) -> bool {
        self.trace_requests
            .iter()
            .any(|req| req.get_header(key) == Some(expected))
    }

    fn count(&self, signal: Signal) -> Result<usize, TelemetryError> {
        schema::count_leaves(signal, self.requests(signal), ExportSchema::for_signal(signal))
            .map_err(|e| {
                warn!("Telemetry query failed: {}", e);
                e
            })
    }

    fn names(&self, signal: Signal) -> Result<BTreeSet<String>, TelemetryError> {
        schema::collect_names(signal, self.requests(signal), ExportSchema::for_signal(signal))
            .map_err(|e| {
                warn!("Telemetry query failed: {}", e);
                e
            })
    }

    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        for signal in Signal::ALL {
            let requests = self.requests(signal).iter().map(Request::to_value).collect();
            out.insert(signal.requests_key().to_string(), Value::Array(requests));
        }
        Value::Object(out)
    }

    /// Pretty-printed (two-space indent); this is also the on-disk report.
    pub fn to_json(&self) -> Result<String, TelemetryError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rebuilds a collection from its structured form. Absent request lists
    /// come back empty.
    pub fn from_value(value: Value) -> Result<Self, TelemetryError> {
        serde_json::from_value(value).map_err(|e| TelemetryError::Malformed(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, TelemetryError> {
        serde_json::from_str(json).map_err(|e| TelemetryError::Malformed(e.to_string()))
    }
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
