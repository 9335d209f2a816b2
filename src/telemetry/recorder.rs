use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{debug, info};

use super::collection::Telemetry;
use super::request::Headers;
use super::signal::Signal;

/// Shared append handle for the receiving side of a test run.
///
/// Clones point at the same collection, so one handle can be given to each
/// receiving task. Appends lock for the duration of a single push.
#[derive(Debug, Clone)]
pub struct TelemetryRecorder {
    inner: Arc<Mutex<Telemetry>>,
    started: Instant,
}

impl TelemetryRecorder {
    /// Starts the run clock used to stamp `test_elapsed_ms`.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(started: Instant) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Telemetry::new())),
            started,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Records a request stamped with the time since the run started.
    pub fn record(&self, signal: Signal, message: Value, headers: Headers) {
        let elapsed = self.elapsed_ms();
        self.record_at(signal, message, headers, elapsed);
    }

    pub fn record_at(&self, signal: Signal, message: Value, headers: Headers, test_elapsed_ms: u64) {
        let mut telemetry = self.inner.lock();
        telemetry.add(signal, message, headers, test_elapsed_ms);
        debug!(
            "Recorded {} request at {}ms ({} so far)",
            signal,
            test_elapsed_ms,
            telemetry.len(signal)
        );
    }

    pub fn add_log(&self, log: Value, headers: Headers, test_elapsed_ms: u64) {
        self.record_at(Signal::Log, log, headers, test_elapsed_ms);
    }

    pub fn add_metric(&self, metric: Value, headers: Headers, test_elapsed_ms: u64) {
        self.record_at(Signal::Metric, metric, headers, test_elapsed_ms);
    }

    pub fn add_trace(&self, trace: Value, headers: Headers, test_elapsed_ms: u64) {
        self.record_at(Signal::Trace, trace, headers, test_elapsed_ms);
    }

    /// Copy of everything recorded so far.
    pub fn snapshot(&self) -> Telemetry {
        self.inner.lock().clone()
    }

    /// Ends the collection phase. Falls back to a copy if another handle is
    /// still alive.
    pub fn finish(self) -> Telemetry {
        let telemetry = match Arc::try_unwrap(self.inner) {
            Ok(mutex) => mutex.into_inner(),
            Err(shared) => shared.lock().clone(),
        };
        info!(
            "Telemetry collection finished: {} log, {} metric, {} trace requests",
            telemetry.len(Signal::Log),
            telemetry.len(Signal::Metric),
            telemetry.len(Signal::Trace)
        );
        telemetry
    }
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}
