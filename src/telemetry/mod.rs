//! Captured telemetry for one script run.
//!
//! `Request` wraps a single export message with its headers and arrival time.
//! `Telemetry` partitions requests by signal and answers the queries a test's
//! `on_stop` typically asserts on. `TelemetryRecorder` is the thread-safe
//! handle the receiving endpoint appends through while the script runs.
//!
//! Nothing in here performs network or process I/O.

pub mod collection;
pub mod recorder;
pub mod request;
pub mod schema;
pub mod signal;

pub use collection::Telemetry;
pub use recorder::TelemetryRecorder;
pub use request::{Headers, Request};
pub use signal::Signal;
