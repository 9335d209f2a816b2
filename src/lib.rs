pub mod config;
pub mod contract;
pub mod error;
pub mod report;
pub mod telemetry;

pub use config::ReportConfig;
pub use contract::{OtelTest, ScriptTest};
pub use error::{ContractError, TelemetryError};
pub use telemetry::{Headers, Request, Signal, Telemetry, TelemetryRecorder};
