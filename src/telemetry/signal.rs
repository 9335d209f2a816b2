use std::fmt;

/// The three observability data categories a script can export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Log,
    Metric,
    Trace,
}

impl Signal {
    pub const ALL: [Signal; 3] = [Signal::Log, Signal::Metric, Signal::Trace];

    /// Maps an OTLP/HTTP export path (`/v1/traces` etc.) to its signal.
    pub fn from_otlp_path(path: &str) -> Option<Signal> {
        match path.trim_end_matches('/') {
            "/v1/logs" => Some(Signal::Log),
            "/v1/metrics" => Some(Signal::Metric),
            "/v1/traces" => Some(Signal::Trace),
            _ => None,
        }
    }

    /// Key of this signal's request list in the structured collection form.
    pub fn requests_key(&self) -> &'static str {
        match self {
            Signal::Log => "log_requests",
            Signal::Metric => "metric_requests",
            Signal::Trace => "trace_requests",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Signal::Log => "logs",
            Signal::Metric => "metrics",
            Signal::Trace => "traces",
        };
        f.write_str(name)
    }
}
