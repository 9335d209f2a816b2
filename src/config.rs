use std::env;
use std::path::PathBuf;

pub const OUTPUT_DIR_VAR: &str = "OTELTEST_OUTPUT_DIR";
pub const FILE_PREFIX_VAR: &str = "OTELTEST_FILE_PREFIX";

/// Where telemetry reports are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    /// Prepended to the report file name, e.g. `ci-`.
    pub file_prefix: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            file_prefix: None,
        }
    }
}

impl ReportConfig {
    /// Defaults overridden by `OTELTEST_OUTPUT_DIR` / `OTELTEST_FILE_PREFIX`.
    /// Empty values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = env::var_os(OUTPUT_DIR_VAR).filter(|v| !v.is_empty()) {
            config.output_dir = PathBuf::from(dir);
        }
        if let Ok(prefix) = env::var(FILE_PREFIX_VAR) {
            if !prefix.is_empty() {
                config.file_prefix = Some(prefix);
            }
        }
        config
    }
}
