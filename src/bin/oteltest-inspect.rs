use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use oteltest::report::read_report;
use oteltest::{ReportConfig, Signal};
use tracing_subscriber::EnvFilter;

// Summarizes a telemetry report written by the harness. Relative paths are
// resolved against the configured report directory.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let Some(arg) = std::env::args().nth(1) else {
        bail!("usage: oteltest-inspect <report.json>");
    };
    let path = report_path(&ReportConfig::from_env(), &arg);

    let display = path.display().to_string();
    let telemetry = tokio::task::spawn_blocking(move || read_report(&path))
        .await?
        .with_context(|| format!("loading {display}"))?;

    for signal in Signal::ALL {
        tracing::info!("{}: {} requests", signal, telemetry.len(signal));
    }
    tracing::info!("log records: {}", telemetry.num_log_records()?);
    tracing::info!("metric data points: {}", telemetry.num_metrics()?);
    tracing::info!("spans: {}", telemetry.num_spans()?);

    let names: Vec<String> = telemetry.metric_names()?.into_iter().collect();
    tracing::info!("metric names: [{}]", names.join(", "));

    Ok(())
}

fn report_path(config: &ReportConfig, arg: &str) -> PathBuf {
    let path = PathBuf::from(arg);
    if path.is_absolute() {
        path
    } else {
        config.output_dir.join(path)
    }
}
