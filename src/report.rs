use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::ReportConfig;
use crate::error::TelemetryError;
use crate::telemetry::Telemetry;

/// Writes the run's telemetry as `<prefix><script stem>.<n>.json`, picking
/// the first `n` not already taken. Existing reports are never overwritten.
pub fn write_report(
    telemetry: &Telemetry,
    config: &ReportConfig,
    script_name: &str,
) -> Result<PathBuf, TelemetryError> {
    let json = telemetry.to_json()?;
    let stem = Path::new(script_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("telemetry");
    let prefix = config.file_prefix.as_deref().unwrap_or("");

    fs::create_dir_all(&config.output_dir)?;

    let mut n: u32 = 0;
    loop {
        let path = config.output_dir.join(format!("{prefix}{stem}.{n}.json"));
        match create_filled(&path, |file| file.write_all(json.as_bytes())) {
            Ok(()) => {
                info!("Wrote telemetry report {}", path.display());
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => n += 1,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Creates `path` (failing if it exists) and fills it. A file that could not
/// be filled completely is removed so its slot stays free.
fn create_filled<F>(path: &Path, fill: F) -> io::Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    if let Err(e) = fill(&mut file) {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path) {
            warn!("Could not remove partial report {}: {}", path.display(), cleanup);
        }
        return Err(e);
    }
    Ok(())
}

pub fn read_report(path: &Path) -> Result<Telemetry, TelemetryError> {
    let content = fs::read_to_string(path)?;
    Telemetry::from_json(&content)
}
