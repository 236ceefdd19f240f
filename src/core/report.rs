// src/core/report.rs

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{error, info};

use crate::core::error::ReconError;
use crate::core::models::Report;

/// Characters that may not appear in the domain part of a report file name.
const UNSAFE_CHARS: &[char] = &[':', '/', '\\', '?', '#', '&', '='];

/// Replaces every path-unsafe character in `domain` with `_`.
pub fn sanitize_domain(domain: &str) -> String {
    domain
        .chars()
        .map(|c| if UNSAFE_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

/// `recon-<domain>-<timestamp>.json`, where the timestamp is the ISO-8601 start time
/// with `:` and `.` turned into `-`.
pub fn report_file_name(domain: &str, started_at: &DateTime<Utc>) -> String {
    let timestamp = started_at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("recon-{}-{}.json", sanitize_domain(domain), timestamp)
}

/// Writes `report` as pretty-printed JSON into `output_dir`, creating the directory
/// if needed, and returns the path of the new file.
pub fn write_report(report: &Report, output_dir: &Path) -> Result<PathBuf, ReconError> {
    let json = serde_json::to_string_pretty(report)?;

    fs::create_dir_all(output_dir).map_err(|source| {
        error!(dir = %output_dir.display(), error = %source, "Could not create output directory.");
        ReconError::Filesystem { path: output_dir.to_path_buf(), source }
    })?;

    let path = output_dir.join(report_file_name(&report.domain, &report.started_at));
    fs::write(&path, json).map_err(|source| {
        error!(path = %path.display(), error = %source, "Could not write report.");
        ReconError::Filesystem { path: path.clone(), source }
    })?;

    info!(path = %path.display(), "Report written.");
    Ok(path)
}
