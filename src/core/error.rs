// src/core/error.rs

use std::path::PathBuf;

/// Errors that end a run with a non-zero exit status.
///
/// Network failures are deliberately absent: the HTTP and DNS scanners record them
/// as strings inside the report and the run still succeeds.
#[derive(Debug, thiserror::Error)]
pub enum ReconError {
    /// No target was given on the command line.
    #[error("missing target")]
    Usage,

    /// The target could not be turned into a URL with a host.
    #[error("invalid target '{input}': {reason}")]
    InvalidTarget { input: String, reason: String },

    /// The output directory or report file could not be written.
    #[error("failed to write report to {}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The report could not be serialized.
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}
