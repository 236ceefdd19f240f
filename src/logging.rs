// src/logging.rs

use color_eyre::eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Diagnostics filter: warnings only, or everything from this crate with `--verbose`.
pub fn log_filter(verbose: bool) -> String {
    if verbose {
        format!("warn,{}=debug", env!("CARGO_CRATE_NAME"))
    } else {
        "warn".to_string()
    }
}

/// Installs the tracing subscriber. Diagnostics go to stderr only; the report file is
/// the single thing a run leaves on disk.
pub fn initialize_logging(verbose: bool) -> Result<()> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(log_filter(verbose)));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}
