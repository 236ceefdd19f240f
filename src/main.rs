// src/main.rs

use std::path::PathBuf;
use std::process::ExitCode;

use color_eyre::eyre::Report as EyreReport;
use tracing::{debug, error};

mod args;
mod core;
mod logging;

use crate::args::{parse_args, Config, USAGE};
use crate::core::error::ReconError;
use crate::core::report::write_report;
use crate::core::scanner::run_full_scan;
use crate::core::target::normalize_target;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(e) = color_eyre::install() {
        eprintln!("Warning: error reporter not installed: {e}");
    }

    match run(std::env::args().skip(1)).await {
        Ok(path) => {
            println!("Report saved to {}", path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            report_failure(err);
            ExitCode::FAILURE
        }
    }
}

/// Parses `args` (program name excluded), sets up logging and performs the run.
async fn run<I>(args: I) -> Result<PathBuf, ReconError>
where
    I: IntoIterator<Item = String>,
{
    let config = parse_args(args)?;

    if let Err(e) = logging::initialize_logging(config.verbose) {
        eprintln!("Warning: logging disabled: {e}");
    }

    execute(&config).await
}

/// Normalizes the target, scans it and writes the report. Nothing touches the
/// output directory unless the target is valid.
async fn execute(config: &Config) -> Result<PathBuf, ReconError> {
    debug!(?config, "Parsed configuration.");

    let target = normalize_target(&config.target)?;
    let report = run_full_scan(&config.target, &target, config.timeout()).await;
    write_report(&report, &config.output_dir)
}

/// Prints a fatal error the way the user needs to see it.
fn report_failure(err: ReconError) {
    match err {
        ReconError::Usage => eprintln!("{USAGE}"),
        ReconError::InvalidTarget { ref input, ref reason } => {
            error!(input = %input, reason = %reason, "Invalid target.");
            eprintln!("Invalid target: {input} ({reason})");
        }
        other => {
            error!(error = %other, "Run failed.");
            eprintln!("Error: {:?}", EyreReport::new(other));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(target: &str, output_dir: PathBuf) -> Config {
        Config {
            target: target.to_string(),
            timeout_ms: 5000,
            output_dir,
            verbose: false,
        }
    }

    async fn plain_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;
        server
    }

    #[tokio::test]
    async fn missing_target_is_usage_error() {
        let result = run(vec!["--verbose".to_string(), "--timeout=10".to_string()]).await;
        assert!(matches!(result, Err(ReconError::Usage)));
    }

    #[tokio::test]
    async fn invalid_target_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("reports");

        let result = execute(&config("exa mple.com", output.clone())).await;
        assert!(matches!(result, Err(ReconError::InvalidTarget { .. })));
        assert!(!output.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn unwritable_output_is_filesystem_error() {
        let server = plain_server().await;
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let result = execute(&config(&server.uri(), blocker.join("reports"))).await;
        assert!(matches!(result, Err(ReconError::Filesystem { .. })));
    }

    #[tokio::test]
    async fn successful_run_writes_one_report() {
        let server = plain_server().await;
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("reports");

        let path = execute(&config(&server.uri(), output.clone())).await.unwrap();
        assert_eq!(path.parent(), Some(output.as_path()));
        assert_eq!(std::fs::read_dir(&output).unwrap().count(), 1);

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("recon-127.0.0.1-"), "{name}");
        assert!(name.ends_with(".json"));
    }
}
