// src/args.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::core::error::ReconError;

pub const DEFAULT_TIMEOUT_MS: u64 = 8000;
pub const DEFAULT_OUTPUT_DIR: &str = "recon-reports";

pub const USAGE: &str = "Usage: recon <target> [--timeout=ms] [--output=folder] [--verbose]";

/// Run configuration, built once from the command line and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub target: String,
    pub timeout_ms: u64,
    pub output_dir: PathBuf,
    pub verbose: bool,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Builds a `Config` from the arguments that follow the program name.
///
/// Malformed or unknown flags are ignored. The first token that is not a flag is the
/// target; later ones are ignored. The only error is a missing target.
pub fn parse_args<I, S>(args: I) -> Result<Config, ReconError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut target = None;
    let mut timeout_ms = DEFAULT_TIMEOUT_MS;
    let mut output_dir = PathBuf::from(DEFAULT_OUTPUT_DIR);
    let mut verbose = false;

    for arg in args {
        let arg: String = arg.into();
        if let Some(value) = arg.strip_prefix("--timeout=") {
            timeout_ms = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .unwrap_or(DEFAULT_TIMEOUT_MS);
        } else if let Some(value) = arg.strip_prefix("--output=") {
            if !value.is_empty() {
                output_dir = PathBuf::from(value);
            }
        } else if arg == "--verbose" {
            verbose = true;
        } else if arg.starts_with("--") {
            // unknown flag
        } else if target.is_none() && !arg.trim().is_empty() {
            target = Some(arg);
        }
    }

    Ok(Config {
        target: target.ok_or(ReconError::Usage)?,
        timeout_ms,
        output_dir,
        verbose,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_alone_uses_defaults() {
        let config = parse_args(["example.com"]).unwrap();
        assert_eq!(config.target, "example.com");
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert!(!config.verbose);
    }

    #[test]
    fn flags_may_come_before_or_after_target() {
        let config =
            parse_args(["--verbose", "example.com", "--timeout=2500", "--output=out/dir"]).unwrap();
        assert_eq!(config.target, "example.com");
        assert_eq!(config.timeout(), Duration::from_millis(2500));
        assert_eq!(config.output_dir, PathBuf::from("out/dir"));
        assert!(config.verbose);
    }

    #[test]
    fn bad_timeout_falls_back_to_default() {
        for flag in ["--timeout=abc", "--timeout=", "--timeout=-5", "--timeout=0"] {
            let config = parse_args([flag, "example.com"]).unwrap();
            assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS, "{flag}");
        }
    }

    #[test]
    fn first_positional_wins_and_unknown_flags_are_ignored() {
        let config = parse_args(["--bogus", "--timeout", "first.com", "second.com"]).unwrap();
        assert_eq!(config.target, "first.com");
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn missing_target_is_a_usage_error() {
        assert!(matches!(parse_args(Vec::<String>::new()), Err(ReconError::Usage)));
        assert!(matches!(parse_args(["--verbose", "--output=x"]), Err(ReconError::Usage)));
    }
}
