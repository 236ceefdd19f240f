// src/core/mod.rs

/// Fatal error taxonomy for a run.
pub mod error;

/// Data structures that make up the report.
pub mod models;

/// Serializes the report and writes it to the output directory.
pub mod report;

/// The HTTP, fingerprint and DNS steps plus the orchestrator that runs them.
pub mod scanner;

/// Turns the raw command-line target into a URL and domain.
pub mod target;
