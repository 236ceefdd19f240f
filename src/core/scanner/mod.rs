// src/core/scanner/mod.rs

// This file acts as the public interface for the `scanner` module.
pub mod dns_scanner;
pub mod fingerprint_scanner;
pub mod http_scanner;

use std::time::Duration;

use chrono::Utc;
use tracing::info;

use crate::core::models::Report;
use crate::core::target::Target;
use self::dns_scanner::{
    build_resolver, check_subdomains, resolve_domain, LOOKUP_TIMEOUT, SUBDOMAIN_WORDLIST,
};
use self::fingerprint_scanner::fingerprint;
use self::http_scanner::run_http_scan;

/// Runs every reconnaissance step against `target` and assembles the report.
///
/// The HTTP fetch and the domain lookup are independent and run concurrently with
/// `tokio::join!`; the subdomain probe follows. Network failures end up inside the
/// report, so this never fails.
pub async fn run_full_scan(raw_target: &str, target: &Target, timeout: Duration) -> Report {
    let started_at = Utc::now();
    info!(target = %target.url, domain = %target.domain, "Starting reconnaissance.");

    let resolver = build_resolver();

    let (http, dns) = tokio::join!(
        run_http_scan(&target.url, timeout),
        resolve_domain(&resolver, &target.domain, LOOKUP_TIMEOUT)
    );

    let tech = http
        .response()
        .map(|response| fingerprint(&response.headers, &response.body_snippet))
        .unwrap_or_default();

    // An address has no subdomains to probe.
    let subdomains = if target.is_ip_literal() {
        info!(domain = %target.domain, "Skipping subdomain probe for IP target.");
        Vec::new()
    } else {
        check_subdomains(&resolver, &target.domain, SUBDOMAIN_WORDLIST, LOOKUP_TIMEOUT).await
    };

    let finished_at = Utc::now();
    info!(
        tech = %tech.len(),
        subdomains = %subdomains.len(),
        elapsed_ms = %(finished_at - started_at).num_milliseconds(),
        "Reconnaissance finished."
    );

    Report {
        target: raw_target.to_string(),
        domain: target.domain.clone(),
        started_at,
        finished_at,
        http,
        dns,
        subdomains,
        tech,
    }
}
