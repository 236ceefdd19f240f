// src/core/scanner/dns_scanner.rs

use std::collections::BTreeSet;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::core::models::{DnsResult, SubdomainHit};
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

/// Labels probed under the target domain.
pub const SUBDOMAIN_WORDLIST: &[&str] = &[
    "www", "api", "admin", "dev", "test", "mail", "ftp", "stage", "beta", "portal", "shop", "m",
];

/// Hard cap on a single A lookup, so one unresponsive name cannot stall the run.
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the resolver from the system configuration, falling back to the
/// library's default upstreams when it cannot be read.
pub fn build_resolver() -> TokioAsyncResolver {
    match TokioAsyncResolver::tokio_from_system_conf() {
        Ok(resolver) => resolver,
        Err(e) => {
            warn!(error = %e, "Could not read system resolver config, using defaults.");
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        }
    }
}

/// Resolves the IPv4 addresses of `domain`. Failures are returned as
/// `DnsResult::Failed`, never raised.
pub async fn resolve_domain(
    resolver: &TokioAsyncResolver,
    domain: &str,
    timeout: Duration,
) -> DnsResult {
    info!(domain, "Starting DNS resolution.");

    if domain.parse::<Ipv4Addr>().is_ok() {
        debug!(domain, "Target is an IPv4 literal, no lookup needed.");
        return DnsResult::Resolved { addresses: vec![domain.to_string()] };
    }
    if domain.parse::<Ipv6Addr>().is_ok() {
        return DnsResult::failed("IPv6 literal has no A records");
    }

    match lookup_ipv4(resolver, domain, timeout).await {
        Ok(addresses) => {
            info!(domain, count = %addresses.len(), "DNS resolution finished.");
            DnsResult::Resolved { addresses }
        }
        Err(error) => {
            warn!(domain, error = %error, "DNS resolution failed.");
            DnsResult::Failed { error }
        }
    }
}

/// Probes `<word>.<domain>` for every word, all lookups in flight at once.
///
/// Only names that resolve are returned, in wordlist order. Lookup failures,
/// including lookups that exceed `timeout`, are dropped without being recorded.
pub async fn check_subdomains(
    resolver: &TokioAsyncResolver,
    domain: &str,
    wordlist: &[&str],
    timeout: Duration,
) -> Vec<SubdomainHit> {
    info!(domain, candidates = %wordlist.len(), "Starting subdomain probe.");

    let handles: Vec<_> = wordlist
        .iter()
        .map(|word| {
            let fqdn = format!("{word}.{domain}");
            let resolver = resolver.clone();
            tokio::spawn(async move {
                let result = lookup_ipv4(&resolver, &fqdn, timeout).await;
                (fqdn, result)
            })
        })
        .collect();

    let mut hits = Vec::new();
    for handle in handles {
        match handle.await {
            Ok((fqdn, Ok(addresses))) => {
                debug!(fqdn = %fqdn, count = %addresses.len(), "Subdomain resolved.");
                hits.push(SubdomainHit { fqdn, addresses });
            }
            Ok((fqdn, Err(error))) => {
                debug!(fqdn = %fqdn, error = %error, "Subdomain did not resolve.");
            }
            Err(e) => {
                debug!(error = %e, "Subdomain lookup task failed.");
            }
        }
    }

    info!(domain, found = %hits.len(), "Subdomain probe finished.");
    hits
}

/// A lookup with the timeout applied. Addresses come back sorted and de-duplicated;
/// an answer with no A records counts as a failure.
async fn lookup_ipv4(
    resolver: &TokioAsyncResolver,
    name: &str,
    timeout: Duration,
) -> Result<Vec<String>, String> {
    debug!(name, "Looking up A records.");
    match tokio::time::timeout(timeout, resolver.ipv4_lookup(name)).await {
        Ok(Ok(lookup)) => {
            let addresses: BTreeSet<Ipv4Addr> = lookup.iter().map(|record| record.0).collect();
            if addresses.is_empty() {
                return Err(format!("No A records found for {name}"));
            }
            Ok(addresses.iter().map(Ipv4Addr::to_string).collect())
        }
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err(format!(
            "DNS lookup for {name} timed out after {}ms",
            timeout.as_millis()
        )),
    }
}
