// src/core/target.rs

use tracing::debug;
use url::{Host, Url};

use crate::core::error::ReconError;

/// A target that has been turned into a URL with a host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// The canonical URL the HTTP fetch is sent to.
    pub url: Url,
    /// The host component, used for DNS and for naming the report.
    pub domain: String,
    is_ip: bool,
}

impl Target {
    /// Whether the host is an IPv4 or IPv6 literal rather than a name.
    pub fn is_ip_literal(&self) -> bool {
        self.is_ip
    }
}

/// Normalizes a raw command-line target.
///
/// Inputs without an `http://` or `https://` prefix (compared case-insensitively)
/// get `http://` prepended before parsing.
pub fn normalize_target(raw: &str) -> Result<Target, ReconError> {
    let trimmed = raw.trim();
    let with_scheme = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let url = Url::parse(&with_scheme).map_err(|e| ReconError::InvalidTarget {
        input: raw.to_string(),
        reason: e.to_string(),
    })?;

    let (domain, is_ip) = match url.host() {
        Some(Host::Domain(name)) => (name.to_string(), false),
        Some(Host::Ipv4(addr)) => (addr.to_string(), true),
        Some(Host::Ipv6(addr)) => (addr.to_string(), true),
        None => {
            return Err(ReconError::InvalidTarget {
                input: raw.to_string(),
                reason: "URL has no host".to_string(),
            });
        }
    };

    debug!(url = %url, domain = %domain, "Target normalized.");
    Ok(Target { url, domain, is_ip })
}

fn has_http_scheme(input: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        input
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
