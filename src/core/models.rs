// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// --- HTTP Models ---

// A single response header value. `set-cookie` is always kept as a list so that
// every cookie the server sent survives; any other repeated header is folded into
// one comma-separated string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum HeaderEntry {
    One(String),
    Many(Vec<String>),
}

impl HeaderEntry {
    // The first value carried by the entry, if any.
    pub fn first(&self) -> Option<&str> {
        match self {
            HeaderEntry::One(value) => Some(value.as_str()),
            HeaderEntry::Many(values) => values.first().map(String::as_str),
        }
    }
}

impl fmt::Display for HeaderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderEntry::One(value) => write!(f, "{value}"),
            HeaderEntry::Many(values) => write!(f, "{}", values.join(", ")),
        }
    }
}

// Lower-cased header name -> value, ordered by name.
pub type Headers = BTreeMap<String, HeaderEntry>;

// What was captured from a successful HTTP exchange, whatever its status code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: String,
    pub headers: Headers,
    pub body_snippet: String,
}

// Outcome of the HTTP fetch. A network failure is a recorded outcome, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum FetchResult {
    Response(HttpResponse),
    Failed { error: String },
}

impl FetchResult {
    pub fn failed(error: impl Into<String>) -> Self {
        FetchResult::Failed { error: error.into() }
    }

    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            FetchResult::Response(response) => Some(response),
            FetchResult::Failed { .. } => None,
        }
    }
}

// --- DNS Models ---

// Outcome of the IPv4 lookup for the target domain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DnsResult {
    Resolved { addresses: Vec<String> },
    Failed { error: String },
}

impl DnsResult {
    pub fn failed(error: impl Into<String>) -> Self {
        DnsResult::Failed { error: error.into() }
    }
}

// A candidate subdomain that resolved. Candidates that did not resolve are never recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubdomainHit {
    pub fqdn: String,
    pub addresses: Vec<String>,
}

// --- Main Report ---

// Everything gathered during one run. Written to disk exactly once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub target: String,
    pub domain: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub http: FetchResult,
    pub dns: DnsResult,
    pub subdomains: Vec<SubdomainHit>,
    pub tech: Vec<String>,
}
