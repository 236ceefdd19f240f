// src/core/scanner/http_scanner.rs

use std::error::Error as StdError;
use std::time::Duration;

use reqwest::header::{HeaderMap, CONTENT_TYPE, SET_COOKIE};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::core::models::{FetchResult, HeaderEntry, Headers, HttpResponse};

/// Upper bound on the body snippet kept in the report, in bytes.
pub const MAX_BODY_SNIPPET: usize = 8192;

const USER_AGENT: &str = concat!("recon/", env!("CARGO_PKG_VERSION"));

/// Sends one GET request to `url` and records what came back.
///
/// Any status code counts as a response. Transport failures (refused connection,
/// DNS, TLS, timeout) are returned as `FetchResult::Failed` with the full error chain.
pub async fn run_http_scan(url: &Url, timeout: Duration) -> FetchResult {
    info!(url = %url, timeout_ms = %timeout.as_millis(), "Starting HTTP fetch.");

    let client = match reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client.");
            return FetchResult::failed(describe_error(&e));
        }
    };

    let mut response = match client.get(url.clone()).send().await {
        Ok(res) => {
            info!(status = %res.status(), final_url = %res.url(), "Received HTTP response.");
            res
        }
        Err(e) => {
            error!(url = %url, error = %e, "HTTP request failed.");
            return FetchResult::failed(describe_error(&e));
        }
    };

    let status = response.status();
    let headers = collect_headers(response.headers());

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let kind = body_kind(content_type.as_deref());
    let body_snippet = if kind == BodyKind::Binary {
        debug!(content_type = ?content_type, "Skipping non-textual body.");
        String::new()
    } else {
        let mut buffer = Vec::new();
        while buffer.len() < MAX_BODY_SNIPPET {
            match response.chunk().await {
                Ok(Some(chunk)) => buffer.extend_from_slice(&chunk),
                Ok(None) => break,
                Err(e) => {
                    // Keep whatever arrived before the stream broke.
                    warn!(error = %e, read = %buffer.len(), "Failed while reading response body.");
                    break;
                }
            }
        }
        decode_snippet(&buffer, kind)
    };

    debug!(bytes = %body_snippet.len(), headers = %headers.len(), "HTTP fetch finished.");
    FetchResult::Response(HttpResponse {
        status_code: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        headers,
        body_snippet,
    })
}

/// Flattens a `HeaderMap` into the report representation.
fn collect_headers(map: &HeaderMap) -> Headers {
    let mut headers = Headers::new();
    for name in map.keys() {
        let values: Vec<String> = map
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect();
        let entry = if *name == SET_COOKIE {
            HeaderEntry::Many(values)
        } else {
            HeaderEntry::One(values.join(", "))
        };
        headers.insert(name.as_str().to_string(), entry);
    }
    headers
}

/// How a response body is treated, decided from its content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    /// Declared textual (`text/*`, json, xml, javascript, html). Kept even when the
    /// bytes are not UTF-8, e.g. Latin-1 pages.
    Declared,
    /// No content type. Kept only when the bytes are valid UTF-8.
    Undeclared,
    /// Anything else. Never read.
    Binary,
}

fn body_kind(content_type: Option<&str>) -> BodyKind {
    match content_type {
        Some(ct) => {
            let ct = ct.to_ascii_lowercase();
            let textual = ct.starts_with("text/")
                || ["json", "xml", "javascript", "html"]
                    .iter()
                    .any(|kind| ct.contains(kind));
            if textual { BodyKind::Declared } else { BodyKind::Binary }
        }
        None => BodyKind::Undeclared,
    }
}

/// Cuts `bytes` to the snippet limit and decodes it. A character split by the cut is
/// dropped. Other invalid sequences become U+FFFD for declared text and make an
/// undeclared body binary (""). The result never exceeds `MAX_BODY_SNIPPET` bytes.
fn decode_snippet(bytes: &[u8], kind: BodyKind) -> String {
    let mut cut = &bytes[..bytes.len().min(MAX_BODY_SNIPPET)];
    if let Err(e) = std::str::from_utf8(cut) {
        match e.error_len() {
            None => cut = &cut[..e.valid_up_to()],
            Some(_) if kind != BodyKind::Declared => return String::new(),
            Some(_) => {}
        }
    }

    let text = String::from_utf8_lossy(cut);
    let mut end = text.len().min(MAX_BODY_SNIPPET);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

/// Renders an error with all of its sources, e.g.
/// `error sending request for url (...): tcp connect error: Connection refused`.
fn describe_error(err: &reqwest::Error) -> String {
    let mut description = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !description.contains(&text) {
            description.push_str(": ");
            description.push_str(&text);
        }
        source = cause.source();
    }
    description
}
