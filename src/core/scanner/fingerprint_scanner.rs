// src/core/scanner/fingerprint_scanner.rs

use crate::core::models::Headers;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Defines where a rule looks for its signature.
enum Check<'a> {
    /// Report the value of a header, prefixed with a label.
    Header(&'a str),
    /// Report the first cookie's `name=value` pair.
    Cookie,
    /// Report a fixed label when the body snippet matches.
    Body(&'a Lazy<Regex>),
}

/// A single detection rule.
struct FingerprintRule<'a> {
    /// Label emitted on a match. For header rules it prefixes the header value.
    label: &'a str,
    check: Check<'a>,
}

// Body signatures are matched case-insensitively.
static RE_WORDPRESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)wp-content|wordpress").unwrap());
static RE_NGINX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)nginx").unwrap());
static RE_CLOUDFLARE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)cloudflare").unwrap());
static RE_JOOMLA: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)joomla").unwrap());
static RE_DRUPAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)drupal").unwrap());

/// All rules, in the order their labels are reported.
static RULES: &[FingerprintRule] = &[
    FingerprintRule { label: "Server", check: Check::Header("server") },
    FingerprintRule { label: "X-Powered-By", check: Check::Header("x-powered-by") },
    FingerprintRule { label: "Cookies", check: Check::Cookie },
    FingerprintRule { label: "WordPress", check: Check::Body(&RE_WORDPRESS) },
    FingerprintRule { label: "nginx (body)", check: Check::Body(&RE_NGINX) },
    FingerprintRule { label: "Cloudflare (body)", check: Check::Body(&RE_CLOUDFLARE) },
    FingerprintRule { label: "Joomla", check: Check::Body(&RE_JOOMLA) },
    FingerprintRule { label: "Drupal", check: Check::Body(&RE_DRUPAL) },
];

/// Detects technologies from response headers and the body snippet.
///
/// Every rule is evaluated independently and at most once, so the output order is
/// the rule order and repeated calls on the same input give the same list.
pub fn fingerprint(headers: &Headers, body_snippet: &str) -> Vec<String> {
    let mut tech = Vec::new();

    for rule in RULES {
        let detected = match &rule.check {
            Check::Header(name) => header_value(headers, name)
                .map(|value| format!("{}: {}", rule.label, value)),
            Check::Cookie => first_cookie(headers)
                .map(|cookie| format!("{}: {}", rule.label, cookie)),
            Check::Body(re) => re.is_match(body_snippet).then(|| rule.label.to_string()),
        };

        if let Some(label) = detected {
            debug!(tech = %label, "Rule matched.");
            tech.push(label);
        }
    }

    tech
}

/// Case-insensitive header lookup. Captured headers are already lower-cased, so the
/// direct hit is the common path.
fn header_value(headers: &Headers, name: &str) -> Option<String> {
    headers
        .get(name)
        .or_else(|| {
            headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value)
        })
        .map(|value| value.to_string())
}

/// The `name=value` part of the first `set-cookie` entry.
fn first_cookie(headers: &Headers) -> Option<String> {
    let entry = headers.get("set-cookie").or_else(|| {
        headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("set-cookie"))
            .map(|(_, value)| value)
    })?;
    let cookie = entry.first()?;
    Some(cookie.split(';').next().unwrap_or_default().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::HeaderEntry;

    fn headers(pairs: &[(&str, HeaderEntry)]) -> Headers {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn one(value: &str) -> HeaderEntry {
        HeaderEntry::One(value.to_string())
    }

    #[test]
    fn server_header_alone() {
        let h = headers(&[("server", one("nginx"))]);
        assert_eq!(fingerprint(&h, ""), vec!["Server: nginx"]);
    }

    #[test]
    fn wordpress_body_alone() {
        let tech = fingerprint(&Headers::new(), "<footer>Powered by WordPress</footer>");
        assert_eq!(tech, vec!["WordPress"]);
    }

    #[test]
    fn wordpress_fires_once_for_both_signatures() {
        let body = r#"<link href="/wp-content/themes/x.css"> wordpress"#;
        assert_eq!(fingerprint(&Headers::new(), body), vec!["WordPress"]);
    }

    #[test]
    fn all_rules_fire_in_declaration_order() {
        let h = headers(&[
            ("x-powered-by", one("PHP/8.2")),
            (
                "set-cookie",
                HeaderEntry::Many(vec![
                    "sess=abc123; Path=/; HttpOnly".to_string(),
                    "other=1".to_string(),
                ]),
            ),
            ("server", one("cloudflare")),
        ]);
        let body = "DRUPAL joomla Cloudflare NGINX wp-content";

        assert_eq!(
            fingerprint(&h, body),
            vec![
                "Server: cloudflare",
                "X-Powered-By: PHP/8.2",
                "Cookies: sess=abc123",
                "WordPress",
                "nginx (body)",
                "Cloudflare (body)",
                "Joomla",
                "Drupal",
            ]
        );
    }

    #[test]
    fn single_cookie_value_is_accepted() {
        let h = headers(&[("set-cookie", one("id=42"))]);
        assert_eq!(fingerprint(&h, ""), vec!["Cookies: id=42"]);
    }

    #[test]
    fn empty_cookie_list_does_not_fire() {
        let h = headers(&[("set-cookie", HeaderEntry::Many(Vec::new()))]);
        assert!(fingerprint(&h, "").is_empty());
    }

    #[test]
    fn header_names_match_case_insensitively() {
        let h = headers(&[("Server", one("Apache"))]);
        assert_eq!(fingerprint(&h, ""), vec!["Server: Apache"]);
    }

    #[test]
    fn output_is_stable_across_calls() {
        let h = headers(&[("server", one("nginx")), ("x-powered-by", one("Express"))]);
        let body = "nginx drupal";
        let first = fingerprint(&h, body);
        for _ in 0..5 {
            assert_eq!(fingerprint(&h, body), first);
        }
    }

    #[test]
    fn nothing_matches_plain_page() {
        assert!(fingerprint(&Headers::new(), "<html><body>hello</body></html>").is_empty());
    }
}
