//! URL Feature Extraction
//!
//! Turns a raw URL string into the 26-feature vector the panel was
//! trained against. Pure and deterministic: no I/O, no randomness, and
//! never fails: a malformed URL still yields a best-effort vector.

use std::borrow::Cow;
use std::net::Ipv4Addr;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::vector::FeatureVector;

// ============================================================================
// LEXICONS
// ============================================================================

/// Words that frequently appear in phishing URLs
pub const SUSPICIOUS_WORDS: &[&str] = &[
    "secure", "account", "login", "update", "verify", "bank",
    "paypal", "signin", "webscr", "cgi-bin", "cmd",
];

/// Known URL shortener domains
pub const SHORTENER_DOMAINS: &[&str] = &["bit.ly", "tinyurl", "goo.gl", "t.co", "ow.ly"];

/// Characters counted for num_special_chars
const SPECIAL_CHARS: &[char] = &['?', '&', '=', '%', '#'];

/// Dotted-quad IPv4-looking substring, anywhere in the raw string
static IPV4_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+\.\d+\.\d+\.\d+").expect("static regex")
});

/// Common two-level public suffixes. Stands in for a full public-suffix
/// list; hosts ending in one of these keep two labels as the suffix when
/// resolving the registrable domain.
const MULTI_LABEL_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "ac.uk", "gov.uk", "me.uk",
    "co.jp", "ne.jp", "or.jp", "ac.jp",
    "com.au", "net.au", "org.au",
    "co.in", "net.in", "org.in",
    "com.br", "com.cn", "com.mx", "com.tr", "com.sg", "com.ar",
    "co.za", "co.kr", "co.nz",
];

// ============================================================================
// URL PARTS
// ============================================================================

/// Host-derived pieces of a URL, parsed once per extraction.
///
/// All host-derived features (`num_subdomains`, `has_dash`,
/// `domain_length`, `has_port`) are computed from the scheme-prefixed
/// input, the single canonical extraction input.
#[derive(Debug, Clone, Default)]
pub struct UrlParts {
    /// Effective scheme is https
    pub is_https: bool,
    /// Registrable second-level domain label ("" if unresolvable)
    pub domain: String,
    /// Count of dot-separated labels in the subdomain portion
    pub num_subdomains: usize,
    /// Explicit non-default port present
    pub has_port: bool,
}

/// Prefix the input with `http://` when no scheme is present
fn with_scheme(url: &str) -> Cow<'_, str> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Cow::Borrowed(url)
    } else {
        Cow::Owned(format!("http://{}", url))
    }
}

/// Split a host into (subdomain label count, registrable domain label).
///
/// IP hosts have no registrable domain. Single-label hosts (e.g.
/// `localhost`) are their own domain with no suffix.
fn split_host(host: &str) -> (usize, String) {
    if host.starts_with('[') || host.parse::<Ipv4Addr>().is_ok() {
        return (0, String::new());
    }

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();

    match labels.len() {
        0 => (0, String::new()),
        1 => (0, labels[0].to_string()),
        n => {
            let last_two = format!("{}.{}", labels[n - 2], labels[n - 1]);
            let suffix_len = if n >= 3 && MULTI_LABEL_SUFFIXES.contains(&last_two.as_str()) {
                2
            } else {
                1
            };

            if n <= suffix_len {
                // The host is nothing but a public suffix
                (0, String::new())
            } else {
                let domain_idx = n - 1 - suffix_len;
                (domain_idx, labels[domain_idx].to_string())
            }
        }
    }
}

impl UrlParts {
    /// Parse host-derived parts from a raw URL. Never fails; an
    /// unparseable input yields the default (empty) parts.
    pub fn parse(url: &str) -> Self {
        let prefixed = with_scheme(url);
        let is_https = prefixed.starts_with("https://");

        match Url::parse(&prefixed) {
            Ok(parsed) => {
                let (num_subdomains, domain) = parsed
                    .host_str()
                    .map(|h| split_host(&h.to_ascii_lowercase()))
                    .unwrap_or((0, String::new()));

                Self {
                    is_https,
                    domain,
                    num_subdomains,
                    has_port: parsed.port().is_some(),
                }
            }
            Err(_) => Self { is_https, ..Self::default() },
        }
    }
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Extract the full 26-feature vector from a URL string.
///
/// Enrichment-backed features (SSL expiry, WHOIS, page content, host
/// reputation) are set to neutral placeholders; only `num_forms` is
/// later overridable by the deep-signal merge.
pub fn extract(url: &str) -> FeatureVector {
    let lower = url.to_lowercase();
    let parts = UrlParts::parse(url);

    // '//' occurring after the leading scheme is stripped once
    let stripped = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .unwrap_or(url);

    let mut vector = FeatureVector::new();

    vector.set_by_name("url_length", url.chars().count() as f64);
    vector.set_by_name("num_subdomains", parts.num_subdomains as f64);
    vector.set_by_name("has_ip_in_url", bool_feature(IPV4_PATTERN.is_match(url)));
    vector.set_by_name("has_at_symbol", bool_feature(url.contains('@')));
    vector.set_by_name("has_dash", bool_feature(parts.domain.contains('-')));
    vector.set_by_name(
        "uses_shortener",
        bool_feature(SHORTENER_DOMAINS.iter().any(|s| lower.contains(s))),
    );
    vector.set_by_name(
        "contains_suspicious_words",
        bool_feature(SUSPICIOUS_WORDS.iter().any(|w| lower.contains(w))),
    );
    vector.set_by_name("is_https", bool_feature(parts.is_https));
    vector.set_by_name("has_ssl_cert", bool_feature(parts.is_https));
    vector.set_by_name("num_dots", url.matches('.').count() as f64);
    vector.set_by_name("num_slashes", url.matches('/').count() as f64);
    vector.set_by_name("has_double_slash", bool_feature(stripped.contains("//")));
    vector.set_by_name("domain_length", parts.domain.chars().count() as f64);
    vector.set_by_name("has_port", bool_feature(parts.has_port));
    vector.set_by_name(
        "num_special_chars",
        url.chars().filter(|c| SPECIAL_CHARS.contains(c)).count() as f64,
    );

    // Neutral placeholders for external enrichment data
    vector.set_by_name("ssl_expiry_days", 0.0);
    vector.set_by_name("domain_age_days", 0.0);
    vector.set_by_name("dns_record_exists", 1.0);
    vector.set_by_name("whois_private", 0.0);
    vector.set_by_name("num_forms", 0.0);
    vector.set_by_name("has_login_form", 0.0);
    vector.set_by_name("external_links_count", 0.0);
    vector.set_by_name("title_similarity_to_domain", 0.5);
    vector.set_by_name("ip_reputation_score", 0.5);
    vector.set_by_name("country_mismatch", 0.0);
    vector.set_by_name("hosting_provider_reputation", 0.5);

    vector
}

fn bool_feature(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

// ============================================================================
// TESTS
// ============================================================================
