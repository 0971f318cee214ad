//! Deep-mode page analysis
//!
//! One bounded fetch, then markup signal sniffing with compiled
//! patterns. The capability trait keeps the scanner testable with
//! canned signals instead of live network calls.

use std::future::Future;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::DeepSignals;

/// Redirect hops followed before giving up
const MAX_REDIRECTS: u32 = 10;

/// Browser User-Agent for the page fetch
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Title words associated with credential-pressure pages
const SUSPICIOUS_TITLE_WORDS: &[&str] =
    &["verify", "update", "confirm", "suspended", "locked", "urgent"];

// ============================================================================
// MARKUP PATTERNS
// ============================================================================

static FORM_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<form\b").expect("static regex"));

static PASSWORD_INPUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<input[^>]*type\s*=\s*["']?password"#).expect("static regex")
});

static EXTERNAL_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<a\s[^>]*href\s*=\s*["']https?://"#).expect("static regex")
});

static SCRIPT_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script[^>]*>(.*?)</script>").expect("static regex")
});

static HIDDEN_IFRAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<iframe[^>]*style\s*=\s*["'][^"']*display:\s*none"#).expect("static regex")
});

static TITLE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("static regex"));

// ============================================================================
// SIGNAL SNIFFING
// ============================================================================

/// Extract deep signals from a fetched page body. Pure and
/// deterministic; the redirect count comes from the fetch hop chain.
pub fn sniff_signals(body: &str, redirect_count: u32) -> DeepSignals {
    let num_forms = FORM_TAG.find_iter(body).count() as u32;
    let has_password_field = PASSWORD_INPUT.is_match(body);
    let external_links = EXTERNAL_LINK.find_iter(body).count() as u32;

    let has_obfuscated_js = SCRIPT_BLOCK.captures_iter(body).any(|cap| {
        let script = cap.get(1).map(|m| m.as_str()).unwrap_or("");
        script.contains("eval(") || script.contains("unescape(")
    });

    let has_hidden_iframe = HIDDEN_IFRAME.is_match(body);

    let has_suspicious_title = TITLE_TAG
        .captures(body)
        .and_then(|cap| cap.get(1))
        .map(|m| {
            let title = m.as_str().to_lowercase();
            SUSPICIOUS_TITLE_WORDS.iter().any(|w| title.contains(w))
        })
        .unwrap_or(false);

    DeepSignals {
        has_password_field,
        external_links,
        has_obfuscated_js,
        has_hidden_iframe,
        has_suspicious_title,
        num_forms,
        redirect_count,
    }
}

// ============================================================================
// CAPABILITY TRAIT
// ============================================================================

/// Deep-analysis capability the scanner depends on. The live
/// implementation fetches over the network; tests substitute canned
/// signals.
pub trait DeepAnalyzer: Send + Sync {
    /// Analyze the page behind `url`. Returns `None` on any fetch or
    /// parse failure - deep analysis never fails a scan.
    fn analyze(&self, url: &str) -> impl Future<Output = Option<DeepSignals>> + Send;
}

// ============================================================================
// HTTP IMPLEMENTATION
// ============================================================================

/// Live analyzer: single fetch attempt with a browser User-Agent,
/// manual redirect following (so the hop count is exact), the whole
/// operation bounded by one timeout.
pub struct HttpDeepAnalyzer {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpDeepAnalyzer {
    pub fn new(timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, timeout: Duration::from_secs(timeout_secs) }
    }

    /// Fetch the page, following up to MAX_REDIRECTS hops manually.
    /// Returns the final body and the number of redirects taken.
    async fn fetch(&self, url: &str) -> Result<(String, u32), reqwest::Error> {
        let mut current = if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("http://{}", url)
        };

        let mut redirect_count = 0u32;

        loop {
            let response = self.client.get(&current).send().await?;

            let status = response.status();
            if status.is_redirection() && redirect_count < MAX_REDIRECTS {
                let location = response
                    .headers()
                    .get(reqwest::header::LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);

                if let Some(location) = location {
                    let next = Url::parse(&current)
                        .ok()
                        .and_then(|base| base.join(&location).ok())
                        .map(|u| u.to_string())
                        .unwrap_or(location);

                    redirect_count += 1;
                    current = next;
                    continue;
                }
            }

            let body = response.text().await?;
            return Ok((body, redirect_count));
        }
    }
}

impl DeepAnalyzer for HttpDeepAnalyzer {
    async fn analyze(&self, url: &str) -> Option<DeepSignals> {
        match tokio::time::timeout(self.timeout, self.fetch(url)).await {
            Ok(Ok((body, redirect_count))) => Some(sniff_signals(&body, redirect_count)),
            Ok(Err(e)) => {
                tracing::debug!("Deep analysis fetch failed for {}: {}", url, e);
                None
            }
            Err(_) => {
                tracing::debug!("Deep analysis timed out for {}", url);
                None
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
