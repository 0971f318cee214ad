//! Score Aggregator
//!
//! Combines the panel's vote consensus with the ordered rule table into
//! the final score, decision, and confidence. Deterministic and
//! explainable: every triggered rule lands in the adjustment list, in
//! table order.

use crate::logic::deep::DeepSignals;
use crate::logic::features::FeatureVector;

use super::table::{RuleContext, PHISHING_THRESHOLD, RULE_TABLE};
use super::types::{Adjustment, Decision, ScoreOutcome};

/// Score one scan.
///
/// Base score = phishing votes / panel size, a value in [0, 1] at
/// increments of 1/panel_size. Rule deltas are added in table order and
/// the sum is clamped back to the unit interval before the threshold
/// decision.
pub fn score(
    url: &str,
    features: &FeatureVector,
    votes: &[u8],
    deep: Option<&DeepSignals>,
) -> ScoreOutcome {
    let base_score = if votes.is_empty() {
        0.0
    } else {
        votes.iter().filter(|v| **v == 1).count() as f64 / votes.len() as f64
    };

    let url_lower = url.to_lowercase();
    let ctx = RuleContext { url_lower: &url_lower, features, deep };

    let mut adjustments = Vec::new();
    let mut adjusted = base_score;

    for rule in RULE_TABLE {
        if (rule.condition)(&ctx) {
            adjusted += rule.delta;
            adjustments.push(Adjustment { label: rule.label.to_string(), delta: rule.delta });
        }
    }

    let final_score = adjusted.clamp(0.0, 1.0);

    let decision = if final_score >= PHISHING_THRESHOLD {
        Decision::Phishing
    } else {
        Decision::Legitimate
    };

    let confidence = final_score.max(1.0 - final_score) * 100.0;

    ScoreOutcome { base_score, final_score, decision, confidence, adjustments }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::extract;
    use crate::logic::rules::table::{
        IP_IN_URL_DELTA, NO_HTTPS_SUSPICIOUS_PATH_DELTA, PASSWORD_NO_HTTPS_DELTA,
    };

    fn labels(outcome: &ScoreOutcome) -> Vec<&str> {
        outcome.adjustments.iter().map(|a| a.label.as_str()).collect()
    }

    #[test]
    fn test_base_score_is_vote_mean() {
        let url = "https://example.com";
        let features = extract(url);

        let outcome = score(url, &features, &[1, 0, 1, 0], None);
        assert_eq!(outcome.base_score, 0.5);

        let outcome = score(url, &features, &[0, 0, 0], None);
        assert_eq!(outcome.base_score, 0.0);
    }

    #[test]
    fn test_tie_resolves_to_phishing() {
        // Base of exactly 0.5 and no adjustments (HTTPS, nothing else)
        let url = "https://example.com";
        let features = extract(url);

        let outcome = score(url, &features, &[1, 0], None);
        assert!(outcome.adjustments.is_empty());
        assert_eq!(outcome.final_score, 0.5);
        assert_eq!(outcome.decision, Decision::Phishing);
        assert_eq!(outcome.confidence, 50.0);
    }

    #[test]
    fn test_no_https_suspicious_path() {
        let url = "http://paypal-login-verify.com/signin.php";
        let features = extract(url);

        let outcome = score(url, &features, &[0, 0, 0], None);
        assert_eq!(outcome.adjustments[0].label, "No HTTPS + suspicious path");
        assert_eq!(outcome.adjustments[0].delta, NO_HTTPS_SUSPICIOUS_PATH_DELTA);
        // Plain "No HTTPS" must not also fire
        assert!(!labels(&outcome).contains(&"No HTTPS"));
    }

    #[test]
    fn test_no_https_plain() {
        let url = "http://example.com/pictures";
        let features = extract(url);

        let outcome = score(url, &features, &[0, 0], None);
        assert_eq!(labels(&outcome), vec!["No HTTPS"]);
        assert_eq!(outcome.final_score, 0.20);
        assert_eq!(outcome.decision, Decision::Legitimate);
    }

    #[test]
    fn test_https_skips_https_rules() {
        let url = "https://example.com/login";
        let features = extract(url);

        let outcome = score(url, &features, &[0, 0], None);
        assert!(outcome.adjustments.is_empty());
    }

    #[test]
    fn test_ip_rule_fires_regardless_of_https() {
        let url = "https://192.168.1.1/account";
        let features = extract(url);

        let outcome = score(url, &features, &[0, 0], None);
        assert_eq!(labels(&outcome), vec!["IP address in URL"]);
        assert_eq!(outcome.adjustments[0].delta, IP_IN_URL_DELTA);
    }

    #[test]
    fn test_long_url_threshold_boundary() {
        // 75 characters exactly: rule must NOT fire
        let path_pad = "a".repeat(75 - "http://login-example.com/".len());
        let url_75 = format!("http://login-example.com/{}", path_pad);
        assert_eq!(url_75.chars().count(), 75);

        let features = extract(&url_75);
        assert_eq!(features.get_by_name("contains_suspicious_words"), Some(1.0));
        let outcome = score(&url_75, &features, &[0], None);
        assert!(!labels(&outcome).contains(&"Long URL + suspicious words"));

        // 76 characters: rule fires
        let url_76 = format!("{}a", url_75);
        let features = extract(&url_76);
        let outcome = score(&url_76, &features, &[0], None);
        assert!(labels(&outcome).contains(&"Long URL + suspicious words"));
    }

    #[test]
    fn test_subdomain_rule_threshold() {
        let url = "https://a.b.example.com";
        let features = extract(url);
        let outcome = score(url, &features, &[0], None);
        assert!(!labels(&outcome).contains(&"Multiple subdomains (3+)"));

        let url = "https://a.b.c.example.com";
        let features = extract(url);
        let outcome = score(url, &features, &[0], None);
        assert!(labels(&outcome).contains(&"Multiple subdomains (3+)"));
    }

    #[test]
    fn test_password_rules_mutually_exclusive() {
        // Password form, no HTTPS, suspicious title also set: only the
        // no-HTTPS variant of the pair may fire
        let url = "http://example.com";
        let features = extract(url);
        let deep = DeepSignals {
            has_password_field: true,
            has_suspicious_title: true,
            ..Default::default()
        };

        let outcome = score(url, &features, &[0], Some(&deep));
        let fired = labels(&outcome);
        assert!(fired.contains(&"Password form without HTTPS"));
        assert!(!fired.contains(&"Password form + suspicious title"));

        // Same signals behind HTTPS: only the title variant fires
        let url = "https://example.com";
        let features = extract(url);
        let outcome = score(url, &features, &[0], Some(&deep));
        let fired = labels(&outcome);
        assert!(fired.contains(&"Password form + suspicious title"));
        assert!(!fired.contains(&"Password form without HTTPS"));
    }

    #[test]
    fn test_deep_rules_skipped_without_signals() {
        let url = "http://example.com";
        let features = extract(url);

        let outcome = score(url, &features, &[0], None);
        let fired = labels(&outcome);
        assert!(!fired.contains(&"Password form without HTTPS"));
        assert!(!fired.contains(&"Hidden iframe detected"));
        assert!(!fired.contains(&"Obfuscated JavaScript"));
    }

    #[test]
    fn test_adjustment_order_is_table_order() {
        // Trigger rules 1a, 2a, 3, 4, 5, 6, 7 at once
        let long_pad = "a".repeat(40);
        let url = format!("http://a.b.c.10.0.0.1.verify-login.com/signin.php?q={}", long_pad);
        let features = extract(&url);
        let deep = DeepSignals {
            has_password_field: true,
            has_hidden_iframe: true,
            has_obfuscated_js: true,
            ..Default::default()
        };

        let outcome = score(&url, &features, &[0], Some(&deep));
        assert_eq!(
            labels(&outcome),
            vec![
                "No HTTPS + suspicious path",
                "Password form without HTTPS",
                "Hidden iframe detected",
                "Obfuscated JavaScript",
                "IP address in URL",
                "Long URL + suspicious words",
                "Multiple subdomains (3+)",
            ]
        );
    }

    #[test]
    fn test_final_score_clamped() {
        let url = "http://10.0.0.1.verify-login.example.com/signin.php";
        let features = extract(url);
        let deep = DeepSignals {
            has_password_field: true,
            has_hidden_iframe: true,
            has_obfuscated_js: true,
            ..Default::default()
        };

        let outcome = score(url, &features, &[1, 1, 1], Some(&deep));
        assert_eq!(outcome.final_score, 1.0);
        assert_eq!(outcome.confidence, 100.0);
        assert_eq!(outcome.decision, Decision::Phishing);
    }

    #[test]
    fn test_confidence_bounds() {
        for votes in [[0u8, 0, 0], [1, 0, 0], [1, 1, 0], [1, 1, 1]] {
            let url = "https://example.com";
            let features = extract(url);
            let outcome = score(url, &features, &votes, None);
            assert!(outcome.confidence >= 50.0 && outcome.confidence <= 100.0);
            assert!(outcome.final_score >= 0.0 && outcome.final_score <= 1.0);
        }
    }

    #[test]
    fn test_password_no_https_delta() {
        let url = "http://example.com";
        let features = extract(url);
        let deep = DeepSignals { has_password_field: true, ..Default::default() };

        let outcome = score(url, &features, &[0, 0, 0, 0], Some(&deep));
        // No HTTPS (+0.20) and password-without-HTTPS (+0.25)
        assert_eq!(outcome.adjustments.len(), 2);
        assert_eq!(outcome.adjustments[1].delta, PASSWORD_NO_HTTPS_DELTA);
        assert!((outcome.final_score - 0.45).abs() < 1e-9);
    }
}
