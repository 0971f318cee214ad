//! Adjustment Rule Table
//!
//! The ordered policy table the score aggregator walks once per scan.
//! Each entry is a pure condition → delta pair; evaluation order is the
//! audit-trail order, so the table sequence below is normative. All
//! deltas are additive and commute numerically, but the emitted
//! adjustment list must always appear in this sequence.

use crate::logic::deep::DeepSignals;
use crate::logic::features::FeatureVector;

// ============================================================================
// DELTAS
// ============================================================================

pub const NO_HTTPS_SUSPICIOUS_PATH_DELTA: f64 = 0.35;
pub const NO_HTTPS_DELTA: f64 = 0.20;
pub const PASSWORD_NO_HTTPS_DELTA: f64 = 0.25;
pub const PASSWORD_SUSPICIOUS_TITLE_DELTA: f64 = 0.15;
pub const HIDDEN_IFRAME_DELTA: f64 = 0.20;
pub const OBFUSCATED_JS_DELTA: f64 = 0.15;
pub const IP_IN_URL_DELTA: f64 = 0.25;
pub const LONG_SUSPICIOUS_URL_DELTA: f64 = 0.15;
pub const MANY_SUBDOMAINS_DELTA: f64 = 0.10;

// ============================================================================
// THRESHOLDS
// ============================================================================

/// final_score at or above this = PHISHING (ties resolve to PHISHING)
pub const PHISHING_THRESHOLD: f64 = 0.5;

/// url_length must exceed this for the long-URL rule
pub const LONG_URL_LENGTH: f64 = 75.0;

/// num_subdomains at or above this triggers the subdomain rule
pub const MANY_SUBDOMAINS_MIN: f64 = 3.0;

/// Path words that make a missing-HTTPS URL extra suspicious
pub const SUSPICIOUS_PATH_WORDS: &[&str] =
    &["php", "cgi-bin", "verify", "login", "update", "secure"];

// ============================================================================
// RULE CONTEXT
// ============================================================================

/// Everything a rule condition may inspect. Built once per scan.
pub struct RuleContext<'a> {
    /// Lower-cased raw input URL (rule 1 inspects the path text)
    pub url_lower: &'a str,
    pub features: &'a FeatureVector,
    /// Present only for deep-mode scans whose fetch succeeded
    pub deep: Option<&'a DeepSignals>,
}

impl RuleContext<'_> {
    fn flag(&self, name: &str) -> bool {
        self.features.get_by_name(name).unwrap_or(0.0) != 0.0
    }

    fn value(&self, name: &str) -> f64 {
        self.features.get_by_name(name).unwrap_or(0.0)
    }

    fn is_https(&self) -> bool {
        self.flag("is_https")
    }

    fn has_suspicious_path_word(&self) -> bool {
        SUSPICIOUS_PATH_WORDS.iter().any(|w| self.url_lower.contains(w))
    }

    fn password_field(&self) -> bool {
        self.deep.map(|d| d.has_password_field).unwrap_or(false)
    }

    fn suspicious_title(&self) -> bool {
        self.deep.map(|d| d.has_suspicious_title).unwrap_or(false)
    }

    fn hidden_iframe(&self) -> bool {
        self.deep.map(|d| d.has_hidden_iframe).unwrap_or(false)
    }

    fn obfuscated_js(&self) -> bool {
        self.deep.map(|d| d.has_obfuscated_js).unwrap_or(false)
    }
}

// ============================================================================
// RULE TABLE
// ============================================================================

/// One adjustment rule: a rationale, a delta, and a pure trigger
pub struct Rule {
    pub label: &'static str,
    pub delta: f64,
    pub condition: fn(&RuleContext) -> bool,
}

/// The ordered adjustment table. The paired entries (1a/1b and 2a/2b)
/// carry mutually exclusive conditions, so at most one of each pair can
/// fire per scan.
pub static RULE_TABLE: &[Rule] = &[
    // 1a. No HTTPS with a suspicious path word
    Rule {
        label: "No HTTPS + suspicious path",
        delta: NO_HTTPS_SUSPICIOUS_PATH_DELTA,
        condition: |ctx| !ctx.is_https() && ctx.has_suspicious_path_word(),
    },
    // 1b. No HTTPS, plain
    Rule {
        label: "No HTTPS",
        delta: NO_HTTPS_DELTA,
        condition: |ctx| !ctx.is_https() && !ctx.has_suspicious_path_word(),
    },
    // 2a. Deep: password form served without HTTPS
    Rule {
        label: "Password form without HTTPS",
        delta: PASSWORD_NO_HTTPS_DELTA,
        condition: |ctx| ctx.password_field() && !ctx.is_https(),
    },
    // 2b. Deep: password form behind HTTPS but with a suspicious title
    Rule {
        label: "Password form + suspicious title",
        delta: PASSWORD_SUSPICIOUS_TITLE_DELTA,
        condition: |ctx| ctx.password_field() && ctx.is_https() && ctx.suspicious_title(),
    },
    // 3. Deep: hidden iframe
    Rule {
        label: "Hidden iframe detected",
        delta: HIDDEN_IFRAME_DELTA,
        condition: |ctx| ctx.hidden_iframe(),
    },
    // 4. Deep: obfuscated JavaScript
    Rule {
        label: "Obfuscated JavaScript",
        delta: OBFUSCATED_JS_DELTA,
        condition: |ctx| ctx.obfuscated_js(),
    },
    // 5. IP address used in the URL
    Rule {
        label: "IP address in URL",
        delta: IP_IN_URL_DELTA,
        condition: |ctx| ctx.flag("has_ip_in_url"),
    },
    // 6. Long URL carrying suspicious words
    Rule {
        label: "Long URL + suspicious words",
        delta: LONG_SUSPICIOUS_URL_DELTA,
        condition: |ctx| {
            ctx.value("url_length") > LONG_URL_LENGTH && ctx.flag("contains_suspicious_words")
        },
    },
    // 7. Subdomain stacking
    Rule {
        label: "Multiple subdomains (3+)",
        delta: MANY_SUBDOMAINS_DELTA,
        condition: |ctx| ctx.value("num_subdomains") >= MANY_SUBDOMAINS_MIN,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_is_stable() {
        let labels: Vec<&str> = RULE_TABLE.iter().map(|r| r.label).collect();
        assert_eq!(
            labels,
            vec![
                "No HTTPS + suspicious path",
                "No HTTPS",
                "Password form without HTTPS",
                "Password form + suspicious title",
                "Hidden iframe detected",
                "Obfuscated JavaScript",
                "IP address in URL",
                "Long URL + suspicious words",
                "Multiple subdomains (3+)",
            ]
        );
    }

    #[test]
    fn test_all_deltas_positive() {
        for rule in RULE_TABLE {
            assert!(rule.delta > 0.0, "{} has non-positive delta", rule.label);
        }
    }
}
