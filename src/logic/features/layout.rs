//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! The panel was trained against this exact name order; the manifest's
//! feature-name list is validated against it at load time.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
/// This is the SINGLE SOURCE OF TRUTH for feature layout
pub const FEATURE_LAYOUT: &[&str] = &[
    // === URL structure (0-14) ===
    "url_length",                  // 0: Character count of the raw input
    "num_subdomains",              // 1: Labels in the subdomain portion
    "has_ip_in_url",               // 2: Dotted-quad substring present
    "has_at_symbol",               // 3: '@' present in raw input
    "has_dash",                    // 4: '-' in the second-level domain label
    "uses_shortener",              // 5: Known shortener domain present
    "contains_suspicious_words",   // 6: Lexicon word present
    "is_https",                    // 7: Effective scheme is https
    "has_ssl_cert",                // 8: Same check as is_https (panel compat)
    "num_dots",                    // 9: '.' count in raw input
    "num_slashes",                 // 10: '/' count in raw input
    "has_double_slash",            // 11: '//' after stripping leading scheme
    "domain_length",               // 12: Second-level domain label length
    "has_port",                    // 13: Explicit port present
    "num_special_chars",           // 14: Count of ? & = % #

    // === External enrichment placeholders (15-25) ===
    "ssl_expiry_days",             // 15: Neutral 0 without enrichment
    "domain_age_days",             // 16: Neutral 0 without enrichment
    "dns_record_exists",           // 17: Neutral 1 without enrichment
    "whois_private",               // 18: Neutral 0 without enrichment
    "num_forms",                   // 19: 0; overlaid by deep analysis
    "has_login_form",              // 20: Neutral 0 without enrichment
    "external_links_count",        // 21: Neutral 0 without enrichment
    "title_similarity_to_domain",  // 22: Neutral 0.5 without enrichment
    "ip_reputation_score",         // 23: Neutral 0.5 without enrichment
    "country_mismatch",            // 24: Neutral 0 without enrichment
    "hosting_provider_reputation", // 25: Neutral 0.5 without enrichment
];

/// Total number of features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 26;

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
/// Used to detect layout mismatches at runtime
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    // Include version in hash
    hasher.update(&[FEATURE_VERSION]);

    // Hash all feature names in order
    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get layout hash
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when a feature-name list doesn't match the canonical layout
#[derive(Debug, Clone)]
pub struct LayoutMismatchError {
    pub detail: String,
}

impl std::fmt::Display for LayoutMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Feature layout mismatch: {}", self.detail)
    }
}

impl std::error::Error for LayoutMismatchError {}

/// Validate a panel's feature-name list against the canonical layout.
/// Count and exact order must both match.
pub fn validate_feature_names(names: &[String]) -> Result<(), LayoutMismatchError> {
    if names.len() != FEATURE_COUNT {
        return Err(LayoutMismatchError {
            detail: format!("expected {} features, manifest has {}", FEATURE_COUNT, names.len()),
        });
    }

    for (i, (expected, actual)) in FEATURE_LAYOUT.iter().zip(names.iter()).enumerate() {
        if expected != actual {
            return Err(LayoutMismatchError {
                detail: format!("position {}: expected '{}', manifest has '{}'", i, expected, actual),
            });
        }
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name (O(n) but features are few)
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================
