//! Deep Module - HTML-derived page signals
//!
//! Deep mode fetches the page once (bounded by a timeout) and sniffs a
//! small set of markup signals. Any fetch failure degrades to "no deep
//! signals" - it never fails the scan.
//!
//! ## Structure
//! - `analyzer`: the DeepAnalyzer capability and the HTTP implementation

pub mod analyzer;

use serde::{Deserialize, Serialize};

pub use analyzer::{sniff_signals, DeepAnalyzer, HttpDeepAnalyzer};

/// Page-derived signals consumed by the rule engine. Only `num_forms`
/// is written back into the feature vector; the rest feed the rules
/// directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeepSignals {
    pub has_password_field: bool,
    pub external_links: u32,
    pub has_obfuscated_js: bool,
    pub has_hidden_iframe: bool,
    pub has_suspicious_title: bool,
    pub num_forms: u32,
    pub redirect_count: u32,
}
