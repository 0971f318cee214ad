//! Scan request/response models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::logic::deep::DeepSignals;
use crate::logic::ensemble::ModelProbability;
use crate::logic::rules::{Adjustment, Decision};

// ============================================================================
// REQUEST
// ============================================================================

/// Scan mode: fast = URL features only, deep = also fetch and analyze
/// the page markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    #[default]
    Fast,
    Deep,
}

#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    /// Required; validated in the handler so a missing field maps to a
    /// 400 rather than a deserialization rejection
    pub url: Option<String>,

    #[serde(default)]
    pub mode: ScanMode,

    /// Accepted for API compatibility; no attribution collaborator is
    /// wired in this deployment
    #[serde(default)]
    pub explain: bool,
}

// ============================================================================
// RESPONSE
// ============================================================================

/// Complete scan verdict. Assembled once per request, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub url: String,
    pub decision: Decision,
    /// In [50, 100]
    pub confidence: f64,
    /// In [0, 1]
    pub score: f64,
    /// One 0/1 vote per classifier, panel order
    pub model_votes: Vec<u8>,
    /// Classifier name → two-class probabilities, for classifiers that
    /// support probabilistic output
    pub probabilities: BTreeMap<String, ModelProbability>,
    /// Applied adjustments in rule-table order
    pub adjustments: Vec<Adjustment>,
    /// Named feature vector the panel scored
    pub features: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deep_signals: Option<DeepSignals>,
    /// False when a deep-mode fetch degraded (or mode was fast)
    pub deep_signals_available: bool,
}

// ============================================================================
// SERVICE SURFACE
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub deep_mode_available: bool,
    pub xai_available: bool,
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_mode_default_is_fast() {
        let req: ScanRequest = serde_json::from_str(r#"{"url": "http://example.com"}"#).unwrap();
        assert_eq!(req.mode, ScanMode::Fast);
        assert!(!req.explain);
    }

    #[test]
    fn test_scan_mode_deep_parses() {
        let req: ScanRequest =
            serde_json::from_str(r#"{"url": "http://example.com", "mode": "deep"}"#).unwrap();
        assert_eq!(req.mode, ScanMode::Deep);
    }

    #[test]
    fn test_missing_url_deserializes() {
        // Missing url must reach the handler for a 400, not fail here
        let req: ScanRequest = serde_json::from_str(r#"{"mode": "fast"}"#).unwrap();
        assert!(req.url.is_none());
    }
}
