//! Rule Engine Types
//!
//! Data structures only - no scoring logic.

use serde::{Deserialize, Serialize};

// ============================================================================
// DECISION
// ============================================================================

/// Final verdict for a scanned URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Phishing,
    Legitimate,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Phishing => "PHISHING",
            Decision::Legitimate => "LEGITIMATE",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// ADJUSTMENT
// ============================================================================

/// One applied score adjustment: a human-readable rationale plus the
/// signed delta. The ordered adjustment sequence is part of the scan
/// result, not just an internal trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub label: String,
    pub delta: f64,
}

// ============================================================================
// SCORE OUTCOME
// ============================================================================

/// Output of the rule engine for one scan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreOutcome {
    /// Fraction of panel classifiers voting phishing
    pub base_score: f64,
    /// Base score plus triggered deltas, clamped to [0, 1]
    pub final_score: f64,
    /// PHISHING iff final_score >= 0.5 (ties resolve to PHISHING)
    pub decision: Decision,
    /// max(score, 1 - score) * 100, always in [50, 100]
    pub confidence: f64,
    /// Triggered adjustments, in fixed table order
    pub adjustments: Vec<Adjustment>,
}
