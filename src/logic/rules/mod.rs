//! Rules Module - score adjustment and final decision
//!
//! Takes the panel's base consensus score and applies the ordered
//! adjustment table before the threshold decision.
//!
//! ## Structure
//! - `types`: Decision, Adjustment, ScoreOutcome
//! - `table`: deltas, thresholds, and the ordered rule table
//! - `engine`: the score aggregator

pub mod engine;
pub mod table;
pub mod types;

pub use engine::score;
pub use table::{RuleContext, PHISHING_THRESHOLD, RULE_TABLE, SUSPICIOUS_PATH_WORDS};
pub use types::{Adjustment, Decision, ScoreOutcome};
