//! Features Module - URL feature extraction
//!
//! Turns the raw URL into the canonical 26-feature vector the panel
//! consumes. Pure code only; the deep-signal overlay happens in the
//! scanner.
//!
//! ## Structure
//! - `layout`: canonical feature-name order, version, layout hash
//! - `vector`: the versioned FeatureVector
//! - `url`: the extraction rules

pub mod layout;
pub mod url;
pub mod vector;

pub use layout::{
    feature_index, feature_name, layout_hash, validate_feature_names, LayoutInfo,
    FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION,
};
pub use url::{extract, UrlParts, SHORTENER_DOMAINS, SUSPICIOUS_WORDS};
pub use vector::FeatureVector;
