//! Ensemble Panel - ordered classifier collection
//!
//! The panel is constructed once at startup and injected into the
//! scanner; it is read-only for its whole lifetime. Classifiers sit
//! behind a trait so tests can substitute fakes for the ONNX sessions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::features::{validate_feature_names, FeatureVector};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("failed to read panel manifest: {0}")]
    Manifest(String),

    #[error("model panel contains no classifiers")]
    EmptyPanel,

    #[error("{0}")]
    LayoutMismatch(String),

    #[error("failed to load classifier '{name}': {message}")]
    Load { name: String, message: String },

    #[error("inference failed for classifier '{name}': {message}")]
    Inference { name: String, message: String },
}

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// Two-class probability pair; sums to 1.0 when present
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelProbability {
    pub legitimate: f64,
    pub phishing: f64,
}

/// One classifier's output for a single feature vector
#[derive(Debug, Clone, Copy)]
pub struct ClassifierOutput {
    /// 0 = legitimate, 1 = phishing
    pub vote: u8,
    /// Present only for classifiers with probabilistic output
    pub probability: Option<ModelProbability>,
}

/// A single binary classifier in the panel
pub trait Classifier: Send + Sync {
    fn name(&self) -> &str;

    /// Run one prediction over the canonical feature order
    fn predict(&self, features: &FeatureVector) -> Result<ClassifierOutput, PanelError>;
}

// ============================================================================
// PANEL
// ============================================================================

/// Combined panel prediction: votes in panel order, probabilities keyed
/// by classifier name for those that support them
#[derive(Debug, Clone)]
pub struct PanelPrediction {
    pub votes: Vec<u8>,
    pub probabilities: BTreeMap<String, ModelProbability>,
}

/// The fixed, ordered set of classifiers consulted per scan
pub struct ModelPanel {
    classifiers: Vec<Box<dyn Classifier>>,
}

impl std::fmt::Debug for ModelPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelPanel")
            .field("classifiers", &self.classifier_names())
            .finish()
    }
}

impl ModelPanel {
    /// Build a panel from an ordered classifier list. The panel must not
    /// be empty; panel order is fixed here for the process lifetime.
    pub fn new(classifiers: Vec<Box<dyn Classifier>>) -> Result<Self, PanelError> {
        if classifiers.is_empty() {
            return Err(PanelError::EmptyPanel);
        }
        Ok(Self { classifiers })
    }

    /// Validate a manifest's feature-name list against the extractor's
    /// canonical layout. Both count and order must match.
    pub fn check_feature_names(names: &[String]) -> Result<(), PanelError> {
        validate_feature_names(names).map_err(|e| PanelError::LayoutMismatch(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    /// Classifier names in panel order
    pub fn classifier_names(&self) -> Vec<&str> {
        self.classifiers.iter().map(|c| c.name()).collect()
    }

    /// Run every classifier over the feature vector, preserving panel
    /// order in the vote sequence.
    pub fn predict(&self, features: &FeatureVector) -> Result<PanelPrediction, PanelError> {
        let mut votes = Vec::with_capacity(self.classifiers.len());
        let mut probabilities = BTreeMap::new();

        for classifier in &self.classifiers {
            let output = classifier.predict(features)?;
            votes.push(output.vote);

            if let Some(probability) = output.probability {
                probabilities.insert(classifier.name().to_string(), probability);
            }
        }

        Ok(PanelPrediction { votes, probabilities })
    }
}

// ============================================================================
// TESTS
// ============================================================================
