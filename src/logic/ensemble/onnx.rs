//! ONNX-backed panel loading
//!
//! Loads the panel manifest and one ONNX session per classifier. Each
//! model takes a `[1, FEATURE_COUNT]` f32 tensor over the canonical
//! feature order. Probabilistic models output two class probabilities
//! (legitimate, phishing); the rest output a single score thresholded
//! at 0.5.

use std::path::Path;

use ndarray::Array2;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Value;
use parking_lot::Mutex;
use serde::Deserialize;

use crate::logic::features::{FeatureVector, FEATURE_COUNT};

use super::panel::{Classifier, ClassifierOutput, ModelPanel, ModelProbability, PanelError};

// ============================================================================
// MANIFEST
// ============================================================================

/// Panel manifest: the feature-name list the panel was trained against
/// plus the ordered classifier entries.
#[derive(Debug, Deserialize)]
pub struct PanelManifest {
    pub feature_names: Vec<String>,
    pub classifiers: Vec<ClassifierEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ClassifierEntry {
    pub name: String,
    /// ONNX file, relative to the manifest
    pub file: String,
    /// Whether the model exposes a two-class probability output
    #[serde(default)]
    pub probabilistic: bool,
}

// ============================================================================
// ONNX CLASSIFIER
// ============================================================================

/// One classifier in the panel, backed by an ONNX session.
/// `Session::run` needs `&mut`, so the session sits behind a mutex held
/// for the duration of a single inference call.
pub struct OnnxClassifier {
    name: String,
    probabilistic: bool,
    session: Mutex<Session>,
}

impl OnnxClassifier {
    pub fn load(name: &str, path: &Path, probabilistic: bool) -> Result<Self, PanelError> {
        if !path.exists() {
            return Err(PanelError::Load {
                name: name.to_string(),
                message: format!("model file not found: {}", path.display()),
            });
        }

        let session = Session::builder()
            .map_err(|e| load_error(name, format!("failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| load_error(name, format!("failed to set optimization: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| load_error(name, format!("failed to load model: {}", e)))?;

        Ok(Self {
            name: name.to_string(),
            probabilistic,
            session: Mutex::new(session),
        })
    }
}

fn load_error(name: &str, message: String) -> PanelError {
    PanelError::Load { name: name.to_string(), message }
}

impl OnnxClassifier {
    fn inference_error(&self, message: String) -> PanelError {
        PanelError::Inference { name: self.name.clone(), message }
    }
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, features: &FeatureVector) -> Result<ClassifierOutput, PanelError> {
        let input_data: Vec<f32> = features.as_slice().iter().map(|v| *v as f32).collect();

        let input_array = Array2::<f32>::from_shape_vec((1, FEATURE_COUNT), input_data)
            .map_err(|e| self.inference_error(format!("array error: {}", e)))?;

        let mut session = self.session.lock();

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| self.inference_error("no output defined".to_string()))?;

        let input_tensor = Value::from_array(input_array)
            .map_err(|e| self.inference_error(format!("tensor error: {}", e)))?;

        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| self.inference_error(format!("inference failed: {}", e)))?;

        let output = outputs
            .get(&output_name)
            .ok_or_else(|| self.inference_error("no output".to_string()))?;

        let output_tensor = output
            .try_extract_tensor::<f32>()
            .map_err(|e| self.inference_error(format!("extract error: {}", e)))?;

        let data = output_tensor.1;

        if self.probabilistic && data.len() >= 2 {
            let legitimate = data[0] as f64;
            let phishing = data[1] as f64;
            Ok(ClassifierOutput {
                vote: if phishing >= 0.5 { 1 } else { 0 },
                probability: Some(ModelProbability { legitimate, phishing }),
            })
        } else {
            let score = data
                .first()
                .copied()
                .ok_or_else(|| self.inference_error("empty output tensor".to_string()))?;
            Ok(ClassifierOutput {
                vote: if score >= 0.5 { 1 } else { 0 },
                probability: None,
            })
        }
    }
}

// ============================================================================
// PANEL LOADING
// ============================================================================

/// Load the full panel from a manifest path. Fails fast on a missing or
/// malformed manifest, a feature-name list that doesn't match the
/// extractor layout, an empty classifier list, or any unloadable model.
pub fn load_panel(manifest_path: &str) -> Result<ModelPanel, PanelError> {
    let path = Path::new(manifest_path);

    let raw = std::fs::read_to_string(path)
        .map_err(|e| PanelError::Manifest(format!("{}: {}", path.display(), e)))?;

    let manifest: PanelManifest =
        serde_json::from_str(&raw).map_err(|e| PanelError::Manifest(e.to_string()))?;

    ModelPanel::check_feature_names(&manifest.feature_names)?;

    if manifest.classifiers.is_empty() {
        return Err(PanelError::EmptyPanel);
    }

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut classifiers: Vec<Box<dyn Classifier>> = Vec::with_capacity(manifest.classifiers.len());
    for entry in &manifest.classifiers {
        let model_path = base_dir.join(&entry.file);
        tracing::info!("Loading classifier '{}' from {}", entry.name, model_path.display());
        let classifier = OnnxClassifier::load(&entry.name, &model_path, entry.probabilistic)?;
        classifiers.push(Box::new(classifier));
    }

    ModelPanel::new(classifiers)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::FEATURE_LAYOUT;
    use std::io::Write;

    #[test]
    fn test_load_panel_missing_manifest() {
        let err = load_panel("/nonexistent/panel.json").unwrap_err();
        assert!(matches!(err, PanelError::Manifest(_)));
    }

    #[test]
    fn test_load_panel_malformed_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("panel.json");
        std::fs::File::create(&manifest)
            .unwrap()
            .write_all(b"not json")
            .unwrap();

        let err = load_panel(manifest.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, PanelError::Manifest(_)));
    }

    #[test]
    fn test_load_panel_layout_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("panel.json");
        let body = serde_json::json!({
            "feature_names": ["wrong", "names"],
            "classifiers": [{"name": "rf", "file": "rf.onnx"}],
        });
        std::fs::write(&manifest, body.to_string()).unwrap();

        let err = load_panel(manifest.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, PanelError::LayoutMismatch(_)));
    }

    #[test]
    fn test_load_panel_empty_classifier_list() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("panel.json");
        let names: Vec<String> = FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect();
        let body = serde_json::json!({
            "feature_names": names,
            "classifiers": [],
        });
        std::fs::write(&manifest, body.to_string()).unwrap();

        let err = load_panel(manifest.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, PanelError::EmptyPanel));
    }

    #[test]
    fn test_load_panel_missing_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = dir.path().join("panel.json");
        let names: Vec<String> = FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect();
        let body = serde_json::json!({
            "feature_names": names,
            "classifiers": [{"name": "rf", "file": "rf.onnx", "probabilistic": true}],
        });
        std::fs::write(&manifest, body.to_string()).unwrap();

        let err = load_panel(manifest.to_str().unwrap()).unwrap_err();
        match err {
            PanelError::Load { name, message } => {
                assert_eq!(name, "rf");
                assert!(message.contains("not found"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
