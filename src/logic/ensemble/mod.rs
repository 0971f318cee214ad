//! Ensemble Module - classifier panel adapter
//!
//! The scoring engine consumes the panel through the `Classifier` trait
//! and the `ModelPanel` wrapper; the ONNX loading lives in `onnx`.
//!
//! ## Structure
//! - `panel`: Classifier trait, ModelPanel, prediction/error types
//! - `onnx`: ONNX session loading and inference

pub mod onnx;
pub mod panel;

pub use onnx::load_panel;
pub use panel::{
    Classifier, ClassifierOutput, ModelPanel, ModelProbability, PanelError, PanelPrediction,
};
