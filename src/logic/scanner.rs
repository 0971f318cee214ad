//! Scanner - per-request scoring pipeline
//!
//! URL → feature extraction → optional deep merge → panel prediction →
//! rule scoring → result assembly. The panel and the deep analyzer are
//! injected at construction; the scanner itself is stateless across
//! requests.

use std::sync::Arc;

use crate::models::{ScanMode, ScanResult};

use super::deep::DeepAnalyzer;
use super::ensemble::{ModelPanel, PanelError};
use super::features::extract;
use super::rules;

pub struct Scanner<D> {
    panel: Arc<ModelPanel>,
    deep: Arc<D>,
}

impl<D> Clone for Scanner<D> {
    fn clone(&self) -> Self {
        Self { panel: Arc::clone(&self.panel), deep: Arc::clone(&self.deep) }
    }
}

impl<D: DeepAnalyzer> Scanner<D> {
    pub fn new(panel: Arc<ModelPanel>, deep: Arc<D>) -> Self {
        Self { panel, deep }
    }

    pub fn panel(&self) -> &ModelPanel {
        &self.panel
    }

    /// Run one scan. A deep-mode fetch failure degrades to fast-mode
    /// behavior; the result reports the degradation via
    /// `deep_signals_available`.
    pub async fn scan(&self, url: &str, mode: ScanMode) -> Result<ScanResult, PanelError> {
        let mut features = extract(url);

        let deep_signals = match mode {
            ScanMode::Deep => self.deep.analyze(url).await,
            ScanMode::Fast => None,
        };

        // Only the form count is authoritative from the page analysis;
        // the remaining signals feed the rule engine directly
        if let Some(signals) = &deep_signals {
            features.set_by_name("num_forms", f64::from(signals.num_forms));
        }

        let features = features;

        let prediction = self.panel.predict(&features)?;
        let outcome = rules::score(url, &features, &prediction.votes, deep_signals.as_ref());

        tracing::info!(
            "Scan complete: url={} decision={} score={:.2} adjustments={}",
            url,
            outcome.decision,
            outcome.final_score,
            outcome.adjustments.len()
        );

        Ok(ScanResult {
            url: url.to_string(),
            decision: outcome.decision,
            confidence: outcome.confidence,
            score: outcome.final_score,
            model_votes: prediction.votes,
            probabilities: prediction.probabilities,
            adjustments: outcome.adjustments,
            features: features.to_named_map(),
            deep_signals_available: deep_signals.is_some(),
            deep_signals,
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::deep::DeepSignals;
    use crate::logic::ensemble::{Classifier, ClassifierOutput, ModelProbability};
    use crate::logic::features::FeatureVector;
    use crate::logic::rules::Decision;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedClassifier {
        name: &'static str,
        vote: u8,
        probability: Option<ModelProbability>,
    }

    impl Classifier for FixedClassifier {
        fn name(&self) -> &str {
            self.name
        }

        fn predict(&self, _features: &FeatureVector) -> Result<ClassifierOutput, PanelError> {
            Ok(ClassifierOutput { vote: self.vote, probability: self.probability })
        }
    }

    struct CannedAnalyzer {
        signals: Option<DeepSignals>,
        calls: AtomicUsize,
    }

    impl CannedAnalyzer {
        fn new(signals: Option<DeepSignals>) -> Self {
            Self { signals, calls: AtomicUsize::new(0) }
        }
    }

    impl DeepAnalyzer for CannedAnalyzer {
        async fn analyze(&self, _url: &str) -> Option<DeepSignals> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.signals.clone()
        }
    }

    fn panel(votes: &[u8]) -> Arc<ModelPanel> {
        let names = ["random_forest", "gradient_boost", "logistic", "svm", "extra_trees"];
        let classifiers: Vec<Box<dyn Classifier>> = votes
            .iter()
            .enumerate()
            .map(|(i, vote)| {
                Box::new(FixedClassifier { name: names[i], vote: *vote, probability: None })
                    as Box<dyn Classifier>
            })
            .collect();
        Arc::new(ModelPanel::new(classifiers).unwrap())
    }

    #[tokio::test]
    async fn test_fast_mode_skips_analyzer() {
        let analyzer = Arc::new(CannedAnalyzer::new(Some(DeepSignals::default())));
        let scanner = Scanner::new(panel(&[0, 0]), Arc::clone(&analyzer));

        let result = scanner.scan("https://example.com", ScanMode::Fast).await.unwrap();
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 0);
        assert!(result.deep_signals.is_none());
        assert!(!result.deep_signals_available);
    }

    #[tokio::test]
    async fn test_deep_mode_merges_num_forms() {
        let signals = DeepSignals { num_forms: 4, ..Default::default() };
        let analyzer = Arc::new(CannedAnalyzer::new(Some(signals)));
        let scanner = Scanner::new(panel(&[0, 0]), analyzer);

        let result = scanner.scan("https://example.com", ScanMode::Deep).await.unwrap();
        assert_eq!(result.features.get("num_forms"), Some(&4.0));
        assert!(result.deep_signals_available);
        assert_eq!(result.deep_signals.unwrap().num_forms, 4);
    }

    #[tokio::test]
    async fn test_deep_mode_degrades_on_fetch_failure() {
        let analyzer = Arc::new(CannedAnalyzer::new(None));
        let scanner = Scanner::new(panel(&[0, 0]), Arc::clone(&analyzer));

        let result = scanner.scan("https://example.com", ScanMode::Deep).await.unwrap();
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 1);
        assert!(result.deep_signals.is_none());
        assert!(!result.deep_signals_available);
        // Degraded deep behaves exactly like fast mode
        assert!(result.adjustments.is_empty());
        assert_eq!(result.decision, Decision::Legitimate);
    }

    #[tokio::test]
    async fn test_votes_and_probabilities_in_result() {
        let classifiers: Vec<Box<dyn Classifier>> = vec![
            Box::new(FixedClassifier {
                name: "random_forest",
                vote: 1,
                probability: Some(ModelProbability { legitimate: 0.1, phishing: 0.9 }),
            }),
            Box::new(FixedClassifier { name: "svm", vote: 0, probability: None }),
        ];
        let scanner = Scanner::new(
            Arc::new(ModelPanel::new(classifiers).unwrap()),
            Arc::new(CannedAnalyzer::new(None)),
        );

        let result = scanner.scan("https://example.com", ScanMode::Fast).await.unwrap();
        assert_eq!(result.model_votes, vec![1, 0]);
        assert_eq!(result.probabilities.len(), 1);
        assert!(result.probabilities.contains_key("random_forest"));
        assert_eq!(result.score, 0.5);
        assert_eq!(result.decision, Decision::Phishing);
        assert_eq!(result.confidence, 50.0);
    }

    #[tokio::test]
    async fn test_result_features_complete() {
        let scanner = Scanner::new(panel(&[0]), Arc::new(CannedAnalyzer::new(None)));
        let result = scanner.scan("http://paypal-login-verify.com/signin.php", ScanMode::Fast)
            .await
            .unwrap();

        assert_eq!(result.features.len(), 26);
        assert_eq!(result.adjustments[0].label, "No HTTPS + suspicious path");
        assert_eq!(result.adjustments[0].delta, 0.35);
    }
}
