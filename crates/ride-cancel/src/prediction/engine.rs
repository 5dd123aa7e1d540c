use super::domain::{ClassProbabilities, RideInput, RideOutcome};
use super::encoding::encode;
use super::features::build;
use super::model::{CancellationModel, FeatureImportance};
use super::overrides::{OverrideConfig, OverrideEngine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_class: RideOutcome,
    pub probability_completed: f64,
    pub probability_cancelled: f64,
    pub override_triggered: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_reason: Option<String>,
    /// False when the model declared no feature schema to align against.
    pub schema_verified: bool,
}

impl PredictionResult {
    pub fn probabilities(&self) -> ClassProbabilities {
        ClassProbabilities {
            completed: self.probability_completed,
            cancelled: self.probability_cancelled,
        }
    }

    /// Likelihood of the predicted class.
    pub fn likelihood(&self) -> f64 {
        self.probabilities().for_outcome(self.predicted_class)
    }

    pub fn headline(&self) -> String {
        format!(
            "{} ({:.1}% likelihood)",
            self.predicted_class.label().to_uppercase(),
            self.likelihood() * 100.0
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("prediction unavailable: model file not loaded")]
pub struct ModelUnavailable;

/// Model metadata surfaced to charts and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_features: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feature_importances: Vec<FeatureImportance>,
}

/// Build, encode, then either apply an override or ask the model.
pub fn predict_with(
    model: &dyn CancellationModel,
    overrides: &OverrideEngine,
    input: &RideInput,
) -> PredictionResult {
    let record = build(input);
    let encoded = encode(&record, model.expected_features());
    let schema_verified = encoded.is_schema_verified();

    if let Some(rule) = overrides.evaluate(input) {
        let proba = ClassProbabilities::one_hot(rule.outcome);
        return PredictionResult {
            predicted_class: rule.outcome,
            probability_completed: proba.completed,
            probability_cancelled: proba.cancelled,
            override_triggered: true,
            override_reason: Some(rule.reason),
            schema_verified,
        };
    }

    let proba = model.predict_proba(&encoded);
    let predicted_class = model.predict(&encoded);

    PredictionResult {
        predicted_class,
        probability_completed: proba.completed,
        probability_cancelled: proba.cancelled,
        override_triggered: false,
        override_reason: None,
        schema_verified,
    }
}

/// Holds the process-wide, read-only model alongside the override rules.
#[derive(Clone, Default)]
pub struct PredictionEngine {
    model: Option<Arc<dyn CancellationModel>>,
    overrides: OverrideEngine,
}

impl PredictionEngine {
    pub fn new(model: Option<Arc<dyn CancellationModel>>) -> Self {
        Self::with_overrides(model, OverrideConfig::default())
    }

    pub fn with_overrides(
        model: Option<Arc<dyn CancellationModel>>,
        config: OverrideConfig,
    ) -> Self {
        Self {
            model,
            overrides: OverrideEngine::new(config),
        }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    pub fn predict(&self, input: &RideInput) -> Result<PredictionResult, ModelUnavailable> {
        let model = self.model.as_deref().ok_or(ModelUnavailable)?;
        Ok(predict_with(model, &self.overrides, input))
    }

    pub fn summary(&self) -> ModelSummary {
        match self.model.as_deref() {
            Some(model) => ModelSummary {
                loaded: true,
                expected_features: model.expected_features().map(<[String]>::to_vec),
                feature_importances: model.feature_importances().unwrap_or_default(),
            },
            None => ModelSummary {
                loaded: false,
                expected_features: None,
                feature_importances: Vec::new(),
            },
        }
    }
}

impl std::fmt::Debug for PredictionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionEngine")
            .field("model_loaded", &self.model.is_some())
            .field("overrides", self.overrides.config())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::encoding::EncodedFeatureVector;

    struct FixedModel {
        cancelled: f64,
    }

    impl CancellationModel for FixedModel {
        fn expected_features(&self) -> Option<&[String]> {
            None
        }

        fn predict(&self, _: &EncodedFeatureVector) -> RideOutcome {
            if self.cancelled >= 0.5 {
                RideOutcome::Cancelled
            } else {
                RideOutcome::Completed
            }
        }

        fn predict_proba(&self, _: &EncodedFeatureVector) -> ClassProbabilities {
            ClassProbabilities {
                completed: 1.0 - self.cancelled,
                cancelled: self.cancelled,
            }
        }
    }

    fn engine(cancelled: f64) -> PredictionEngine {
        PredictionEngine::new(Some(Arc::new(FixedModel { cancelled })))
    }

    #[test]
    fn missing_model_reports_unavailable() {
        let engine = PredictionEngine::new(None);
        assert!(!engine.is_available());
        assert_eq!(
            engine.predict(&RideInput::default()),
            Err(ModelUnavailable)
        );
        assert!(!engine.summary().loaded);
    }

    #[test]
    fn override_replaces_model_estimate_with_one_hot() {
        let input = RideInput {
            ride_distance_km: 150.0,
            booking_value: 10.0,
            ..RideInput::default()
        };

        let result = engine(0.05).predict(&input).expect("model loaded");
        assert!(result.override_triggered);
        assert_eq!(result.predicted_class, RideOutcome::Cancelled);
        assert_eq!(result.probability_cancelled, 1.0);
        assert_eq!(result.probability_completed, 0.0);
    }

    #[test]
    fn model_output_passes_through_without_override() {
        let result = engine(0.3)
            .predict(&RideInput::default())
            .expect("model loaded");
        assert!(!result.override_triggered);
        assert!(result.override_reason.is_none());
        assert_eq!(result.predicted_class, RideOutcome::Completed);
        assert!((result.probability_completed - 0.7).abs() < 1e-12);
        assert!(!result.schema_verified);
    }

    #[test]
    fn headline_reports_winning_class_likelihood() {
        let result = engine(0.973)
            .predict(&RideInput::default())
            .expect("model loaded");
        assert_eq!(result.headline(), "CANCELLED (97.3% likelihood)");
    }
}
