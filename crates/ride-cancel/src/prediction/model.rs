use super::domain::{ClassProbabilities, RideOutcome};
use super::encoding::EncodedFeatureVector;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Capability set every classifier adapter exposes to the pipeline.
pub trait CancellationModel: Send + Sync {
    /// Ordered feature columns the model was fit on, when it declares them.
    fn expected_features(&self) -> Option<&[String]>;
    fn predict(&self, features: &EncodedFeatureVector) -> RideOutcome;
    fn predict_proba(&self, features: &EncodedFeatureVector) -> ClassProbabilities;

    fn feature_importances(&self) -> Option<Vec<FeatureImportance>> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub weight: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid model artifact JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("inconsistent model artifact: {0}")]
    Invalid(String),
}

/// On-disk shape of a fitted logistic-regression classifier.
#[derive(Debug, Clone, Deserialize)]
struct ModelArtifact {
    intercept: f64,
    #[serde(default)]
    feature_names_in: Option<Vec<String>>,
    #[serde(default)]
    coefficients: Vec<f64>,
    #[serde(default)]
    weights: HashMap<String, f64>,
    #[serde(default)]
    feature_importances: Option<Vec<f64>>,
    #[serde(default = "default_threshold")]
    threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

/// Logistic-regression adapter over the JSON model artifact.
#[derive(Debug, Clone)]
pub struct LogisticModel {
    intercept: f64,
    feature_names_in: Option<Vec<String>>,
    weights: HashMap<String, f64>,
    importances: Vec<FeatureImportance>,
    threshold: f64,
}

impl LogisticModel {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelLoadError> {
        let artifact: ModelArtifact = serde_json::from_reader(reader)?;
        Self::from_artifact(artifact)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelLoadError> {
        if !(0.0..=1.0).contains(&artifact.threshold) {
            return Err(ModelLoadError::Invalid(format!(
                "threshold {} outside [0, 1]",
                artifact.threshold
            )));
        }

        let (weights, ordered_names) = match &artifact.feature_names_in {
            Some(names) => {
                if names.len() != artifact.coefficients.len() {
                    return Err(ModelLoadError::Invalid(format!(
                        "{} feature names but {} coefficients",
                        names.len(),
                        artifact.coefficients.len()
                    )));
                }
                let weights: HashMap<String, f64> = names
                    .iter()
                    .cloned()
                    .zip(artifact.coefficients.iter().copied())
                    .collect();
                (weights, names.clone())
            }
            None => {
                if artifact.weights.is_empty() {
                    return Err(ModelLoadError::Invalid(
                        "artifact carries neither feature_names_in nor weights".to_string(),
                    ));
                }
                let mut names: Vec<String> = artifact.weights.keys().cloned().collect();
                names.sort();
                (artifact.weights.clone(), names)
            }
        };

        let importances = match artifact.feature_importances {
            Some(values) => {
                if values.len() != ordered_names.len() {
                    return Err(ModelLoadError::Invalid(format!(
                        "{} feature importances for {} features",
                        values.len(),
                        ordered_names.len()
                    )));
                }
                ordered_names
                    .iter()
                    .cloned()
                    .zip(values)
                    .map(|(feature, weight)| FeatureImportance { feature, weight })
                    .collect()
            }
            None => normalized_magnitudes(&ordered_names, &weights),
        };

        Ok(Self {
            intercept: artifact.intercept,
            feature_names_in: artifact.feature_names_in,
            weights,
            importances,
            threshold: artifact.threshold,
        })
    }

    fn cancel_probability(&self, features: &EncodedFeatureVector) -> f64 {
        let z = features
            .iter()
            .fold(self.intercept, |acc, (column, value)| {
                acc + self.weights.get(column).copied().unwrap_or(0.0) * value
            });
        1.0 / (1.0 + (-z).exp())
    }
}

fn normalized_magnitudes(
    names: &[String],
    weights: &HashMap<String, f64>,
) -> Vec<FeatureImportance> {
    let total: f64 = names
        .iter()
        .filter_map(|name| weights.get(name))
        .map(|weight| weight.abs())
        .sum();

    names
        .iter()
        .map(|name| {
            let magnitude = weights.get(name).map(|w| w.abs()).unwrap_or(0.0);
            FeatureImportance {
                feature: name.clone(),
                weight: if total > 0.0 { magnitude / total } else { 0.0 },
            }
        })
        .collect()
}

impl CancellationModel for LogisticModel {
    fn expected_features(&self) -> Option<&[String]> {
        self.feature_names_in.as_deref()
    }

    fn predict(&self, features: &EncodedFeatureVector) -> RideOutcome {
        if self.cancel_probability(features) >= self.threshold {
            RideOutcome::Cancelled
        } else {
            RideOutcome::Completed
        }
    }

    fn predict_proba(&self, features: &EncodedFeatureVector) -> ClassProbabilities {
        let cancelled = self.cancel_probability(features);
        ClassProbabilities {
            completed: 1.0 - cancelled,
            cancelled,
        }
    }

    fn feature_importances(&self) -> Option<Vec<FeatureImportance>> {
        Some(self.importances.clone())
    }
}

/// Load the artifact at `path`, treating a missing file as "no model".
pub fn load_optional<P: AsRef<Path>>(
    path: P,
) -> Result<Option<Arc<dyn CancellationModel>>, ModelLoadError> {
    let path = path.as_ref();
    if !path.exists() {
        warn!(path = %path.display(), "model artifact not found; predictions unavailable");
        return Ok(None);
    }

    let model = LogisticModel::from_path(path)?;
    info!(
        path = %path.display(),
        features = ?model.expected_features().map(<[String]>::len),
        "model artifact loaded"
    );
    Ok(Some(Arc::new(model)))
}
