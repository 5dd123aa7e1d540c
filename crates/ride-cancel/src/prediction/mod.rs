//! Ride cancellation prediction pipeline.
//!
//! A submission flows through [`features::build`], [`encoding::encode`] and the
//! [`overrides::OverrideEngine`] before the classifier is consulted; the
//! resulting [`PredictionResult`] is explained and retained per session.

pub mod domain;
pub mod encoding;
mod engine;
pub mod explanation;
pub mod features;
pub mod model;
pub mod overrides;
pub mod report;
mod router;
mod service;
pub mod session;

pub use domain::{
    ClassProbabilities, DayOfWeek, OutOfRange, PaymentMethod, RideInput, RideOutcome, VehicleType,
};
pub use encoding::{EncodedFeatureVector, SchemaAlignment};
pub use engine::{predict_with, ModelSummary, ModelUnavailable, PredictionEngine, PredictionResult};
pub use explanation::{ConfidenceTier, Explanation};
pub use model::{CancellationModel, FeatureImportance, LogisticModel, ModelLoadError};
pub use overrides::{Override, OverrideConfig, OverrideEngine, OverrideRule};
pub use report::{ExportError, PredictionReport};
pub use router::prediction_router;
pub use service::{PredictionService, PredictionServiceError};
pub use session::{PredictionSession, SessionId, SessionStore, SessionStoreError};
