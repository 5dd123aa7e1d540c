use std::sync::Arc;

use super::domain::RideInput;
use super::engine::{ModelSummary, ModelUnavailable, PredictionEngine};
use super::report::{to_csv_bytes, ExportError, PredictionReport};
use super::session::{SessionId, SessionStore, SessionStoreError};

/// Service composing the prediction engine with per-session state.
pub struct PredictionService<S> {
    engine: Arc<PredictionEngine>,
    sessions: Arc<S>,
}

impl<S> PredictionService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(engine: Arc<PredictionEngine>, sessions: Arc<S>) -> Self {
        Self { engine, sessions }
    }

    pub fn model_summary(&self) -> ModelSummary {
        self.engine.summary()
    }

    /// Run the pipeline for a submission and retain the report in the session.
    pub fn submit(
        &self,
        session_id: &SessionId,
        input: RideInput,
    ) -> Result<PredictionReport, PredictionServiceError> {
        let mut session = self.sessions.fetch(session_id)?.unwrap_or_default();
        session.mark_interacted();

        let result = match self.engine.predict(&input) {
            Ok(result) => result,
            Err(unavailable) => {
                self.sessions.save(session_id.clone(), session)?;
                return Err(unavailable.into());
            }
        };

        let report = PredictionReport::new(input, result);
        session.record(report.clone());
        self.sessions.save(session_id.clone(), session)?;
        Ok(report)
    }

    pub fn latest(&self, session_id: &SessionId) -> Result<PredictionReport, PredictionServiceError> {
        self.sessions
            .fetch(session_id)?
            .and_then(|session| session.last_result)
            .ok_or(PredictionServiceError::Export(ExportError::NoResult))
    }

    pub fn export_csv(&self, session_id: &SessionId) -> Result<Vec<u8>, PredictionServiceError> {
        let report = self.latest(session_id)?;
        Ok(to_csv_bytes(&report)?)
    }
}

/// Error raised by the prediction service.
#[derive(Debug, thiserror::Error)]
pub enum PredictionServiceError {
    #[error(transparent)]
    Unavailable(#[from] ModelUnavailable),
    #[error(transparent)]
    Session(#[from] SessionStoreError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
