use super::report::PredictionReport;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for one browser or API session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-session context. Never shared across sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionSession {
    pub last_result: Option<PredictionReport>,
    pub user_interacted: bool,
}

impl PredictionSession {
    pub fn mark_interacted(&mut self) {
        self.user_interacted = true;
    }

    /// Replace the retained report with the latest submission.
    pub fn record(&mut self, report: PredictionReport) {
        self.last_result = Some(report);
    }
}

/// Storage abstraction for session contexts.
pub trait SessionStore: Send + Sync {
    fn fetch(&self, id: &SessionId) -> Result<Option<PredictionSession>, SessionStoreError>;
    fn save(&self, id: SessionId, session: PredictionSession) -> Result<(), SessionStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
