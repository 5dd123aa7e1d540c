use metrics_exporter_prometheus::PrometheusHandle;
use ride_cancel::error::AppError;
use ride_cancel::prediction::domain::{check_range, limits};
use ride_cancel::prediction::model::load_optional;
use ride_cancel::prediction::{
    PredictionEngine, PredictionSession, SessionId, SessionStore, SessionStoreError,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, PredictionSession>>>,
}

impl SessionStore for InMemorySessionStore {
    fn fetch(&self, id: &SessionId) -> Result<Option<PredictionSession>, SessionStoreError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|_| SessionStoreError::Unavailable("session mutex poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn save(&self, id: SessionId, session: PredictionSession) -> Result<(), SessionStoreError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|_| SessionStoreError::Unavailable("session mutex poisoned".to_string()))?;
        guard.insert(id, session);
        Ok(())
    }
}

/// Build an engine from the artifact at `path`; a missing file yields a degraded engine.
pub(crate) fn load_engine(path: &Path) -> Result<PredictionEngine, AppError> {
    let model = load_optional(path)?;
    Ok(PredictionEngine::new(model))
}

pub(crate) fn parse_distance(raw: &str) -> Result<f64, String> {
    parse_bounded(raw, "distance", limits::DISTANCE_KM)
}

pub(crate) fn parse_booking_value(raw: &str) -> Result<f64, String> {
    parse_bounded(raw, "booking value", limits::BOOKING_VALUE)
}

pub(crate) fn parse_rating(raw: &str) -> Result<f64, String> {
    parse_bounded(raw, "rating", limits::RATING)
}

fn parse_bounded(raw: &str, field: &'static str, bounds: (f64, f64)) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as a number ({err})"))?;
    check_range(field, value, bounds).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_parsers_enforce_form_ranges() {
        assert_eq!(parse_distance("12.5"), Ok(12.5));
        assert!(parse_distance("-1").is_err());
        assert!(parse_distance("501").is_err());
        assert_eq!(parse_booking_value(" 10000 "), Ok(10_000.0));
        assert_eq!(
            parse_rating("0.5"),
            Err("rating must be between 1 and 5, got 0.5".to_string())
        );
        assert!(parse_rating("five").is_err());
    }

    #[test]
    fn session_store_keeps_sessions_apart() {
        let store = InMemorySessionStore::default();
        let session = PredictionSession {
            user_interacted: true,
            ..PredictionSession::default()
        };
        store
            .save(SessionId("a".to_string()), session.clone())
            .expect("save");

        assert_eq!(
            store.fetch(&SessionId("a".to_string())).expect("fetch"),
            Some(session)
        );
        assert!(store
            .fetch(&SessionId("b".to_string()))
            .expect("fetch")
            .is_none());
    }

    #[test]
    fn missing_artifact_yields_degraded_engine() {
        let engine = load_engine(Path::new("/nonexistent/ride_cancel_model.json"))
            .expect("missing file is not an error");
        assert!(!engine.is_available());
    }
}
