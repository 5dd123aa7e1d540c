use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use super::domain::RideInput;
use super::service::PredictionService;
use super::session::{SessionId, SessionStore};
use crate::error::AppError;

/// Router builder exposing the prediction endpoints.
pub fn prediction_router<S>(service: Arc<PredictionService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/model", get(model_handler::<S>))
        .route(
            "/api/v1/sessions/:session_id/predictions",
            post(predict_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/predictions/latest",
            get(latest_handler::<S>),
        )
        .route(
            "/api/v1/sessions/:session_id/export.csv",
            get(export_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn model_handler<S>(State(service): State<Arc<PredictionService<S>>>) -> Response
where
    S: SessionStore + 'static,
{
    (StatusCode::OK, Json(service.model_summary())).into_response()
}

pub(crate) async fn predict_handler<S>(
    State(service): State<Arc<PredictionService<S>>>,
    Path(session_id): Path<String>,
    Json(input): Json<RideInput>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    input.check_form_ranges()?;
    let report = service.submit(&SessionId(session_id), input)?;
    Ok((StatusCode::OK, Json(report)).into_response())
}

pub(crate) async fn latest_handler<S>(
    State(service): State<Arc<PredictionService<S>>>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let report = service.latest(&SessionId(session_id))?;
    Ok((StatusCode::OK, Json(report)).into_response())
}

pub(crate) async fn export_handler<S>(
    State(service): State<Arc<PredictionService<S>>>,
    Path(session_id): Path<String>,
) -> Result<Response, AppError>
where
    S: SessionStore + 'static,
{
    let bytes = service.export_csv(&SessionId(session_id))?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"ride_prediction.csv\"",
            ),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::engine::PredictionEngine;
    use crate::prediction::session::{PredictionSession, SessionStoreError};
    use axum::body::{to_bytes, Body};
    use serde_json::Value;
    use tower::ServiceExt;

    struct UnavailableStore;

    impl SessionStore for UnavailableStore {
        fn fetch(&self, _: &SessionId) -> Result<Option<PredictionSession>, SessionStoreError> {
            Err(SessionStoreError::Unavailable("store offline".to_string()))
        }

        fn save(&self, _: SessionId, _: PredictionSession) -> Result<(), SessionStoreError> {
            Err(SessionStoreError::Unavailable("store offline".to_string()))
        }
    }

    fn service() -> Arc<PredictionService<UnavailableStore>> {
        Arc::new(PredictionService::new(
            Arc::new(PredictionEngine::new(None)),
            Arc::new(UnavailableStore),
        ))
    }

    #[tokio::test]
    async fn predict_handler_returns_internal_error_when_store_fails() {
        let response = predict_handler::<UnavailableStore>(
            State(service()),
            Path("s1".to_string()),
            Json(RideInput::default()),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn predict_handler_rejects_out_of_range_input_before_touching_sessions() {
        let input = RideInput {
            ride_distance_km: -40.0,
            booking_value: -500.0,
            hour_of_day: 200,
            driver_rating: 9.0,
            customer_rating: 42.0,
            ..RideInput::default()
        };

        let result = predict_handler::<UnavailableStore>(
            State(service()),
            Path("s1".to_string()),
            Json(input),
        )
        .await;

        match result {
            Err(AppError::InvalidInput(error)) => assert_eq!(error.field, "ride_distance_km"),
            other => panic!("expected invalid input, got {:?}", other.map(|r| r.status())),
        }
    }

    #[tokio::test]
    async fn model_route_reports_degraded_mode() {
        let response = prediction_router(service())
            .oneshot(
                axum::http::Request::get("/api/v1/model")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["loaded"], false);
    }
}
