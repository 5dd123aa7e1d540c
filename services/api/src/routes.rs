use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use ride_cancel::prediction::{prediction_router, PredictionService, SessionStore};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_prediction_routes<S>(service: Arc<PredictionService<S>>) -> axum::Router
where
    S: SessionStore + 'static,
{
    prediction_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{load_engine, InMemorySessionStore};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use ride_cancel::prediction::PredictionEngine;
    use std::path::Path;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    const FIXTURE: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../crates/ride-cancel/tests/fixtures/ride_cancel_model.json"
    );

    fn app(engine: PredictionEngine, ready: bool) -> axum::Router {
        let service = Arc::new(PredictionService::new(
            Arc::new(engine),
            Arc::new(InMemorySessionStore::default()),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_prediction_routes(service).layer(Extension(state))
    }

    fn loaded_app() -> axum::Router {
        app(load_engine(Path::new(FIXTURE)).expect("fixture loads"), true)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    fn predict_request(session: &str, payload: serde_json::Value) -> Request<Body> {
        Request::post(format!("/api/v1/sessions/{session}/predictions"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request builds")
    }

    #[tokio::test]
    async fn readiness_reflects_flag() {
        let response = app(PredictionEngine::new(None), false)
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = loaded_app()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn prediction_endpoint_applies_overrides() {
        let payload = json!({
            "ride_distance_km": 150.0,
            "vehicle_type": "Go Sedan",
            "booking_value": 20.0,
            "payment_method": "UPI",
            "hour_of_day": 14,
            "driver_rating": 4.8,
            "customer_rating": 4.7
        });
        let response = loaded_app()
            .oneshot(predict_request("s1", payload))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["result"]["predicted_class"], "cancelled");
        assert_eq!(body["result"]["override_triggered"], true);
        assert_eq!(body["result"]["probability_cancelled"], 1.0);
    }

    #[tokio::test]
    async fn prediction_endpoint_rejects_values_outside_form_limits() {
        let app = loaded_app();
        let payload = json!({
            "ride_distance_km": -40.0,
            "vehicle_type": "Auto",
            "booking_value": -500.0,
            "payment_method": "Cash",
            "hour_of_day": 200,
            "driver_rating": 9.0,
            "customer_rating": 42.0
        });
        let response = app
            .clone()
            .oneshot(predict_request("p", payload))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        let message = body["error"].as_str().expect("error message");
        assert!(message.contains("ride_distance_km"));

        let response = app
            .oneshot(
                Request::get("/api/v1/sessions/p/predictions/latest")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn degraded_service_reports_unavailable() {
        let payload = serde_json::to_value(ride_cancel::prediction::RideInput::default())
            .expect("input serializes");
        let response = app(PredictionEngine::new(None), true)
            .oneshot(predict_request("s1", payload))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn export_requires_a_prior_prediction() {
        let app = loaded_app();
        let response = app
            .clone()
            .oneshot(
                Request::get("/api/v1/sessions/s2/export.csv")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let payload = serde_json::to_value(ride_cancel::prediction::RideInput::default())
            .expect("input serializes");
        let response = app
            .clone()
            .oneshot(predict_request("s2", payload))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::get("/api/v1/sessions/s2/export.csv")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).expect("type"),
            "text/csv"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        let csv = String::from_utf8(bytes.to_vec()).expect("utf8");
        assert!(csv.starts_with(
            "prediction,prob_completed,prob_cancelled,override_triggered,override_reason,confidence,notes"
        ));
    }
}
