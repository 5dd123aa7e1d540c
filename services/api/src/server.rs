use crate::cli::ServeArgs;
use crate::infra::{load_engine, AppState, InMemorySessionStore};
use crate::routes::with_prediction_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use ride_cancel::config::AppConfig;
use ride_cancel::error::AppError;
use ride_cancel::prediction::PredictionService;
use ride_cancel::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(model) = args.model.take() {
        config.model.path = model;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = load_engine(&config.model.path)?;
    if !engine.is_available() {
        warn!(
            path = %config.model.path.display(),
            "serving without a model; prediction requests will return 503"
        );
    }

    let sessions = Arc::new(InMemorySessionStore::default());
    let prediction_service = Arc::new(PredictionService::new(Arc::new(engine), sessions));

    let app = with_prediction_routes(prediction_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "ride cancellation predictor ready");

    axum::serve(listener, app).await?;
    Ok(())
}
