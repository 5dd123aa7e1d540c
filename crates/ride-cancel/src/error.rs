use crate::config::ConfigError;
use crate::prediction::{
    ExportError, ModelLoadError, ModelUnavailable, OutOfRange, PredictionServiceError,
    SessionStoreError,
};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Model(ModelLoadError),
    InvalidInput(OutOfRange),
    Unavailable(ModelUnavailable),
    Export(ExportError),
    Session(SessionStoreError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Model(err) => write!(f, "model error: {}", err),
            AppError::InvalidInput(err) => write!(f, "invalid ride input: {}", err),
            AppError::Unavailable(err) => write!(f, "{}", err),
            AppError::Export(err) => write!(f, "export error: {}", err),
            AppError::Session(err) => write!(f, "session error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Model(err) => Some(err),
            AppError::InvalidInput(err) => Some(err),
            AppError::Unavailable(err) => Some(err),
            AppError::Export(err) => Some(err),
            AppError::Session(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Export(ExportError::NoResult) => StatusCode::NOT_FOUND,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Model(_)
            | AppError::Export(_)
            | AppError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ModelLoadError> for AppError {
    fn from(value: ModelLoadError) -> Self {
        Self::Model(value)
    }
}

impl From<OutOfRange> for AppError {
    fn from(value: OutOfRange) -> Self {
        Self::InvalidInput(value)
    }
}

impl From<PredictionServiceError> for AppError {
    fn from(value: PredictionServiceError) -> Self {
        match value {
            PredictionServiceError::Unavailable(err) => Self::Unavailable(err),
            PredictionServiceError::Session(err) => Self::Session(err),
            PredictionServiceError::Export(err) => Self::Export(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prediction::RideInput;

    #[test]
    fn unavailable_model_maps_to_service_unavailable() {
        let error = AppError::from(PredictionServiceError::Unavailable(ModelUnavailable));
        assert_eq!(error.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn missing_export_maps_to_not_found() {
        let error = AppError::from(PredictionServiceError::Export(ExportError::NoResult));
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn out_of_range_input_maps_to_unprocessable_entity() {
        let range_error = RideInput {
            driver_rating: 9.0,
            ..RideInput::default()
        }
        .check_form_ranges()
        .expect_err("rating out of range");

        let error = AppError::from(range_error);
        assert!(error.to_string().contains("driver_rating"));
        assert_eq!(
            error.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn session_failures_map_to_internal_error() {
        let error = AppError::from(PredictionServiceError::Session(
            SessionStoreError::Unavailable("offline".to_string()),
        ));
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
