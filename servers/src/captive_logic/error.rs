use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lib_captive::{RegistryError, ValidationError};
use serde_json::json;
use tracing::{error, warn};

/// # Application Error
///
/// Everything a handler can fail with, mapped onto the HTTP status codes of
/// the captive portal API.
#[derive(Debug)]
pub enum AppError {
    /// Failure reported by the registry facade.
    Registry(RegistryError),
    /// The store did not answer a health check.
    Unavailable(RegistryError),
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        AppError::Registry(err)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Registry(RegistryError::Validation(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_json) = match self {
            AppError::Registry(RegistryError::Validation(e)) => {
                warn!("Rejected request: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error_type": "ValidationError",
                        "message": "The request is missing or has an invalid client identifier.",
                        "detail": e.to_string()
                    }),
                )
            }
            AppError::Registry(RegistryError::NotFound(identifier)) => {
                warn!(identifier = %identifier, "Operation on unknown client");
                (
                    StatusCode::NOT_FOUND,
                    json!({
                        "error_type": "NotFoundError",
                        "message": "No client with this identifier has been seen.",
                        "detail": identifier
                    }),
                )
            }
            AppError::Registry(RegistryError::Storage(e)) => {
                error!("Storage error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error_type": "StorageError",
                        "message": "The client store failed to complete the operation.",
                        "detail": e.to_string()
                    }),
                )
            }
            AppError::Unavailable(e) => {
                error!("Health check failed: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({
                        "error_type": "StorageUnavailable",
                        "message": "The client store is unreachable.",
                        "detail": e.to_string()
                    }),
                )
            }
        };
        (status, Json(error_json)).into_response()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Registry(e) => write!(f, "{}", e),
            AppError::Unavailable(e) => write!(f, "Store unavailable: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Registry(e) | AppError::Unavailable(e) => Some(e),
        }
    }
}
