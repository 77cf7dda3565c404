use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use tracing::{error, warn};
use validator::ValidationErrors;

use crate::db::store::StoreError;

use super::validation::{request_rejected, validation_failed, ErrorResponse};

const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";

/// Request-scoped failures surfaced to API callers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("authentication credentials were not provided")]
    Unauthorized,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("malformed request body: {0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn forbidden() -> Self {
        ApiError::Forbidden(PERMISSION_DENIED.to_string())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Unauthorized => HttpResponse::Unauthorized().json(ErrorResponse {
                error: "Not authenticated".to_string(),
                fields: serde_json::json!({"detail": "Authentication credentials were not provided."}),
            }),
            ApiError::Forbidden(detail) => HttpResponse::Forbidden().json(ErrorResponse {
                error: "Permission denied".to_string(),
                fields: serde_json::json!({"detail": detail}),
            }),
            ApiError::Validation(errors) => {
                warn!("Validation error: {}", errors);
                validation_failed(errors)
            }
            ApiError::BadRequest(message) => {
                warn!("Rejected request body: {}", message);
                request_rejected(message)
            }
            ApiError::NotFound(kind) => HttpResponse::NotFound().json(ErrorResponse {
                error: "Not found".to_string(),
                fields: serde_json::json!({"detail": format!("{} not found", kind)}),
            }),
            ApiError::Store(e) => {
                error!("Database error: {}", e);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Database error occurred"}),
                })
            }
        }
    }
}
