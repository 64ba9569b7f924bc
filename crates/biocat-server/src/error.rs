//! Server-wide error type and its HTTP mapping

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::api::response::ErrorResponse;
use crate::features::shared::InvalidFields;
use crate::store::StoreError;

/// Errors surfaced by the HTTP layer
///
/// | Variant | Status | Code |
/// |---|---|---|
/// | `Validation` | 400 | `VALIDATION_ERROR` |
/// | `NotFound` | 404 | `NOT_FOUND` |
/// | `Conflict` | 409 | `CONFLICT` |
/// | `UndefinedCoverage` | 422 | `UNDEFINED_COVERAGE` |
/// | `Store`, `Internal` | 500 | `INTERNAL_ERROR` |
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        fields: InvalidFields,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{0}")]
    UndefinedCoverage(String),

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            fields: InvalidFields::default(),
        }
    }

    /// Validation error listing every missing or over-long field path
    pub fn invalid_fields(fields: InvalidFields) -> Self {
        Self::Validation {
            message: fields.to_string(),
            fields,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::UndefinedCoverage(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Store(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::UndefinedCoverage(_) => "UNDEFINED_COVERAGE",
            AppError::Store(_) | AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation { .. } => AppError::Conflict(err.to_string()),
            other => AppError::Store(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let body = match self {
            AppError::Validation { message, fields } if !fields.is_empty() => {
                let mut details = serde_json::Map::new();
                if !fields.missing.is_empty() {
                    details.insert("missing".to_string(), json!(fields.missing));
                }
                if !fields.too_long.is_empty() {
                    details.insert("too_long".to_string(), json!(fields.too_long));
                }
                ErrorResponse::with_details(code, message, details.into())
            },
            AppError::Store(ref e) => {
                tracing::error!(error = %e, "Store error");
                ErrorResponse::new(code, "A database error occurred")
            },
            AppError::Internal(ref message) => {
                tracing::error!("Internal error: {}", message);
                ErrorResponse::new(code, "An internal error occurred")
            },
            other => ErrorResponse::new(code, other.to_string()),
        };

        (status, Json(body)).into_response()
    }
}
