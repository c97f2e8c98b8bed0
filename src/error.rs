use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::response::{ApiResponse, Meta};

/// A single rejected form field, surfaced so the caller can re-render the
/// form with per-field messages.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Quantity limit exceeded: {0}")]
    QuantityLimitExceeded(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    // Surfaced to the user as a generic retryable failure; the checkout
    // transaction has already been rolled back when this is returned.
    #[error("Database error")]
    Db(#[from] sqlx::Error),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<FieldError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::InvalidQuantity(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::QuantityLimitExceeded(_) => (StatusCode::CONFLICT, self.to_string()),
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            AppError::Db(err) => {
                tracing::error!(error = %err, "database failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A temporary error occurred, please retry".to_string(),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal failure");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        };

        let fields = match &self {
            AppError::Validation(fields) => Some(fields.clone()),
            _ => None,
        };

        let body = ApiResponse {
            message,
            data: Some(ErrorData {
                error: self.to_string(),
                fields,
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
