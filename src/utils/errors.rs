//! Error handling
//!
//! Every error the HTTP layer can produce, and how each one maps to a
//! status code and a `{success: false, error, code}` payload.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Main application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {}", summarize_validation(.0))]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Failure payload returned to the client
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Storage(_) => StatusCode::BAD_GATEWAY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DB_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        let (message, details) = match self {
            AppError::Database(e) => {
                error!("❌ Database error: {}", e);
                (
                    "An error occurred while accessing the database".to_string(),
                    Some(json!({ "sql_error": e.to_string() })),
                )
            }
            AppError::Validation(e) => {
                warn!("⚠️ Validation error: {}", e);
                (summarize_validation(&e), Some(json!(e)))
            }
            AppError::NotFound(msg) => {
                warn!("🔍 Resource not found: {}", msg);
                (msg, None)
            }
            AppError::Conflict(msg) => {
                warn!("⚠️ Conflict: {}", msg);
                (msg, None)
            }
            AppError::BadRequest(msg) => {
                warn!("⚠️ Bad request: {}", msg);
                (msg, None)
            }
            AppError::Storage(msg) => {
                error!("❌ Storage error: {}", msg);
                (
                    "An error occurred while uploading the document".to_string(),
                    Some(json!({ "storage_error": msg })),
                )
            }
            AppError::Internal(msg) => {
                error!("❌ Internal error: {}", msg);
                (
                    "An unexpected error occurred".to_string(),
                    Some(json!({ "internal_error": msg })),
                )
            }
        };

        let body = ErrorResponse {
            success: false,
            error: message,
            code,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Typed result for fallible operations
pub type AppResult<T> = Result<T, AppError>;

/// Flatten validator errors into `field: message` lines, sorted by field
fn summarize_validation(errors: &validator::ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let message = errs
                .iter()
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "is invalid".to_string());
            format!("{}: {}", field, message)
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

/// Missing required field
pub fn required_field_error(field: &str) -> AppError {
    AppError::BadRequest(format!("{} is required", field))
}

/// Resource not found by id
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Duplicate on create
pub fn conflict_error(resource: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} '{}' already exists", resource, value))
}

/// Turn a unique-constraint violation into a conflict, keep everything else
pub fn map_unique_violation(err: sqlx::Error, resource: &str, value: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return conflict_error(resource, value);
        }
    }
    AppError::Database(err)
}
