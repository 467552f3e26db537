//! Typed error handling for the shop
//!
//! Every service operation returns [`ShopError`]. Each variant maps to a
//! stable [`ErrorKind`], an HTTP status and an error code, so HTTP clients
//! and in-process callers can branch on the failure without parsing
//! messages.
//!
//! # Example
//!
//! ```rust,ignore
//! use shop::prelude::*;
//!
//! match catalog.get_product(&id).await {
//!     Ok(view) => println!("{}", view.product.name),
//!     Err(err) if err.kind() == ErrorKind::NotFound => println!("gone"),
//!     Err(err) => eprintln!("{}", err),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Coarse classification of a [`ShopError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    InvalidState,
    Conflict,
    Unauthorized,
    Forbidden,
    Storage,
}

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// The error type shared by every shop operation
#[derive(Debug, thiserror::Error)]
pub enum ShopError {
    /// A referenced entity does not exist, or is hidden from the caller
    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: &'static str, id: String },

    /// A single malformed or out-of-range input
    #[error("Invalid value for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    /// Several field violations collected from a payload
    #[error("Validation failed: {}", format_violations(.0))]
    InvalidFields(Vec<FieldViolation>),

    /// The operation is not allowed in the current state
    #[error("{0}")]
    InvalidState(String),

    /// A uniqueness constraint was violated
    #[error("{entity} with {field} '{value}' already exists")]
    Conflict {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// No caller identity was presented
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The caller's role is insufficient
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The persistence layer failed
    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

fn format_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ShopError {
    /// Shorthand for a not-found error on an entity id
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        ShopError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for a single-field input error
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        ShopError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ShopError::NotFound { .. } => ErrorKind::NotFound,
            ShopError::InvalidInput { .. } | ShopError::InvalidFields(_) => ErrorKind::InvalidInput,
            ShopError::InvalidState(_) => ErrorKind::InvalidState,
            ShopError::Conflict { .. } => ErrorKind::Conflict,
            ShopError::Unauthorized(_) => ErrorKind::Unauthorized,
            ShopError::Forbidden(_) => ErrorKind::Forbidden,
            ShopError::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::InvalidState => StatusCode::CONFLICT,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ShopError::NotFound { .. } => "NOT_FOUND",
            ShopError::InvalidInput { .. } => "INVALID_INPUT",
            ShopError::InvalidFields(_) => "VALIDATION_ERROR",
            ShopError::InvalidState(_) => "INVALID_STATE",
            ShopError::Conflict { .. } => "CONFLICT",
            ShopError::Unauthorized(_) => "UNAUTHORIZED",
            ShopError::Forbidden(_) => "FORBIDDEN",
            ShopError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.public_message(),
            details: self.details(),
        }
    }

    // Storage failures carry driver text that stays in the logs.
    fn public_message(&self) -> String {
        match self {
            ShopError::Storage(_) => "Storage error".to_string(),
            other => other.to_string(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ShopError::NotFound { entity, id } => Some(serde_json::json!({
                "entity": entity,
                "id": id
            })),
            ShopError::InvalidInput { field, .. } => Some(serde_json::json!({ "field": field })),
            ShopError::InvalidFields(violations) => {
                Some(serde_json::json!({ "fields": violations }))
            }
            ShopError::Conflict { field, value, .. } => Some(serde_json::json!({
                "field": field,
                "value": value
            })),
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for ShopError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut violations: Vec<FieldViolation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                let field = field.to_string();
                errs.iter().map(move |e| FieldViolation {
                    field: field.clone(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        violations.sort_by(|a, b| a.field.cmp(&b.field));
        ShopError::InvalidFields(violations)
    }
}

impl IntoResponse for ShopError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.error_code(), error = %self, "request rejected");
        }
        (status, Json(self.to_response())).into_response()
    }
}

/// A specialized Result type for shop operations
pub type ShopResult<T> = Result<T, ShopError>;
