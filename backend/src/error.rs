//! Error handling for the POS back office
//!
//! Every failure is rendered as `{ "message", "code", "data": null }` so
//! callers can detect errors by a null `data` field.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Business rule errors
    #[error("Customer credit limit exceeded")]
    CreditLimitExceeded {
        customer_id: Uuid,
        requested: rust_decimal::Decimal,
        available: rust_decimal::Decimal,
    },

    #[error("Insufficient stock for product {product_id}: resulting quantity {resulting}")]
    InsufficientStock { product_id: Uuid, resulting: i32 },

    #[error("Failed to update stock for product {0}")]
    StockUpdate(Uuid),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub data: Option<()>,
}

impl AppError {
    /// A stock delta that would push `stock_qty` outside its integer range
    pub fn stock_out_of_range(product_id: Uuid) -> Self {
        AppError::Validation {
            field: "quantity".to_string(),
            message: format!("Stock quantity for product {} is out of range", product_id),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. }
            | AppError::ValidationError(_)
            | AppError::InsufficientStock { .. }
            | AppError::StockUpdate(_) => StatusCode::BAD_REQUEST,
            AppError::CreditLimitExceeded { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::Internal(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } | AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::Conflict(_) => "CONFLICT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::CreditLimitExceeded { .. } => "CREDIT_LIMIT_EXCEEDED",
            AppError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            AppError::StockUpdate(_) => "STOCK_UPDATE_FAILED",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::Internal(_) | AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, field) = match &self {
            AppError::Validation { field, message } => (message.clone(), Some(field.clone())),
            AppError::ValidationError(msg) => (msg.clone(), None),
            AppError::Conflict(msg) => (msg.clone(), None),
            AppError::NotFound(resource) => (format!("{} not found", resource), None),
            AppError::CreditLimitExceeded { .. } => {
                ("Customer credit limit exceeded".to_string(), None)
            }
            AppError::InsufficientStock { product_id, .. } => (
                format!("Insufficient stock for product {}", product_id),
                None,
            ),
            AppError::StockUpdate(_) => ("Failed to update stock for product".to_string(), None),
            AppError::DatabaseError(_) | AppError::Internal(_) | AppError::InternalError(_) => {
                ("Internal server error".to_string(), None)
            }
        };

        // Log the error for debugging
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        let body = ErrorResponse {
            message,
            code: self.code().to_string(),
            field,
            data: None,
        };
        (status, Json(body)).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|f| f.to_string())
            .unwrap_or_default();
        AppError::Validation {
            field,
            message: errors.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation {
            field: "body".to_string(),
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation {
            field: "id".to_string(),
            message: rejection.body_text(),
        }
    }
}

impl From<shared::QuantityOverflow> for AppError {
    fn from(overflow: shared::QuantityOverflow) -> Self {
        AppError::Validation {
            field: "quantity".to_string(),
            message: overflow.to_string(),
        }
    }
}

impl From<shared::SummaryMismatch> for AppError {
    fn from(mismatch: shared::SummaryMismatch) -> Self {
        AppError::Validation {
            field: mismatch.field.to_string(),
            message: mismatch.message,
        }
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
