//! Unified Error Handling
//!
//! Provides application-wide error types and response structures:
//! - [`AppError`] - application error enum
//! - [`AppResponse`] - API response envelope
//!
//! # Error code ranges
//!
//! | Prefix | Category | Example |
//! |--------|----------|---------|
//! | E0xxx  | Business | E0003 not found |
//! | E2xxx  | Permission | E2001 forbidden |
//! | E3xxx  | Authentication | E3001 not logged in |
//! | E9xxx  | System | E9002 database error |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use shared::models::OrderStatus;
use tracing::error;

use crate::db::repository::RepoError;

/// Unified API response structure
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// Application-level error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== Authentication Errors ==========
    #[error("Authentication required")]
    Unauthorized,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Permission denied: {0}")]
    Forbidden(String),

    // ========== Business Logic Errors ==========
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource already exists: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Illegal status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    // ========== System Errors ==========
    #[error("Transient persistence failure: {0}")]
    Transient(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, data) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "E3001",
                "Please login first".to_string(),
                None,
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "E3003",
                "Token expired".to_string(),
                None,
            ),
            AppError::InvalidToken(_) => (
                StatusCode::UNAUTHORIZED,
                "E3002",
                "Invalid token".to_string(),
                None,
            ),

            // Authorization errors (403)
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "E2001", msg.clone(), None),

            // Not found (404)
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.clone(), None),

            // Conflict (409)
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "E0004", msg.clone(), None),

            // Validation (400)
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.clone(), None),

            // Illegal transition (400, both endpoints reported)
            AppError::InvalidTransition { from, to } => (
                StatusCode::BAD_REQUEST,
                "E0007",
                format!("Illegal status transition: {from} -> {to}"),
                Some(serde_json::json!({ "from": from, "to": to })),
            ),

            // Transient persistence errors (500, already retried internally)
            AppError::Transient(msg) => {
                error!(target: "database", error = %msg, "Transient persistence failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9003",
                    "Temporary storage contention, please retry".to_string(),
                    None,
                )
            }

            // Database errors (500)
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Database error".to_string(),
                    None,
                )
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(AppResponse::<serde_json::Value> {
            code: code.to_string(),
            message,
            data,
        });

        (status, body).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn unauthorized() -> Self {
        Self::Unauthorized
    }

    pub fn token_expired() -> Self {
        Self::TokenExpired
    }

    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::InvalidToken(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn invalid_transition(from: OrderStatus, to: OrderStatus) -> Self {
        Self::InvalidTransition { from, to }
    }
}

// ========== Conversions ==========

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Duplicate(msg) => AppError::Conflict(msg),
            RepoError::Busy(msg) => AppError::Transient(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}
