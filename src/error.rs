// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type shared by the façades and the HTTP backend.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Request rejected before any I/O.
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("{message}")]
    Auth {
        code: &'static str,
        status: u16,
        message: String,
    },

    #[error("{0}")]
    NotFound(String),

    /// Authenticated, but not the owner of the record.
    #[error("{0}")]
    Forbidden(String),

    /// Transport failure, or a mock fallback that still surfaces the failure.
    #[error("{0}")]
    Network(String),

    #[error("Invalid image IDs provided for reordering")]
    InvalidImageSet,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub const INVALID_CREDENTIALS: &'static str = "auth/invalid-credentials";
    pub const USERNAME_EXISTS: &'static str = "auth/username-exists";
    pub const EMAIL_EXISTS: &'static str = "auth/email-exists";
    pub const INVALID_TOKEN: &'static str = "auth/invalid-token";

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn invalid_credentials() -> Self {
        AppError::Auth {
            code: Self::INVALID_CREDENTIALS,
            status: 401,
            message: "Invalid credentials".to_string(),
        }
    }

    pub fn username_taken() -> Self {
        AppError::Auth {
            code: Self::USERNAME_EXISTS,
            status: 409,
            message: "Username already taken".to_string(),
        }
    }

    pub fn email_in_use() -> Self {
        AppError::Auth {
            code: Self::EMAIL_EXISTS,
            status: 409,
            message: "Email already in use".to_string(),
        }
    }

    pub fn invalid_token() -> Self {
        AppError::Auth {
            code: Self::INVALID_TOKEN,
            status: 401,
            message: "Invalid refresh token".to_string(),
        }
    }

    /// Auth error code, if this is an auth failure.
    pub fn auth_code(&self) -> Option<&'static str> {
        match self {
            AppError::Auth { code, .. } => Some(code),
            _ => None,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Validation { message, .. } => {
                (StatusCode::BAD_REQUEST, "validation_error", Some(message.clone()))
            }
            AppError::Auth {
                status, message, ..
            } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::UNAUTHORIZED),
                "auth_error",
                Some(message.clone()),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", Some(msg.clone())),
            AppError::Network(msg) => (StatusCode::BAD_GATEWAY, "network_error", Some(msg.clone())),
            AppError::InvalidImageSet => (
                StatusCode::BAD_REQUEST,
                "invalid_image_set",
                Some(self.to_string()),
            ),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for façades and handlers
pub type Result<T> = std::result::Result<T, AppError>;
