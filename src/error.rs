use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::MessageResponse;

/// ApiError
///
/// Failure outcomes of the session issuer, each with a fixed status and message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Incorrect password")]
    IncorrectPassword,
    /// `PAGE_ACCESS_PASSWORD` is not configured. A server fault, not a client one.
    #[error("Internal server error")]
    SecretNotConfigured,
    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::IncorrectPassword => StatusCode::UNAUTHORIZED,
            ApiError::SecretNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = MessageResponse {
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// GateError
///
/// Why a session call made by the route gate did not succeed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    /// The issuer rejected the password (401).
    #[error("Incorrect password")]
    IncorrectPassword,
    /// The request never produced a response.
    #[error("session service unavailable: {0}")]
    Unavailable(String),
    #[error("session service timed out")]
    Timeout,
    /// Any status the gate does not expect, e.g. 500 for a missing secret.
    #[error("session service answered with status {0}")]
    Server(u16),
}

impl GateError {
    /// Text shown under the password field.
    pub fn user_message(&self) -> &'static str {
        match self {
            GateError::IncorrectPassword => "Incorrect password",
            GateError::Unavailable(_) | GateError::Timeout | GateError::Server(_) => {
                "Could not reach the server. Please try again."
            }
        }
    }
}
