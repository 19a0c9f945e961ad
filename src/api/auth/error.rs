/*
 * Responsibility
 * - Failure taxonomy of POST /api/auth/validate
 * - IntoResponse: status + {valid: false, error}
 * - 500s are logged here; a missing token is an expected outcome and is not
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::auth::dto::validate::TokenInvalidResponse;
use crate::services::{auth::ValidationError, session::SessionError};

pub const NO_ACCESS_TOKEN: &str = "No access token found";
pub const VALIDATION_FAILED: &str = "Token validation failed";

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("no access token found")]
    MissingToken,

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ValidateError {
    pub fn status(&self) -> StatusCode {
        match self {
            ValidateError::MissingToken => StatusCode::BAD_REQUEST,
            ValidateError::Session(_) | ValidateError::Validation(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ValidateError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error = match &self {
            ValidateError::MissingToken => NO_ACCESS_TOKEN.to_string(),
            ValidateError::Session(err) => {
                tracing::error!(error = %err, "token validation error: session lookup failed");
                err.to_string()
            }
            ValidateError::Validation(err) => {
                tracing::error!(error = ?err, "token validation error");
                err.message().unwrap_or_else(|| VALIDATION_FAILED.to_string())
            }
        };

        (status, Json(TokenInvalidResponse::new(error))).into_response()
    }
}
