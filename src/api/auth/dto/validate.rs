/*
 * Responsibility
 * - Response bodies of POST /api/auth/validate
 * - Absent optional fields are omitted from the JSON, not sent as null
 */
use serde::Serialize;

use crate::services::auth::Claims;

pub const TOKEN_VALID_MESSAGE: &str = "Token is valid";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenValidResponse {
    pub valid: bool,
    pub claims: Claims,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<Claims> for TokenValidResponse {
    fn from(claims: Claims) -> Self {
        Self {
            valid: true,
            user_id: claims.sub().map(str::to_string),
            email: claims.email().map(str::to_string),
            name: claims.name().map(str::to_string),
            claims,
            message: TOKEN_VALID_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenInvalidResponse {
    pub valid: bool,
    pub error: String,
}

impl TokenInvalidResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: error.into(),
        }
    }
}
