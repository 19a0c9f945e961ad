//! Session types and the read-only lookup interface.
use async_trait::async_trait;
use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::cache::CacheError;

/// Tokens obtained at login and kept in the user's session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub tokens: SessionTokens,
}

impl Session {
    /// The access token, if one is present and non-empty.
    pub fn access_token(&self) -> Option<&str> {
        self.tokens
            .access_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("malformed session cookie: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("malformed session data: {0}")]
    Format(#[from] serde_json::Error),

    #[error("session store unavailable: {0}")]
    Backend(#[from] CacheError),
}

/// Session lookup:
/// - `Ok(Some(_))`: the request carries a live session
/// - `Ok(None)`: no session (not logged in, expired, unknown id)
/// - `Err(_)`: the session exists but could not be read
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError>;
}
