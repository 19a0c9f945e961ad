//! Session carried entirely in a cookie.
//!
//! The cookie value is the session JSON, base64url-encoded without padding.
//! A raw JSON value is accepted as well.
use async_trait::async_trait;
use axum::http::HeaderMap;
use axum_extra::extract::CookieJar;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

use crate::services::session::store::{Session, SessionError, SessionStore};

#[derive(Debug, Clone)]
pub struct CookieSessionStore {
    cookie_name: String,
}

impl CookieSessionStore {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }
}

#[async_trait]
impl SessionStore for CookieSessionStore {
    async fn load(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
        let jar = CookieJar::from_headers(headers);
        let Some(cookie) = jar.get(&self.cookie_name) else {
            return Ok(None);
        };

        decode_session(cookie.value()).map(Some)
    }
}

fn decode_session(value: &str) -> Result<Session, SessionError> {
    let value = value.trim();
    if value.starts_with('{') {
        return Ok(serde_json::from_str(value)?);
    }

    let json = URL_SAFE_NO_PAD.decode(value.trim_end_matches('='))?;
    Ok(serde_json::from_slice(&json)?)
}
