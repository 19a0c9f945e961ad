use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;
use axum_extra::extract::CookieJar;
use uuid::Uuid;

use crate::services::{
    cache::{CacheClient, ValkeyClient},
    session::store::{Session, SessionError, SessionStore},
};

/// Valkey-backed session store (Redis protocol).
///
/// The cookie only carries the session id; the session JSON is stored under
/// `<prefix>:<id>`. Expiry is the writer's job (key TTL), so a missing key is
/// simply "no session".
#[derive(Clone)]
pub struct ValkeySessionStore<C: CacheClient> {
    cache: Arc<C>,
    cookie_name: String,
    // Key prefix to avoid collisions across environments
    prefix: String,
}

impl ValkeySessionStore<ValkeyClient> {
    pub async fn connect(
        redis_url: &str,
        cookie_name: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let client = ValkeyClient::new(redis_url).await?;

        Ok(Self::new_with_cache(Arc::new(client), cookie_name, prefix))
    }
}

impl<C: CacheClient> ValkeySessionStore<C> {
    pub fn new_with_cache(
        cache: Arc<C>,
        cookie_name: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            cookie_name: cookie_name.into(),
            prefix: prefix.into(),
        }
    }

    pub fn key(&self, session_id: &Uuid) -> String {
        format!("{}:{}", self.prefix, session_id)
    }
}

#[async_trait]
impl<C: CacheClient> SessionStore for ValkeySessionStore<C> {
    async fn load(&self, headers: &HeaderMap) -> Result<Option<Session>, SessionError> {
        let jar = CookieJar::from_headers(headers);
        let Some(cookie) = jar.get(&self.cookie_name) else {
            return Ok(None);
        };

        let Ok(session_id) = Uuid::parse_str(cookie.value()) else {
            tracing::debug!(cookie = %self.cookie_name, "session id is not a uuid");
            return Ok(None);
        };

        let key = self.key(&session_id);
        let Some(raw) = self.cache.get_string(&key).await? else {
            tracing::debug!(
                backend = self.cache.backend_name(),
                %session_id,
                "session not found"
            );
            return Ok(None);
        };

        Ok(Some(serde_json::from_str(&raw)?))
    }
}
