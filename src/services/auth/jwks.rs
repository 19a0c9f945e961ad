//! Token validation against the identity provider's published key set (JWKS).
//!
//! Keys are fetched lazily and cached for `cache_ttl`. A token signed with a
//! `kid` we have not seen triggers a refresh (key rotation), rate limited by
//! `refresh_cooldown` so unknown kids cannot hammer the provider.
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{
    DecodingKey,
    jwk::{Jwk, JwkSet},
};
use tokio::sync::RwLock;
use url::Url;

use crate::services::auth::{
    claims::Claims,
    error::ValidationError,
    jwt::{ClaimRules, decode_claims},
    validator::TokenValidator,
};

const DEFAULT_REFRESH_COOLDOWN: Duration = Duration::from_secs(10);

struct CachedKeys {
    set: JwkSet,
    fetched_at: Instant,
}

pub struct JwksCache {
    http: reqwest::Client,
    url: Url,
    ttl: Duration,
    refresh_cooldown: Duration,
    keys: RwLock<Option<CachedKeys>>,
}

impl JwksCache {
    pub fn new(http: reqwest::Client, url: Url, ttl: Duration) -> Self {
        Self {
            http,
            url,
            ttl,
            refresh_cooldown: DEFAULT_REFRESH_COOLDOWN,
            keys: RwLock::new(None),
        }
    }

    pub fn with_refresh_cooldown(mut self, cooldown: Duration) -> Self {
        self.refresh_cooldown = cooldown;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Key matching `kid`, refreshing the set when it is stale or the kid is unknown.
    pub async fn key_for(&self, kid: Option<&str>) -> Result<Jwk, ValidationError> {
        let needs_refresh = {
            let guard = self.keys.read().await;
            match guard.as_ref() {
                Some(cached) if cached.fetched_at.elapsed() < self.ttl => {
                    if let Some(jwk) = select_key(&cached.set, kid)? {
                        return Ok(jwk);
                    }
                    cached.fetched_at.elapsed() >= self.refresh_cooldown
                }
                _ => true,
            }
        };

        if !needs_refresh {
            return Err(unknown_key(kid));
        }

        let set = self.refresh().await?;
        select_key(&set, kid)?.ok_or_else(|| unknown_key(kid))
    }

    async fn refresh(&self) -> Result<JwkSet, ValidationError> {
        let mut guard = self.keys.write().await;

        // Another request may have refreshed while we waited for the lock.
        if let Some(cached) = guard.as_ref()
            && cached.fetched_at.elapsed() < self.refresh_cooldown
            && cached.fetched_at.elapsed() < self.ttl
        {
            return Ok(cached.set.clone());
        }

        let set = self.fetch().await?;
        tracing::debug!(url = %self.url, keys = set.keys.len(), "signing keys refreshed");

        *guard = Some(CachedKeys {
            set: set.clone(),
            fetched_at: Instant::now(),
        });

        Ok(set)
    }

    async fn fetch(&self) -> Result<JwkSet, ValidationError> {
        let fetch_error = |e: reqwest::Error| {
            tracing::warn!(url = %self.url, error = %e, "fetching signing keys failed");
            ValidationError::KeyFetch(e.to_string())
        };

        self.http
            .get(self.url.clone())
            .send()
            .await
            .map_err(fetch_error)?
            .error_for_status()
            .map_err(fetch_error)?
            .json::<JwkSet>()
            .await
            .map_err(fetch_error)
    }
}

fn select_key(set: &JwkSet, kid: Option<&str>) -> Result<Option<Jwk>, ValidationError> {
    match kid {
        Some(kid) => Ok(set.find(kid).cloned()),
        // Without a kid the choice is only unambiguous for a single-key set.
        None => match set.keys.as_slice() {
            [] => Ok(None),
            [only] => Ok(Some(only.clone())),
            _ => Err(ValidationError::MissingKeyId),
        },
    }
}

fn unknown_key(kid: Option<&str>) -> ValidationError {
    ValidationError::UnknownKey {
        kid: kid.unwrap_or("<none>").to_string(),
    }
}

pub struct JwksValidator {
    keys: JwksCache,
    rules: ClaimRules,
}

impl JwksValidator {
    pub fn new(keys: JwksCache, rules: ClaimRules) -> Self {
        Self { keys, rules }
    }
}

impl std::fmt::Debug for JwksValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwksValidator")
            .field("url", &self.keys.url().as_str())
            .field("rules", &self.rules)
            .finish()
    }
}

#[async_trait]
impl TokenValidator for JwksValidator {
    async fn validate_token(&self, token: &str) -> Result<Claims, ValidationError> {
        let header = jsonwebtoken::decode_header(token)?;
        let validation = self.rules.validation_for(header.alg)?;

        let jwk = self.keys.key_for(header.kid.as_deref()).await?;
        let key = DecodingKey::from_jwk(&jwk)?;

        decode_claims(token, &key, &validation)
    }
}
