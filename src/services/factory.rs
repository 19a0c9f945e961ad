//! Factories: build the token validator and session store from application `Config`.
use std::sync::Arc;

use thiserror::Error;

use crate::config::{Config, KeySource, SessionBackend};
use crate::services::auth::{
    error::ValidationError,
    jwks::{JwksCache, JwksValidator},
    jwt::{ClaimRules, PemValidator},
    validator::TokenValidator,
};
use crate::services::session::{
    CookieSessionStore, SessionError, SessionStore, ValkeySessionStore,
};

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("invalid access token public key: {0}")]
    PublicKey(#[from] ValidationError),

    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("failed to connect session store: {0}")]
    SessionStore(#[from] SessionError),
}

pub fn build_token_validator(config: &Config) -> Result<Arc<dyn TokenValidator>, BuildError> {
    let audience = config.auth_audience.as_deref();

    let validator: Arc<dyn TokenValidator> = match &config.key_source {
        KeySource::Pem { pem, algorithm } => Arc::new(PemValidator::new(
            pem,
            *algorithm,
            &config.auth_issuer,
            audience,
            config.access_token_leeway_seconds,
        )?),
        KeySource::Jwks {
            url,
            algorithms,
            cache_ttl,
            http_timeout,
        } => {
            let http = reqwest::Client::builder().timeout(*http_timeout).build()?;
            let rules = ClaimRules {
                issuer: config.auth_issuer.clone(),
                audience: audience.map(str::to_string),
                leeway_seconds: config.access_token_leeway_seconds,
                algorithms: algorithms.clone(),
            };
            Arc::new(JwksValidator::new(
                JwksCache::new(http, url.clone(), *cache_ttl),
                rules,
            ))
        }
    };

    Ok(validator)
}

pub async fn build_session_store(config: &Config) -> Result<Arc<dyn SessionStore>, BuildError> {
    let store: Arc<dyn SessionStore> = match &config.session_backend {
        SessionBackend::Cookie => Arc::new(CookieSessionStore::new(&config.session_cookie_name)),
        SessionBackend::Valkey { url, key_prefix } => Arc::new(
            ValkeySessionStore::connect(url, &config.session_cookie_name, key_prefix).await?,
        ),
    };

    Ok(store)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::services::auth::jwt::test_keys::{ISSUER, PUBLIC_KEY_PEM};

    fn config(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<&str, &str> = pairs.iter().copied().collect();
        Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap()
    }

    #[test]
    fn test_pem_validator_from_config() {
        let config = config(&[
            ("AUTH_ISSUER", ISSUER),
            ("ACCESS_JWT_PUBLIC_KEY_PEM", PUBLIC_KEY_PEM),
            ("ACCESS_JWT_ALGORITHM", "EdDSA"),
        ]);
        assert!(build_token_validator(&config).is_ok());
    }

    #[test]
    fn test_invalid_pem_fails_startup() {
        let config = config(&[
            ("AUTH_ISSUER", ISSUER),
            ("ACCESS_JWT_PUBLIC_KEY_PEM", "not a key"),
            ("ACCESS_JWT_ALGORITHM", "EdDSA"),
        ]);
        assert!(matches!(
            build_token_validator(&config),
            Err(BuildError::PublicKey(_))
        ));
    }

    #[test]
    fn test_jwks_validator_from_config() {
        let config = config(&[("AUTH_ISSUER", ISSUER)]);
        assert!(build_token_validator(&config).is_ok());
    }

    #[tokio::test]
    async fn test_cookie_session_store_from_config() {
        let config = config(&[("AUTH_ISSUER", ISSUER)]);
        assert!(build_session_store(&config).await.is_ok());
    }
}
