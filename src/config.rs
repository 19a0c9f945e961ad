/*
 * Responsibility
 * - Load settings from the environment (.env supported)
 *   - listen port, CORS, limits, issuer, key source, session backend
 * - Validate settings up front (missing/invalid values fail startup)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where token signing keys come from.
#[derive(Debug, Clone)]
pub enum KeySource {
    /// Identity provider's published key set.
    Jwks {
        url: Url,
        algorithms: Vec<Algorithm>,
        cache_ttl: Duration,
        http_timeout: Duration,
    },
    /// A single pinned public key.
    Pem { pem: String, algorithm: Algorithm },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBackend {
    Cookie,
    Valkey { url: String, key_prefix: String },
}

impl SessionBackend {
    // For logs: the Valkey URL may embed credentials.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Cookie => "cookie",
            Self::Valkey { .. } => "valkey",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,
    pub request_timeout: Duration,
    pub request_body_limit: usize,

    pub auth_issuer: String,
    pub auth_audience: Option<String>,
    pub access_token_leeway_seconds: u64,
    pub key_source: KeySource,

    pub session_cookie_name: String,
    pub session_backend: SessionBackend,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source (process env in production, maps in tests).
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| {
            var(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port: u16 = parse_or("PORT", non_empty("PORT"), 3000)?;

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV"));

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        // The allowlist is sent with credentials; a wildcard can never be honoured there.
        if cors_allowed_origins.iter().any(|origin| origin == "*") {
            return Err(ConfigError::Invalid("CORS_ALLOWED_ORIGINS"));
        }

        let request_timeout = Duration::from_secs(non_zero(
            "REQUEST_TIMEOUT_SECONDS",
            parse_or("REQUEST_TIMEOUT_SECONDS", non_empty("REQUEST_TIMEOUT_SECONDS"), 30)?,
        )?);

        let request_body_limit = non_zero(
            "REQUEST_BODY_LIMIT_BYTES",
            parse_or(
                "REQUEST_BODY_LIMIT_BYTES",
                non_empty("REQUEST_BODY_LIMIT_BYTES"),
                1024 * 1024,
            )?,
        )?;

        let auth_issuer = non_empty("AUTH_ISSUER").ok_or(ConfigError::Missing("AUTH_ISSUER"))?;

        let auth_audience = non_empty("AUTH_AUDIENCE");

        let access_token_leeway_seconds = parse_or(
            "ACCESS_TOKEN_LEEWAY_SECONDS",
            non_empty("ACCESS_TOKEN_LEEWAY_SECONDS"),
            60,
        )?;

        let key_source = match non_empty("ACCESS_JWT_PUBLIC_KEY_PEM") {
            Some(pem) => {
                let algorithm = match non_empty("ACCESS_JWT_ALGORITHM") {
                    Some(raw) => Algorithm::from_str(&raw)
                        .map_err(|_| ConfigError::Invalid("ACCESS_JWT_ALGORITHM"))?,
                    None => Algorithm::RS256,
                };
                KeySource::Pem {
                    pem: pem.replace("\\n", "\n"),
                    algorithm,
                }
            }
            None => {
                let url = match non_empty("AUTH_JWKS_URL") {
                    Some(raw) => {
                        Url::parse(&raw).map_err(|_| ConfigError::Invalid("AUTH_JWKS_URL"))?
                    }
                    None => jwks_url_for_issuer(&auth_issuer)?,
                };

                let algorithms = non_empty("ACCESS_JWT_ALGORITHMS")
                    .unwrap_or_else(|| "RS256".to_string())
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(Algorithm::from_str)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| ConfigError::Invalid("ACCESS_JWT_ALGORITHMS"))?;

                if algorithms.is_empty() {
                    return Err(ConfigError::Invalid("ACCESS_JWT_ALGORITHMS"));
                }

                // 0 disables caching (every validation fetches the key set).
                let cache_ttl = Duration::from_secs(parse_or(
                    "JWKS_CACHE_TTL_SECONDS",
                    non_empty("JWKS_CACHE_TTL_SECONDS"),
                    300,
                )?);

                let http_timeout = Duration::from_secs(non_zero(
                    "JWKS_HTTP_TIMEOUT_SECONDS",
                    parse_or(
                        "JWKS_HTTP_TIMEOUT_SECONDS",
                        non_empty("JWKS_HTTP_TIMEOUT_SECONDS"),
                        5,
                    )?,
                )?);

                KeySource::Jwks {
                    url,
                    algorithms,
                    cache_ttl,
                    http_timeout,
                }
            }
        };

        let session_cookie_name =
            non_empty("SESSION_COOKIE_NAME").unwrap_or_else(|| "app_session".to_string());

        let session_backend = match non_empty("SESSION_BACKEND")
            .unwrap_or_else(|| "cookie".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "cookie" => SessionBackend::Cookie,
            "valkey" | "redis" => SessionBackend::Valkey {
                url: non_empty("VALKEY_URL").ok_or(ConfigError::Missing("VALKEY_URL"))?,
                key_prefix: non_empty("SESSION_KEY_PREFIX")
                    .unwrap_or_else(|| "session".to_string()),
            },
            _ => return Err(ConfigError::Invalid("SESSION_BACKEND")),
        };

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            request_timeout,
            request_body_limit,
            auth_issuer,
            auth_audience,
            access_token_leeway_seconds,
            key_source,
            session_cookie_name,
            session_backend,
        })
    }
}

// Default when unset; a value that is set but does not parse fails startup.
fn parse_or<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn non_zero<T: Default + PartialEq>(key: &'static str, value: T) -> Result<T, ConfigError> {
    if value == T::default() {
        Err(ConfigError::Invalid(key))
    } else {
        Ok(value)
    }
}

// `<issuer>/keys`, keeping any path the issuer already has.
fn jwks_url_for_issuer(issuer: &str) -> Result<Url, ConfigError> {
    let base = format!("{}/", issuer.trim_end_matches('/'));
    Url::parse(&base)
        .and_then(|u| u.join("keys"))
        .map_err(|_| ConfigError::Invalid("AUTH_ISSUER"))
}
