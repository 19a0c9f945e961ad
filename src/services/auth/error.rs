use jsonwebtoken::{Algorithm, errors::ErrorKind};
use thiserror::Error;

/// Errors returned by access-token validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{}", describe_jwt_error(.0))]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("no signing key found for kid '{kid}'")]
    UnknownKey { kid: String },

    #[error("token header has no 'kid' and the key set holds several keys")]
    MissingKeyId,

    #[error("signing algorithm {0:?} is not allowed")]
    AlgorithmNotAllowed(Algorithm),

    #[error("failed to fetch signing keys: {0}")]
    KeyFetch(String),

    /// Opaque rejection from a validator; may carry no message at all.
    #[error("{}", .message.as_deref().unwrap_or_default())]
    Rejected { message: Option<String> },
}

impl ValidationError {
    /// Human-readable reason, or `None` when the validator gave none.
    pub fn message(&self) -> Option<String> {
        let message = self.to_string();
        if message.trim().is_empty() {
            None
        } else {
            Some(message)
        }
    }
}

fn describe_jwt_error(err: &jsonwebtoken::errors::Error) -> String {
    match err.kind() {
        ErrorKind::ExpiredSignature => "token has expired".to_string(),
        ErrorKind::ImmatureSignature => "token is not valid yet".to_string(),
        ErrorKind::InvalidSignature => "invalid token signature".to_string(),
        ErrorKind::InvalidIssuer => "invalid token issuer".to_string(),
        ErrorKind::InvalidAudience => "invalid token audience".to_string(),
        ErrorKind::InvalidToken => "malformed token".to_string(),
        ErrorKind::MissingRequiredClaim(claim) => format!("missing required claim '{claim}'"),
        _ => format!("token verification failed: {err}"),
    }
}
