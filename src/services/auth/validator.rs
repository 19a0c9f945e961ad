use async_trait::async_trait;

use crate::services::auth::{claims::Claims, error::ValidationError};

/// Identity-provider token validation.
///
/// Implementations verify signature and standard claims and return the
/// decoded claim set. They are shared by all requests.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate_token(&self, token: &str) -> Result<Claims, ValidationError>;
}
