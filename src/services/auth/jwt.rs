use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};

use crate::services::auth::{claims::Claims, error::ValidationError, validator::TokenValidator};

/// Claim checks shared by every validator.
///
/// `jsonwebtoken::Validation` built from these rules checks:
/// - signature (with the key the caller supplies)
/// - `exp` (required) and `nbf` when present, with leeway
/// - `iss`
/// - `aud`, only when an audience is configured
#[derive(Debug, Clone)]
pub struct ClaimRules {
    pub issuer: String,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
    pub algorithms: Vec<Algorithm>,
}

impl ClaimRules {
    /// Validation for a token whose header declares `alg`.
    ///
    /// The header algorithm must be on the allow list; otherwise a token could
    /// pick a weaker algorithm than the key was meant for.
    pub fn validation_for(&self, alg: Algorithm) -> Result<Validation, ValidationError> {
        if !self.algorithms.contains(&alg) {
            return Err(ValidationError::AlgorithmNotAllowed(alg));
        }

        let mut validation = Validation::new(alg);
        validation.set_issuer(&[self.issuer.as_str()]);
        match &self.audience {
            Some(audience) => validation.set_audience(&[audience.as_str()]),
            None => validation.validate_aud = false,
        }
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.leeway = self.leeway_seconds;

        Ok(validation)
    }
}

// Verify and decode a JWT access token.
pub fn decode_claims(
    token: &str,
    key: &DecodingKey,
    validation: &Validation,
) -> Result<Claims, ValidationError> {
    let data = jsonwebtoken::decode::<Claims>(token, key, validation)?;
    Ok(data.claims)
}

/// Verifier pinned to a single public key.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct PemValidator {
    decoding_key: DecodingKey,
    rules: ClaimRules,
}

impl std::fmt::Debug for PemValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("PemValidator")
            .field("rules", &self.rules)
            .finish()
    }
}

impl PemValidator {
    pub fn new(
        public_key_pem: &str,
        algorithm: Algorithm,
        issuer: &str,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Result<Self, ValidationError> {
        let pem = public_key_pem.as_bytes();
        let decoding_key = match algorithm {
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => DecodingKey::from_rsa_pem(pem)?,
            Algorithm::ES256 | Algorithm::ES384 => DecodingKey::from_ec_pem(pem)?,
            Algorithm::EdDSA => DecodingKey::from_ed_pem(pem)?,
            other => return Err(ValidationError::AlgorithmNotAllowed(other)),
        };

        Ok(Self {
            decoding_key,
            rules: ClaimRules {
                issuer: issuer.to_string(),
                audience: audience.map(str::to_string),
                leeway_seconds,
                algorithms: vec![algorithm],
            },
        })
    }
}

#[async_trait]
impl TokenValidator for PemValidator {
    async fn validate_token(&self, token: &str) -> Result<Claims, ValidationError> {
        let header = jsonwebtoken::decode_header(token)?;
        let validation = self.rules.validation_for(header.alg)?;
        decode_claims(token, &self.decoding_key, &validation)
    }
}
