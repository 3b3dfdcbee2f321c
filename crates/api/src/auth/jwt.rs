//! JWT access-token validation.
//!
//! Tokens are HS256-signed by the hosted auth provider with a secret shared
//! through configuration. The server never issues production tokens itself;
//! [`generate_access_token`] exists so tests can mint valid ones.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the auth provider's identity UUID for the user.
    pub sub: Uuid,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Email attached by the provider, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Configuration for JWT validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret shared with the auth provider.
    pub secret: String,
}

/// Token lifetime used when minting tokens locally (tests only).
const TEST_TOKEN_EXPIRY_SECS: i64 = 3600;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");
        Self { secret }
    }
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature, expiration, and issued-at claims automatically.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// Mint an HS256 token for the given subject.
///
/// Mirrors what the auth provider issues; used by integration tests.
pub fn generate_access_token(
    subject: Uuid,
    email: Option<String>,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: subject,
        exp: now + TEST_TOKEN_EXPIRY_SECS,
        iat: now,
        email,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}
