//! JWT access-token generation and validation.
//!
//! Tokens are HS256-signed JWTs containing a [`Claims`] payload. The claims
//! identify the account only; permissions are reloaded from the store on
//! every request, so a token never carries a stale permission snapshot.

use ghost_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the admin's internal database id.
    pub sub: DbId,
    /// The admin's role title (e.g. `"HR"`). Informational only.
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Configuration for JWT token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Access token lifetime in hours (default: 24).
    pub expiry_hours: i64,
}

/// Default access token expiry in hours.
const DEFAULT_EXPIRY_HOURS: i64 = 24;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var            | Required | Default |
    /// |--------------------|----------|---------|
    /// | `JWT_SECRET`       | **yes**  | --      |
    /// | `JWT_EXPIRY_HOURS` | no       | `24`    |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let expiry_hours: i64 = std::env::var("JWT_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_EXPIRY_HOURS.to_string())
            .parse()
            .expect("JWT_EXPIRY_HOURS must be a valid i64");
        assert!(expiry_hours > 0, "JWT_EXPIRY_HOURS must be positive");

        Self {
            secret,
            expiry_hours,
        }
    }

    /// Token lifetime in seconds.
    pub fn expires_in_secs(&self) -> i64 {
        self.expiry_hours * 3600
    }

    /// Seconds after issue at which a client should renew: 23/24 of the
    /// lifetime, i.e. one hour early for a 24-hour token.
    pub fn refresh_after_secs(&self) -> i64 {
        self.expires_in_secs() * 23 / 24
    }
}

/// Generate an HS256 access token for the given admin.
pub fn generate_access_token(
    admin_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let exp = now + config.expires_in_secs();

    let claims = Claims {
        sub: admin_id,
        role: role.to_string(),
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically.
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
