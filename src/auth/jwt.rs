/// Session token issuance and verification
///
/// Tokens are JWTs signed with HS256 (HMAC-SHA256) that encode the user id
/// as the subject claim. Issuer and expiration are checked on verification;
/// the 24-hour lifetime is the signing mechanism's conventional default, no
/// additional expiry policy is layered on top.
///
/// # Example
///
/// ```
/// use taskbox::auth::jwt::{issue_token, verify_token};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "your-secret-key-at-least-32-bytes";
/// let token = issue_token(42, secret)?;
/// assert_eq!(verify_token(&token, secret)?, 42);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Token issuer claim value
const ISSUER: &str = "taskbox";

/// Token lifetime
const TOKEN_LIFETIME_HOURS: i64 = 24;

/// Error type for token operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid issuer")]
    InvalidIssuer,
}

/// Token claims
///
/// # Claims
///
/// - `sub`: Subject (user id)
/// - `iss`: Issuer (always "taskbox")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: i64,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for a user with the default lifetime
    pub fn new(user_id: i64) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(TOKEN_LIFETIME_HOURS);

        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }
}

/// Issues a signed token identifying a user
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token encoding fails
pub fn issue_token(user_id: i64, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, &Claims::new(user_id), &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Verifies a token and extracts the user id
///
/// Checks the signature, expiration, and issuer. Any holder of a valid
/// token is treated as the identified user.
///
/// # Errors
///
/// Returns an error if the token is malformed, expired, carries the wrong
/// issuer, or fails signature verification.
pub fn verify_token(token: &str, secret: &str) -> Result<i64, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims.sub)
}
