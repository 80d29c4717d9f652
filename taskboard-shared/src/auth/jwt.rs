/// JWT token generation and validation
///
/// Bearer tokens are signed with HS256 (HMAC-SHA256) and carry the user's
/// identifier as the `sub` claim.
///
/// # Security
///
/// - **Algorithm**: HS256
/// - **Validation**: signature and issuer are always checked
/// - **Secret Management**: secrets must be at least 32 bytes (256 bits)
/// - **No expiry**: tokens carry no `exp` claim and remain valid forever
///   once signed. This is a known security gap: a leaked token can only be
///   revoked by rotating the signing secret, which invalidates every
///   outstanding token. Preserved because adding expiry would change the
///   observable contract.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = Uuid::new_v4();
/// let secret = "your-secret-key-at-least-32-bytes!!";
///
/// let token = create_token(&Claims::new(user_id), secret)?;
///
/// let validated = validate_token(&token, secret)?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token issuer claim value
const ISSUER: &str = "taskboard";

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Token is malformed, tampered with, or signed with the wrong key
    #[error("Invalid token: {0}")]
    InvalidToken(String),
}

/// JWT claims structure
///
/// # Claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always "taskboard")
/// - `iat`: Issued at timestamp
///
/// There is deliberately no `exp` claim; see the module docs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: Uuid,

    /// Issuer - Always "taskboard"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// Creates claims for the given user
    pub fn new(user_id: Uuid) -> Self {
        Self {
            sub: user_id,
            iss: ISSUER.to_string(),
            iat: Utc::now().timestamp(),
        }
    }
}

/// Creates a signed JWT token from claims
///
/// # Errors
///
/// Returns `JwtError::CreateError` if token encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a JWT token and extracts its claims
///
/// Verifies the signature and that the issuer is "taskboard". Expiry is not
/// validated because tokens carry no `exp` claim.
///
/// Validation does **not** check that the subject still refers to a live
/// user; callers must resolve the claim themselves and treat a missing user
/// as an authentication failure.
///
/// # Errors
///
/// Returns `JwtError::InvalidToken` if the token is malformed, the
/// signature doesn't verify, or the issuer doesn't match
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.validate_exp = false;
    validation.required_spec_claims.remove("exp");

    let token_data = decode::<Claims>(token, &key, &validation)
        .map_err(|e| JwtError::InvalidToken(format!("Token validation failed: {}", e)))?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_create_and_validate_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = create_token(&Claims::new(user_id), SECRET).unwrap();

        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.iss, "taskboard");
    }

    #[test]
    fn test_wrong_secret_fails() {
        let token = create_token(&Claims::new(Uuid::new_v4()), SECRET).unwrap();

        let result = validate_token(&token, "a-completely-different-secret-key!!");
        assert!(matches!(result, Err(JwtError::InvalidToken(_))));
    }

    #[test]
    fn test_tampered_token_fails() {
        let token = create_token(&Claims::new(Uuid::new_v4()), SECRET).unwrap();

        // Corrupt the signature segment
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });

        assert!(validate_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn test_malformed_token_fails() {
        assert!(validate_token("not.a.jwt", SECRET).is_err());
        assert!(validate_token("", SECRET).is_err());
    }

    #[test]
    fn test_wrong_issuer_fails() {
        let claims = Claims {
            sub: Uuid::new_v4(),
            iss: "someone-else".to_string(),
            iat: Utc::now().timestamp(),
        };
        let token = create_token(&claims, SECRET).unwrap();

        assert!(validate_token(&token, SECRET).is_err());
    }

    #[test]
    fn test_old_tokens_still_validate() {
        // No exp claim: a token minted in the past never expires
        let claims = Claims {
            sub: Uuid::new_v4(),
            iss: ISSUER.to_string(),
            iat: Utc::now().timestamp() - 10 * 365 * 24 * 3600,
        };
        let token = create_token(&claims, SECRET).unwrap();

        assert!(validate_token(&token, SECRET).is_ok());
    }
}
