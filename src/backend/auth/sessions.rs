/**
 * Session Management and JWT Tokens
 *
 * This module handles JWT token generation and validation for user sessions.
 *
 * A token names the user (`sub`) and the session it was issued for (`sid`).
 * Decoding a token only proves it was issued by this server; the session
 * must also still be registered on the user for the token to be honoured.
 */

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::shared::{now_secs, AppConfig};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Session ID
    pub sid: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    /// Issued at time (Unix timestamp)
    pub iat: u64,
}

impl Claims {
    /// User id carried by the token, if it is a valid id
    pub fn user_id(&self) -> Option<u32> {
        self.sub.parse().ok()
    }
}

/// Fresh id for a login session
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Create a JWT token for a session
///
/// # Arguments
/// * `config` - Supplies the secret and token lifetime
/// * `u_id` - User ID
/// * `session_id` - Session registered on the user
///
/// # Returns
/// JWT token string
pub fn create_token(
    config: &AppConfig,
    u_id: u32,
    session_id: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = now_secs().max(0) as u64;

    let claims = Claims {
        sub: u_id.to_string(),
        sid: session_id.to_string(),
        exp: now + config.token_ttl_secs,
        iat: now,
    };

    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    encode(&Header::default(), &claims, &key)
}

/// Verify and decode a JWT token
///
/// # Arguments
/// * `token` - JWT token string
/// * `secret` - HMAC secret the token was signed with
///
/// # Returns
/// Decoded claims or error
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();

    let token_data = decode::<Claims>(token, &key, &validation)?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig::builder()
            .jwt_secret("test-secret")
            .build()
            .unwrap()
    }

    #[test]
    fn test_create_token() {
        let token = create_token(&config(), 1, "session").unwrap();
        assert!(!token.is_empty());
    }

    #[test]
    fn test_verify_token() {
        let token = create_token(&config(), 42, "session-a").unwrap();

        let claims = verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.user_id(), Some(42));
        assert_eq!(claims.sid, "session-a");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let token = create_token(&config(), 42, "session-a").unwrap();
        assert!(verify_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_verify_invalid_token() {
        assert!(verify_token("invalid.token.here", "test-secret").is_err());
    }

    #[test]
    fn test_session_ids_are_unique() {
        assert_ne!(new_session_id(), new_session_id());
    }
}
