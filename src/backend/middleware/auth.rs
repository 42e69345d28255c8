/**
 * Authentication Extractor
 *
 * Handlers that need a caller take an `AuthUser` argument. The extractor
 * reads the token, verifies it and checks that its session is still
 * registered on a live user.
 *
 * The token is read from the `token` header, falling back to
 * `Authorization: Bearer <token>`. Every failure is a 403.
 */

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::backend::auth::sessions::verify_token;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Header carrying the session token
pub const TOKEN_HEADER: &str = "token";

/// Authenticated caller extracted from a token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub u_id: u32,
    pub session_id: String,
}

/// Axum extractor for authenticated user
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

/// Token from the `token` header or a bearer `Authorization` header
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    if let Some(token) = headers.get(TOKEN_HEADER).and_then(|h| h.to_str().ok()) {
        return Some(token);
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers).ok_or_else(|| {
            tracing::warn!("Request to {} without a token", parts.uri.path());
            BackendError::access("Missing token")
        })?;

        let claims = verify_token(token, &state.config.jwt_secret).map_err(|e| {
            tracing::warn!("Invalid token: {:?}", e);
            BackendError::access("Invalid token")
        })?;

        let u_id = claims
            .user_id()
            .ok_or_else(|| BackendError::access("Invalid token"))?;

        let active = state.store.read().await.session_is_active(u_id, &claims.sid);
        if !active {
            tracing::warn!("Token for user {} names an inactive session", u_id);
            return Err(BackendError::access("Invalid token"));
        }

        Ok(AuthUser(AuthenticatedUser {
            u_id,
            session_id: claims.sid,
        }))
    }
}
