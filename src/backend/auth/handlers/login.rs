/**
 * Login and Logout Handlers
 *
 * POST /auth/login/v3 and POST /auth/logout/v2
 *
 * # Authentication Process
 *
 * 1. Look up the live user by email
 * 2. Verify the password with bcrypt, outside the store lock
 * 3. Register a new session and return its token
 *
 * Logout revokes only the session the token was issued for.
 */

use axum::{extract::rejection::JsonRejection, extract::State, response::Json};

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::password::verify_password;
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{close_session, credentials_for, open_session};
use crate::backend::error::BackendError;
use crate::backend::middleware::{extract_json, AuthUser};
use crate::backend::server::state::AppState;
use crate::shared::messaging::EmptyResponse;

/// Login handler
///
/// # Errors
///
/// * `400 Bad Request` - Unknown email or wrong password
/// * `500 Internal Server Error` - Verification, token or storage failure
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, BackendError> {
    let request = extract_json(body)?;

    let (u_id, password_hash) = {
        let store = state.store.read().await;
        credentials_for(&store, &request.email).map_err(|e| {
            tracing::warn!("Login for unknown email");
            e
        })?
    };

    if !verify_password(request.password, password_hash).await? {
        tracing::warn!("Invalid password for user {}", u_id);
        return Err(BackendError::input("Password is not correct"));
    }

    let mut store = state.lock_store().await?;
    let session_id = open_session(&mut store, u_id)?;
    state.commit(&store).await?;
    drop(store);

    let token = create_token(&state.config, u_id, &session_id).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        BackendError::state("Failed to create token")
    })?;

    tracing::info!("User {} logged in", u_id);
    Ok(Json(AuthResponse {
        token,
        auth_user_id: u_id,
    }))
}

/// Logout handler
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<EmptyResponse>, BackendError> {
    let mut store = state.lock_store().await?;
    close_session(&mut store, user.u_id, &user.session_id)?;
    state.commit(&store).await?;

    tracing::info!("User {} logged out", user.u_id);
    Ok(Json(EmptyResponse {}))
}
