/**
 * Password Reset Handlers
 *
 * POST /auth/passwordreset/request/v1 and POST /auth/passwordreset/reset/v1
 *
 * A request always answers `{}` so it cannot be used to probe which
 * emails are registered. For a live user it mails a single-use code and
 * logs the user out everywhere.
 */

use axum::{extract::rejection::JsonRejection, extract::State, response::Json};

use crate::backend::auth::handlers::types::{PasswordResetConfirm, PasswordResetRequest};
use crate::backend::auth::password::hash_password;
use crate::backend::auth::users::{issue_reset_code, reset_password};
use crate::backend::error::BackendError;
use crate::backend::middleware::extract_json;
use crate::backend::server::state::AppState;
use crate::shared::messaging::EmptyResponse;
use crate::shared::validation::validate_password;

pub async fn request_reset(
    State(state): State<AppState>,
    body: Result<Json<PasswordResetRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let request = extract_json(body)?;

    let code = {
        let mut store = state.lock_store().await?;
        let code = issue_reset_code(&mut store, &request.email);
        if code.is_some() {
            state.commit(&store).await?;
        }
        code
    };

    if let Some(code) = code {
        // Delivery failures are logged, never reported to the caller
        if let Err(e) = state.mailer.send_reset_code(&request.email, &code).await {
            tracing::error!("Failed to deliver reset code: {}", e);
        }
    }
    Ok(Json(EmptyResponse {}))
}

pub async fn reset(
    State(state): State<AppState>,
    body: Result<Json<PasswordResetConfirm>, JsonRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let request = extract_json(body)?;

    {
        let store = state.store.read().await;
        if !store.reset_codes.iter().any(|reset| reset.code == request.reset_code) {
            tracing::warn!("Unknown reset code");
            return Err(BackendError::input("resetCode is not a valid reset code"));
        }
    }
    validate_password(&request.new_password)?;

    let password_hash = hash_password(request.new_password, state.config.bcrypt_cost).await?;

    let mut store = state.lock_store().await?;
    let u_id = reset_password(&mut store, &request.reset_code, password_hash)?;
    state.commit(&store).await?;

    tracing::info!("Password reset for user {}", u_id);
    Ok(Json(EmptyResponse {}))
}
