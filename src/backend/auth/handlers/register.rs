/**
 * Register Handler
 *
 * POST /auth/register/v3
 *
 * # Registration Process
 *
 * 1. Validate email, password and names
 * 2. Hash the password outside the store lock
 * 3. Create the user, generating a unique handle
 * 4. Open a session and return its token
 *
 * The first account ever registered becomes a global owner.
 */

use axum::{extract::rejection::JsonRejection, extract::State, response::Json};

use crate::backend::auth::handlers::types::{AuthResponse, RegisterRequest};
use crate::backend::auth::password::hash_password;
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{register_user, NewUser};
use crate::backend::error::BackendError;
use crate::backend::middleware::extract_json;
use crate::backend::server::state::AppState;
use crate::backend::users::photo::default_image_url;
use crate::shared::now_secs;
use crate::shared::validation::{validate_email, validate_name, validate_password};

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - Invalid or taken email, short password, bad name length
/// * `500 Internal Server Error` - Hashing, token or storage failure
///
/// # Example Request
///
/// ```http
/// POST /auth/register/v3 HTTP/1.1
/// Content-Type: application/json
///
/// {
///   "email": "ada@example.com",
///   "password": "correct horse",
///   "nameFirst": "Ada",
///   "nameLast": "Lovelace"
/// }
/// ```
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, BackendError> {
    let request = extract_json(body)?;

    validate_email(&request.email).map_err(|e| {
        tracing::warn!("Invalid email format: {}", request.email);
        e
    })?;
    validate_password(&request.password)?;
    validate_name("nameFirst", &request.name_first)?;
    validate_name("nameLast", &request.name_last)?;

    let password_hash = hash_password(request.password, state.config.bcrypt_cost).await?;

    let mut store = state.lock_store().await?;
    let (u_id, session_id) = register_user(
        &mut store,
        NewUser {
            email: request.email,
            password_hash,
            name_first: request.name_first,
            name_last: request.name_last,
            profile_img_url: default_image_url(&state.config),
        },
        now_secs(),
    )?;
    state.commit(&store).await?;
    drop(store);

    let token = create_token(&state.config, u_id, &session_id).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        BackendError::state("Failed to create token")
    })?;

    tracing::info!("Registered user {}", u_id);
    Ok(Json(AuthResponse {
        token,
        auth_user_id: u_id,
    }))
}
