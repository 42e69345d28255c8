/**
 * Authentication Handler Types
 *
 * Request and response bodies for registration, login and password reset.
 */

use serde::{Deserialize, Serialize};

/// Register request
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    /// At least 6 characters; hashed before storage
    pub password: String,
    pub name_first: String,
    pub name_last: String,
}

/// Login request
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Auth response
///
/// Returned by register and login. The token authenticates every later
/// request through the `token` header.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub auth_user_id: u32,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetConfirm {
    pub reset_code: String,
    pub new_password: String,
}
