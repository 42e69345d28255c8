/**
 * User Accounts
 *
 * Store operations behind registration, login, logout and password reset.
 * Password hashing happens in the handlers, outside the store lock; these
 * functions only ever see hashes.
 */

use crate::backend::error::BackendError;
use crate::backend::store::{
    DataStore, GlobalPermission, InvolvementLog, NotificationLog, ResetCode, User, WorkspaceLog,
};
use crate::backend::auth::sessions::new_session_id;
use crate::shared::validation::MAX_HANDLE_LEN;

/// Fields of a new account, already validated
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name_first: String,
    pub name_last: String,
    pub profile_img_url: String,
}

/// Lower-cased letters and digits of both names, cut to 20 characters
pub fn base_handle(name_first: &str, name_last: &str) -> String {
    let base: String = name_first
        .chars()
        .chain(name_last.chars())
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .take(MAX_HANDLE_LEN)
        .collect();
    if base.is_empty() {
        "user".to_string()
    } else {
        base
    }
}

/// Base handle, or base handle plus the smallest free suffix from 0
pub fn generate_handle(store: &DataStore, name_first: &str, name_last: &str) -> String {
    let base = base_handle(name_first, name_last);
    if !store.handle_taken(&base, None) {
        return base;
    }
    (0u32..)
        .map(|suffix| format!("{}{}", base, suffix))
        .find(|candidate| !store.handle_taken(candidate, None))
        .unwrap_or(base)
}

/// Create an account and open its first session
///
/// Returns the new user id and session id.
pub fn register_user(
    store: &mut DataStore,
    new_user: NewUser,
    now: i64,
) -> Result<(u32, String), BackendError> {
    if store.email_taken(&new_user.email, None) {
        tracing::warn!("Registration with an email already in use");
        return Err(BackendError::input("Email address is already being used by another user"));
    }

    let handle_str = generate_handle(store, &new_user.name_first, &new_user.name_last);
    let permission = if store.users.is_empty() {
        GlobalPermission::Owner
    } else {
        GlobalPermission::Member
    };

    let u_id = store.allocate_user_id();
    let session_id = new_session_id();
    store.users.push(User {
        u_id,
        email: new_user.email,
        name_first: new_user.name_first,
        name_last: new_user.name_last,
        handle_str,
        password_hash: new_user.password_hash,
        permission,
        sessions: vec![session_id.clone()],
        profile_img_url: new_user.profile_img_url,
        removed: false,
        notifications: NotificationLog::default(),
        involvement: InvolvementLog::starting_at(now),
    });
    if store.workspace.is_none() {
        store.workspace = Some(WorkspaceLog::starting_at(now));
    }
    store.sync_stats(now);

    Ok((u_id, session_id))
}

/// Password hash of a live user with this email, for verification outside the lock
pub fn credentials_for(store: &DataStore, email: &str) -> Result<(u32, String), BackendError> {
    store
        .find_by_email(email)
        .map(|user| (user.u_id, user.password_hash.clone()))
        .ok_or_else(|| BackendError::input("Email entered does not belong to a user"))
}

pub fn open_session(store: &mut DataStore, u_id: u32) -> Result<String, BackendError> {
    let session_id = new_session_id();
    store.user_mut(u_id)?.sessions.push(session_id.clone());
    Ok(session_id)
}

/// Revoke one session. Other sessions of the user stay valid.
pub fn close_session(store: &mut DataStore, u_id: u32, session_id: &str) -> Result<(), BackendError> {
    store
        .user_mut(u_id)?
        .sessions
        .retain(|sid| sid != session_id);
    Ok(())
}

/// Issue a reset code and revoke all sessions. `None` if no live user has the email.
///
/// Returns the code.
pub fn issue_reset_code(store: &mut DataStore, email: &str) -> Option<String> {
    let u_id = store.find_by_email(email)?.u_id;
    let code = uuid::Uuid::new_v4().simple().to_string();

    store.reset_codes.retain(|reset| reset.u_id != u_id);
    store.reset_codes.push(ResetCode {
        code: code.clone(),
        u_id,
    });
    if let Ok(user) = store.user_mut(u_id) {
        user.sessions.clear();
    }
    Some(code)
}

/// Consume a reset code and set the new password hash
pub fn reset_password(
    store: &mut DataStore,
    reset_code: &str,
    password_hash: String,
) -> Result<u32, BackendError> {
    let position = store
        .reset_codes
        .iter()
        .position(|reset| reset.code == reset_code)
        .ok_or_else(|| BackendError::input("resetCode is not a valid reset code"))?;
    let reset = store.reset_codes.remove(position);

    store.user_mut(reset.u_id)?.password_hash = password_hash;
    Ok(reset.u_id)
}
