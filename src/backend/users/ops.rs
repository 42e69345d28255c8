/**
 * User Profile Operations
 *
 * Email and handle uniqueness only considers live users, so the email and
 * handle of a removed user can be taken again.
 */

use crate::backend::error::BackendError;
use crate::backend::store::{DataStore, User};
use crate::shared::messaging::UserProfile;
use crate::shared::validation::{validate_email, validate_handle, validate_name};

/// Every live user
pub fn all(store: &DataStore) -> Vec<UserProfile> {
    store.live_users().map(User::profile).collect()
}

/// Any user ever registered, removed users included
pub fn profile(store: &DataStore, u_id: u32) -> Result<UserProfile, BackendError> {
    Ok(store.user(u_id)?.profile())
}

pub fn set_name(
    store: &mut DataStore,
    u_id: u32,
    name_first: String,
    name_last: String,
) -> Result<(), BackendError> {
    validate_name("nameFirst", &name_first)?;
    validate_name("nameLast", &name_last)?;

    let user = store.user_mut(u_id)?;
    user.name_first = name_first;
    user.name_last = name_last;
    Ok(())
}

pub fn set_email(store: &mut DataStore, u_id: u32, email: String) -> Result<(), BackendError> {
    validate_email(&email)?;
    if store.email_taken(&email, Some(u_id)) {
        return Err(BackendError::input("Email address is already being used by another user"));
    }
    store.user_mut(u_id)?.email = email;
    Ok(())
}

pub fn set_handle(store: &mut DataStore, u_id: u32, handle_str: String) -> Result<(), BackendError> {
    validate_handle(&handle_str)?;
    if store.handle_taken(&handle_str, Some(u_id)) {
        return Err(BackendError::input("Handle is already used by another user"));
    }
    store.user_mut(u_id)?.handle_str = handle_str;
    Ok(())
}
