//! Field Validation
//!
//! Length and format rules for user-supplied fields. Lengths are counted in
//! characters, not bytes.

use std::sync::LazyLock;

use regex::Regex;

use crate::shared::error::SharedError;

/// Longest message body accepted by send, edit, share and standup
pub const MAX_MESSAGE_LEN: usize = 1000;
/// Shortest accepted password
pub const MIN_PASSWORD_LEN: usize = 6;
/// Bounds for first and last names
pub const MAX_NAME_LEN: usize = 50;
/// Bounds for channel names
pub const MAX_CHANNEL_NAME_LEN: usize = 20;
/// Bounds for handles
pub const MIN_HANDLE_LEN: usize = 3;
pub const MAX_HANDLE_LEN: usize = 20;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern is a valid regex")
});

fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Check an email address for a plausible `local@domain.tld` shape
pub fn validate_email(email: &str) -> Result<(), SharedError> {
    if EMAIL_PATTERN.is_match(email) {
        Ok(())
    } else {
        Err(SharedError::format("email", "is not a valid email address"))
    }
}

pub fn validate_password(password: &str) -> Result<(), SharedError> {
    if char_len(password) < MIN_PASSWORD_LEN {
        return Err(SharedError::too_short("password", MIN_PASSWORD_LEN));
    }
    Ok(())
}

/// First and last names must be 1 to 50 characters
pub fn validate_name(field: &'static str, name: &str) -> Result<(), SharedError> {
    let len = char_len(name);
    if len < 1 || len > MAX_NAME_LEN {
        return Err(SharedError::length(field, 1, MAX_NAME_LEN));
    }
    Ok(())
}

pub fn validate_channel_name(name: &str) -> Result<(), SharedError> {
    let len = char_len(name);
    if len < 1 || len > MAX_CHANNEL_NAME_LEN {
        return Err(SharedError::length("name", 1, MAX_CHANNEL_NAME_LEN));
    }
    Ok(())
}

/// Handles are 3 to 20 ASCII letters or digits
pub fn validate_handle(handle: &str) -> Result<(), SharedError> {
    let len = char_len(handle);
    if len < MIN_HANDLE_LEN || len > MAX_HANDLE_LEN {
        return Err(SharedError::length("handleStr", MIN_HANDLE_LEN, MAX_HANDLE_LEN));
    }
    if !handle.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(SharedError::format("handleStr", "must contain only letters and digits"));
    }
    Ok(())
}

/// Message text sent to a channel or DM must be 1 to 1000 characters
pub fn validate_message(message: &str) -> Result<(), SharedError> {
    let len = char_len(message);
    if len < 1 || len > MAX_MESSAGE_LEN {
        return Err(SharedError::length("message", 1, MAX_MESSAGE_LEN));
    }
    Ok(())
}

/// Edits, shares and standup lines may be empty but not over 1000 characters
pub fn validate_message_max(message: &str) -> Result<(), SharedError> {
    if char_len(message) > MAX_MESSAGE_LEN {
        return Err(SharedError::too_long("message", MAX_MESSAGE_LEN));
    }
    Ok(())
}
