//! User Data Structures
//!
//! The public profile of a user and the profile-editing requests.

use serde::{Deserialize, Serialize};

/// Public view of a user. Never carries the password hash or sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub u_id: u32,
    pub email: String,
    pub name_first: String,
    pub name_last: String,
    pub handle_str: String,
    pub profile_img_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersAllResponse {
    pub users: Vec<UserProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfileResponse {
    pub user: UserProfile,
}

/// `?uId=` query for profile lookups and admin removal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub u_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetNameRequest {
    pub name_first: String,
    pub name_last: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetEmailRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetHandleRequest {
    pub handle_str: String,
}

/// Crop box is `[xStart, xEnd) x [yStart, yEnd)` in source pixels
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPhotoRequest {
    pub img_url: String,
    pub x_start: i64,
    pub y_start: i64,
    pub x_end: i64,
    pub y_end: i64,
}
