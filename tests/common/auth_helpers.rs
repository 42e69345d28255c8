//! Authentication test helpers
//!
//! Provides utilities for registering test users and reading the codes
//! sent by the memory mailer.

use serde_json::json;

use super::TestApp;

pub const TEST_PASSWORD: &str = "password123";

/// A registered user and their session token
#[derive(Debug, Clone)]
pub struct TestUser {
    pub u_id: u32,
    pub email: String,
    pub token: String,
}

/// Register `first last` with email `{first}@example.com`
///
/// The first user registered in an app is a global owner.
pub async fn register(app: &TestApp, first: &str, last: &str) -> TestUser {
    let email = format!("{}@example.com", first.to_lowercase());
    let response = app
        .server
        .post("/auth/register/v3")
        .json(&json!({
            "email": email,
            "password": TEST_PASSWORD,
            "nameFirst": first,
            "nameLast": last,
        }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    TestUser {
        u_id: body["authUserId"].as_u64().unwrap() as u32,
        email,
        token: body["token"].as_str().unwrap().to_string(),
    }
}

/// The reset code in the most recent mail to `email`
pub async fn last_reset_code(app: &TestApp, email: &str) -> Option<String> {
    app.mailer
        .sent()
        .await
        .into_iter()
        .rev()
        .find(|mail| mail.to == email)
        .and_then(|mail| mail.body.lines().nth(2).map(str::to_string))
}

/// Create a channel and return its id
pub async fn create_channel(app: &TestApp, user: &TestUser, name: &str, is_public: bool) -> u32 {
    let response = app
        .post(
            "/channels/create/v3",
            &user.token,
            json!({ "name": name, "isPublic": is_public }),
        )
        .await;
    response.assert_status_ok();
    response.json::<serde_json::Value>()["channelId"].as_u64().unwrap() as u32
}

/// Create a DM and return its id
pub async fn create_dm(app: &TestApp, user: &TestUser, u_ids: &[u32]) -> u32 {
    let response = app
        .post("/dm/create/v2", &user.token, json!({ "uIds": u_ids }))
        .await;
    response.assert_status_ok();
    response.json::<serde_json::Value>()["dmId"].as_u64().unwrap() as u32
}

/// Send a channel message and return its id
pub async fn send_message(app: &TestApp, user: &TestUser, channel_id: u32, message: &str) -> u32 {
    let response = app
        .post(
            "/message/send/v2",
            &user.token,
            json!({ "channelId": channel_id, "message": message }),
        )
        .await;
    response.assert_status_ok();
    response.json::<serde_json::Value>()["messageId"].as_u64().unwrap() as u32
}
