//! Authentication API integration tests
//!
//! Registration, login, logout, token checks and password reset.

#[macro_use]
mod common;

use common::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[tokio::test]
async fn test_register_returns_token_and_id() {
    let app = TestApp::new().await;

    let ada = register(&app, "Ada", "Lovelace").await;
    let grace = register(&app, "Grace", "Hopper").await;

    assert_eq!(ada.u_id, 1);
    assert_eq!(grace.u_id, 2);
    assert_ne!(ada.token, grace.token);
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let app = TestApp::new().await;
    register(&app, "Ada", "Lovelace").await;

    let cases = [
        json!({ "email": "ada@example.com", "password": "password123", "nameFirst": "A", "nameLast": "B" }),
        json!({ "email": "not-an-email", "password": "password123", "nameFirst": "A", "nameLast": "B" }),
        json!({ "email": "b@example.com", "password": "short", "nameFirst": "A", "nameLast": "B" }),
        json!({ "email": "c@example.com", "password": "password123", "nameFirst": "", "nameLast": "B" }),
        json!({ "email": "d@example.com", "password": "password123", "nameFirst": "A", "nameLast": "x".repeat(51) }),
        json!({ "email": "e@example.com" }),
    ];
    for body in cases {
        let response = app.server.post("/auth/register/v3").json(&body).await;
        assert_status!(response, 400);
    }
}

#[tokio::test]
async fn test_handles_are_generated_and_deduplicated() {
    let app = TestApp::new().await;
    let first = register(&app, "Ada", "Lovelace").await;

    let response = app
        .server
        .post("/auth/register/v3")
        .json(&json!({
            "email": "ada2@example.com",
            "password": TEST_PASSWORD,
            "nameFirst": "Ada",
            "nameLast": "Lovelace",
        }))
        .await;
    response.assert_status_ok();
    let second_id = response.json::<Value>()["authUserId"].as_u64().unwrap();

    let users = app.get("/users/all/v2", &first.token, json!({})).await;
    let users = users.json::<Value>();
    let handles: Vec<(u64, &str)> = users["users"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| (u["uId"].as_u64().unwrap(), u["handleStr"].as_str().unwrap()))
        .collect();
    assert_eq!(handles, vec![(1, "adalovelace"), (second_id, "adalovelace0")]);
}

#[tokio::test]
async fn test_login_and_logout() {
    let app = TestApp::new().await;
    let ada = register(&app, "Ada", "Lovelace").await;

    let response = app
        .server
        .post("/auth/login/v3")
        .json(&json!({ "email": ada.email, "password": TEST_PASSWORD }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["authUserId"], ada.u_id);
    let second_token = body["token"].as_str().unwrap().to_string();

    let logout = app.post("/auth/logout/v2", &ada.token, json!({})).await;
    assert_status!(logout, 200);

    // Only the logged-out session is closed
    assert_status!(app.get("/channels/list/v3", &ada.token, json!({})).await, 403);
    assert_status!(app.get("/channels/list/v3", &second_token, json!({})).await, 200);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let app = TestApp::new().await;
    let ada = register(&app, "Ada", "Lovelace").await;

    let wrong_password = app
        .server
        .post("/auth/login/v3")
        .json(&json!({ "email": ada.email, "password": "wrong-password" }))
        .await;
    assert_status!(wrong_password, 400);

    let unknown = app
        .server
        .post("/auth/login/v3")
        .json(&json!({ "email": "nobody@example.com", "password": TEST_PASSWORD }))
        .await;
    assert_status!(unknown, 400);
}

#[tokio::test]
async fn test_missing_or_invalid_token() {
    let app = TestApp::new().await;
    register(&app, "Ada", "Lovelace").await;

    let missing = app.server.get("/channels/list/v3").await;
    assert_status!(missing, 403);

    let garbage = app.get("/channels/list/v3", "not-a-token", json!({})).await;
    assert_status!(garbage, 403);
    assert_eq!(garbage.json::<Value>()["status"], 403);
}

#[tokio::test]
async fn test_bearer_token_is_accepted() {
    let app = TestApp::new().await;
    let ada = register(&app, "Ada", "Lovelace").await;

    let response = app
        .server
        .get("/channels/list/v3")
        .add_header(
            axum::http::header::AUTHORIZATION,
            axum::http::HeaderValue::from_str(&format!("Bearer {}", ada.token)).unwrap(),
        )
        .await;
    assert_status!(response, 200);
}

#[tokio::test]
async fn test_password_reset_flow() {
    let app = TestApp::new().await;
    let ada = register(&app, "Ada", "Lovelace").await;

    let request = app
        .server
        .post("/auth/passwordreset/request/v1")
        .json(&json!({ "email": ada.email }))
        .await;
    assert_status!(request, 200);
    assert_eq!(request.json::<Value>(), json!({}));

    // Requesting a reset logs the user out everywhere
    assert_status!(app.get("/channels/list/v3", &ada.token, json!({})).await, 403);

    let code = last_reset_code(&app, &ada.email).await.unwrap();
    let reset = app
        .server
        .post("/auth/passwordreset/reset/v1")
        .json(&json!({ "resetCode": code, "newPassword": "new-password" }))
        .await;
    assert_status!(reset, 200);

    let login = app
        .server
        .post("/auth/login/v3")
        .json(&json!({ "email": ada.email, "password": "new-password" }))
        .await;
    assert_status!(login, 200);

    let reused = app
        .server
        .post("/auth/passwordreset/reset/v1")
        .json(&json!({ "resetCode": code, "newPassword": "another-password" }))
        .await;
    assert_status!(reused, 400);
}

#[tokio::test]
async fn test_password_reset_edge_cases() {
    let app = TestApp::new().await;
    let ada = register(&app, "Ada", "Lovelace").await;

    let unknown_email = app
        .server
        .post("/auth/passwordreset/request/v1")
        .json(&json!({ "email": "nobody@example.com" }))
        .await;
    assert_status!(unknown_email, 200);
    assert!(app.mailer.sent().await.is_empty());

    app.server
        .post("/auth/passwordreset/request/v1")
        .json(&json!({ "email": ada.email }))
        .await
        .assert_status_ok();
    let code = last_reset_code(&app, &ada.email).await.unwrap();

    let short = app
        .server
        .post("/auth/passwordreset/reset/v1")
        .json(&json!({ "resetCode": code, "newPassword": "abc" }))
        .await;
    assert_status!(short, 400);

    let bad_code = app
        .server
        .post("/auth/passwordreset/reset/v1")
        .json(&json!({ "resetCode": "not-a-code", "newPassword": "new-password" }))
        .await;
    assert_status!(bad_code, 400);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new().await;
    let response = app.server.get("/no/such/route").await;
    assert_status!(response, 404);
    assert_eq!(response.json::<Value>()["status"], 404);
}
