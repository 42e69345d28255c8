//! Standup API integration tests

#[macro_use]
mod common;

use std::time::Duration;

use common::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[tokio::test]
async fn test_standup_collects_and_posts_summary() {
    let app = TestApp::new().await;
    let ada = register(&app, "Ada", "Lovelace").await;
    let grace = register(&app, "Grace", "Hopper").await;
    let channel = create_channel(&app, &ada, "general", true).await;
    app.post("/channel/join/v3", &grace.token, json!({ "channelId": channel }))
        .await
        .assert_status_ok();

    let start = app
        .post("/standup/start/v1", &ada.token, json!({ "channelId": channel, "length": 2 }))
        .await;
    assert_status!(start, 200);
    let time_finish = start.json::<Value>()["timeFinish"].as_i64().unwrap();

    let active = app
        .get("/standup/active/v1", &grace.token, json!({ "channelId": channel }))
        .await;
    assert_eq!(
        active.json::<Value>(),
        json!({ "isActive": true, "timeFinish": time_finish })
    );

    let again = app
        .post("/standup/start/v1", &grace.token, json!({ "channelId": channel, "length": 5 }))
        .await;
    assert_status!(again, 400);

    for (user, text) in [(&ada, "wrote the parser"), (&grace, "fixed the build")] {
        app.post("/standup/send/v1", &user.token, json!({ "channelId": channel, "message": text }))
            .await
            .assert_status_ok();
    }

    tokio::time::sleep(Duration::from_millis(3100)).await;

    let active = app
        .get("/standup/active/v1", &grace.token, json!({ "channelId": channel }))
        .await;
    assert_eq!(
        active.json::<Value>(),
        json!({ "isActive": false, "timeFinish": null })
    );

    let page = app
        .get("/channel/messages/v3", &grace.token, json!({ "channelId": channel, "start": 0 }))
        .await
        .json::<Value>();
    let summary = &page["messages"][0];
    assert_eq!(summary["uId"], ada.u_id);
    assert_eq!(summary["timeSent"], time_finish);
    assert_eq!(
        summary["message"],
        "adalovelace: wrote the parser\ngracehopper: fixed the build"
    );
}

#[tokio::test]
async fn test_standup_without_lines_posts_nothing() {
    let app = TestApp::new().await;
    let ada = register(&app, "Ada", "Lovelace").await;
    let channel = create_channel(&app, &ada, "general", true).await;

    app.post("/standup/start/v1", &ada.token, json!({ "channelId": channel, "length": 0 }))
        .await
        .assert_status_ok();

    let page = app
        .get("/channel/messages/v3", &ada.token, json!({ "channelId": channel, "start": 0 }))
        .await
        .json::<Value>();
    assert_eq!(page["messages"], json!([]));
}

#[tokio::test]
async fn test_standup_errors() {
    let app = TestApp::new().await;
    let ada = register(&app, "Ada", "Lovelace").await;
    let grace = register(&app, "Grace", "Hopper").await;
    let channel = create_channel(&app, &ada, "general", true).await;

    assert_status!(
        app.post("/standup/start/v1", &ada.token, json!({ "channelId": channel, "length": -1 }))
            .await,
        400
    );
    assert_status!(
        app.post("/standup/start/v1", &ada.token, json!({ "channelId": 9, "length": 5 })).await,
        400
    );
    assert_status!(
        app.post("/standup/start/v1", &grace.token, json!({ "channelId": channel, "length": 5 }))
            .await,
        403
    );
    assert_status!(
        app.post("/standup/send/v1", &ada.token, json!({ "channelId": channel, "message": "hi" }))
            .await,
        400
    );
    assert_status!(
        app.get("/standup/active/v1", &grace.token, json!({ "channelId": channel })).await,
        403
    );

    app.post("/standup/start/v1", &ada.token, json!({ "channelId": channel, "length": 60 }))
        .await
        .assert_status_ok();
    assert_status!(
        app.post(
            "/standup/send/v1",
            &ada.token,
            json!({ "channelId": channel, "message": "x".repeat(1001) })
        )
        .await,
        400
    );
    // The starter cannot leave while the standup runs
    assert_status!(
        app.post("/channel/leave/v2", &ada.token, json!({ "channelId": channel })).await,
        400
    );
}
