//! Persistence integration tests
//!
//! A second app started on the same data file sees the first app's state.

#[macro_use]
mod common;

use std::path::PathBuf;
use std::time::Duration;

use common::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

async fn app_on(data_path: PathBuf) -> TestApp {
    TestApp::with_config(move |builder| builder.data_path(data_path)).await
}

#[tokio::test]
async fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("data.json");

    let (ada, channel) = {
        let app = app_on(data_path.clone()).await;
        let ada = register(&app, "Ada", "Lovelace").await;
        let channel = create_channel(&app, &ada, "general", true).await;
        send_message(&app, &ada, channel, "still here").await;
        (ada, channel)
    };
    assert!(data_path.exists());

    let app = app_on(data_path.clone()).await;

    // Sessions are persisted with the store
    let page = app
        .get("/channel/messages/v3", &ada.token, json!({ "channelId": channel, "start": 0 }))
        .await;
    assert_status!(page, 200);
    assert_eq!(page.json::<Value>()["messages"][0]["message"], "still here");

    // Ids continue where they left off
    let grace = register(&app, "Grace", "Hopper").await;
    assert_eq!(grace.u_id, ada.u_id + 1);
    let second = create_channel(&app, &grace, "second", true).await;
    assert_eq!(second, channel + 1);
}

#[tokio::test]
async fn test_pending_send_later_delivered_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("data.json");
    let time_sent = beans::shared::time::now_secs() + 2;

    let (ada, channel, message_id) = {
        let app = app_on(data_path.clone()).await;
        let ada = register(&app, "Ada", "Lovelace").await;
        let channel = create_channel(&app, &ada, "general", true).await;
        let response = app
            .post(
                "/message/sendlater/v1",
                &ada.token,
                json!({ "channelId": channel, "message": "after the restart", "timeSent": time_sent }),
            )
            .await;
        assert_status!(response, 200);
        (ada, channel, response.json::<Value>()["messageId"].clone())
    };

    let app = app_on(data_path).await;
    tokio::time::sleep(Duration::from_millis(3100)).await;

    let page = app
        .get("/channel/messages/v3", &ada.token, json!({ "channelId": channel, "start": 0 }))
        .await
        .json::<Value>();
    assert_eq!(page["messages"].as_array().unwrap().len(), 1);
    assert_eq!(page["messages"][0]["messageId"], message_id);
    assert_eq!(page["messages"][0]["message"], "after the restart");
    assert_eq!(page["messages"][0]["timeSent"], time_sent);
}

#[tokio::test]
async fn test_clear_is_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("data.json");

    {
        let app = app_on(data_path.clone()).await;
        register(&app, "Ada", "Lovelace").await;
        app.server.delete("/clear/v1").await.assert_status_ok();
    }

    let saved: Value = serde_json::from_slice(&std::fs::read(&data_path).unwrap()).unwrap();
    assert_eq!(saved["users"], json!([]));

    let app = app_on(data_path).await;
    assert_eq!(register(&app, "Ada", "Lovelace").await.u_id, 1);
}

#[tokio::test]
async fn test_corrupt_data_file_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    let data_path = dir.path().join("data.json");
    std::fs::write(&data_path, b"{ not json").unwrap();

    let config = beans::shared::AppConfig::builder()
        .data_path(data_path)
        .image_dir(dir.path().join("images"))
        .build()
        .unwrap();
    let result = beans::backend::server::build_state(config, beans::backend::mail::Mailer::memory()).await;
    assert!(result.is_err());
}
