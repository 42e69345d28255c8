//! Admin API integration tests

#[macro_use]
mod common;

use common::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[tokio::test]
async fn test_remove_user() {
    let app = TestApp::new().await;
    let ada = register(&app, "Ada", "Lovelace").await;
    let grace = register(&app, "Grace", "Hopper").await;
    let channel = create_channel(&app, &ada, "general", true).await;
    app.post("/channel/join/v3", &grace.token, json!({ "channelId": channel }))
        .await
        .assert_status_ok();
    send_message(&app, &grace, channel, "soon to be removed").await;

    let response = app
        .delete("/admin/user/remove/v1", &ada.token, json!({ "uId": grace.u_id }))
        .await;
    assert_status!(response, 200);

    // The removed user's session is gone
    assert_status!(app.get("/channels/list/v3", &grace.token, json!({})).await, 403);

    let profile = app
        .get("/user/profile/v3", &ada.token, json!({ "uId": grace.u_id }))
        .await
        .json::<Value>();
    assert_eq!(profile["user"]["nameFirst"], "Removed");
    assert_eq!(profile["user"]["nameLast"], "user");

    let all = app.get("/users/all/v2", &ada.token, json!({})).await.json::<Value>();
    assert_eq!(all["users"].as_array().unwrap().len(), 1);

    let page = app
        .get("/channel/messages/v3", &ada.token, json!({ "channelId": channel, "start": 0 }))
        .await
        .json::<Value>();
    assert_eq!(page["messages"][0]["message"], "Removed user");

    let details = app
        .get("/channel/details/v3", &ada.token, json!({ "channelId": channel }))
        .await
        .json::<Value>();
    assert_eq!(details["allMembers"].as_array().unwrap().len(), 1);

    // The handle is free again
    app.put("/user/profile/sethandle/v2", &ada.token, json!({ "handleStr": "gracehopper" }))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn test_remove_user_rules() {
    let app = TestApp::new().await;
    let ada = register(&app, "Ada", "Lovelace").await;
    let grace = register(&app, "Grace", "Hopper").await;

    assert_status!(
        app.delete("/admin/user/remove/v1", &grace.token, json!({ "uId": ada.u_id })).await,
        403
    );
    assert_status!(
        app.delete("/admin/user/remove/v1", &ada.token, json!({ "uId": ada.u_id })).await,
        400
    );
    assert_status!(
        app.delete("/admin/user/remove/v1", &ada.token, json!({ "uId": 42 })).await,
        400
    );
}

#[tokio::test]
async fn test_change_permission() {
    let app = TestApp::new().await;
    let ada = register(&app, "Ada", "Lovelace").await;
    let grace = register(&app, "Grace", "Hopper").await;
    let channel = create_channel(&app, &ada, "secret", false).await;

    let change = |u_id: u32, permission_id: u32| json!({ "uId": u_id, "permissionId": permission_id });

    assert_status!(
        app.post("/admin/userpermission/change/v1", &grace.token, change(grace.u_id, 1)).await,
        403
    );
    assert_status!(
        app.post("/admin/userpermission/change/v1", &ada.token, change(grace.u_id, 3)).await,
        400
    );
    assert_status!(
        app.post("/admin/userpermission/change/v1", &ada.token, change(ada.u_id, 2)).await,
        400
    );
    assert_status!(
        app.post("/admin/userpermission/change/v1", &ada.token, change(grace.u_id, 1)).await,
        200
    );

    // Global owners may join private channels
    assert_status!(
        app.post("/channel/join/v3", &grace.token, json!({ "channelId": channel })).await,
        200
    );

    assert_status!(
        app.post("/admin/userpermission/change/v1", &grace.token, change(ada.u_id, 2)).await,
        200
    );
    assert_status!(
        app.delete("/admin/user/remove/v1", &ada.token, json!({ "uId": grace.u_id })).await,
        403
    );
}

#[tokio::test]
async fn test_clear_resets_everything() {
    let app = TestApp::new().await;
    let ada = register(&app, "Ada", "Lovelace").await;
    create_channel(&app, &ada, "general", true).await;

    let response = app.server.delete("/clear/v1").await;
    assert_status!(response, 200);
    assert_eq!(response.json::<Value>(), json!({}));

    assert_status!(app.get("/channels/listall/v3", &ada.token, json!({})).await, 403);

    let again = register(&app, "Ada", "Lovelace").await;
    assert_eq!(again.u_id, 1);
    let all = app
        .get("/channels/listall/v3", &again.token, json!({}))
        .await
        .json::<Value>();
    assert_eq!(all, json!({ "channels": [] }));
}
