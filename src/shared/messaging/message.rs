//! Chat Message Data Structures
//!
//! A message as returned to a client, and the requests that create or
//! change messages.

use serde::{Deserialize, Serialize};

/// One reaction kind on a message, from the viewer's perspective
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReactView {
    pub react_id: u32,
    pub u_ids: Vec<u32>,
    pub is_this_user_reacted: bool,
}

/// A message in a channel or DM
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub message_id: u32,
    pub u_id: u32,
    pub message: String,
    /// Unix seconds
    pub time_sent: i64,
    pub reacts: Vec<ReactView>,
    pub is_pinned: bool,
}

/// One page of history, newest first. `end` is `-1` on the last page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessagesPage {
    pub messages: Vec<MessageView>,
    pub start: usize,
    pub end: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub channel_id: u32,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendDmRequest {
    pub dm_id: u32,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub message_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditMessageRequest {
    pub message_id: u32,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageQuery {
    pub message_id: u32,
}

/// Body for pin and unpin
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageIdRequest {
    pub message_id: u32,
}

/// Body for react and unreact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactRequest {
    pub message_id: u32,
    pub react_id: u32,
}

/// Exactly one of `channelId` / `dmId` is `-1`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareMessageRequest {
    pub og_message_id: u32,
    #[serde(default)]
    pub message: String,
    pub channel_id: i64,
    pub dm_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareMessageResponse {
    pub shared_message_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendLaterRequest {
    pub channel_id: u32,
    pub message: String,
    pub time_sent: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendLaterDmRequest {
    pub dm_id: u32,
    pub message: String,
    pub time_sent: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub query_str: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub messages: Vec<MessageView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_request_message_defaults_to_empty() {
        let request: ShareMessageRequest =
            serde_json::from_str(r#"{"ogMessageId": 3, "channelId": -1, "dmId": 2}"#).unwrap();
        assert_eq!(request.og_message_id, 3);
        assert_eq!(request.message, "");
        assert_eq!(request.channel_id, -1);
    }

    #[test]
    fn test_react_view_field_names() {
        let view = ReactView {
            react_id: 1,
            u_ids: vec![4],
            is_this_user_reacted: true,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["reactId"], 1);
        assert_eq!(json["uIds"][0], 4);
        assert_eq!(json["isThisUserReacted"], true);
    }
}
