//! Statistics Data Structures
//!
//! Every series is a list of `{numX, timeStamp}` points recorded whenever
//! the value changes.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelsJoinedPoint {
    pub num_channels_joined: u32,
    pub time_stamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DmsJoinedPoint {
    pub num_dms_joined: u32,
    pub time_stamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessagesSentPoint {
    pub num_messages_sent: u32,
    pub time_stamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelsExistPoint {
    pub num_channels_exist: u32,
    pub time_stamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DmsExistPoint {
    pub num_dms_exist: u32,
    pub time_stamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessagesExistPoint {
    pub num_messages_exist: u32,
    pub time_stamp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub channels_joined: Vec<ChannelsJoinedPoint>,
    pub dms_joined: Vec<DmsJoinedPoint>,
    pub messages_sent: Vec<MessagesSentPoint>,
    pub involvement_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceStats {
    pub channels_exist: Vec<ChannelsExistPoint>,
    pub dms_exist: Vec<DmsExistPoint>,
    pub messages_exist: Vec<MessagesExistPoint>,
    pub utilization_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsResponse {
    pub user_stats: UserStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceStatsResponse {
    pub workspace_stats: WorkspaceStats,
}
