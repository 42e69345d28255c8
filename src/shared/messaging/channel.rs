//! Channel Data Structures

use serde::{Deserialize, Serialize};

use super::user::UserProfile;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    pub channel_id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDetails {
    pub name: String,
    pub is_public: bool,
    pub owner_members: Vec<UserProfile>,
    pub all_members: Vec<UserProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelsCreateRequest {
    pub name: String,
    pub is_public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelsCreateResponse {
    pub channel_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelsListResponse {
    pub channels: Vec<ChannelSummary>,
}

/// Body for join and leave
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelIdRequest {
    pub channel_id: u32,
}

/// Body for invite, addowner and removeowner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMemberRequest {
    pub channel_id: u32,
    pub u_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelQuery {
    pub channel_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMessagesQuery {
    pub channel_id: u32,
    pub start: usize,
}
