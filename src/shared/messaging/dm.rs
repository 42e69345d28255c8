//! Direct Message Data Structures

use serde::{Deserialize, Serialize};

use super::user::UserProfile;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DmSummary {
    pub dm_id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DmDetails {
    pub name: String,
    pub members: Vec<UserProfile>,
}

/// Users to add besides the creator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmCreateRequest {
    pub u_ids: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmCreateResponse {
    pub dm_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DmListResponse {
    pub dms: Vec<DmSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmIdRequest {
    pub dm_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmQuery {
    pub dm_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DmMessagesQuery {
    pub dm_id: u32,
    pub start: usize,
}
