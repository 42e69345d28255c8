//! Notification Data Structures

use serde::{Deserialize, Serialize};

/// One feed entry. The id that does not apply is `-1`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub channel_id: i64,
    pub dm_id: i64,
    pub notification_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
}
