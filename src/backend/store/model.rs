//! Store Records
//!
//! The persisted shape of users, channels, DMs and messages. These are not
//! sent to clients directly; handlers convert them into the wire types in
//! `shared::messaging`.

use serde::{Deserialize, Serialize};

use crate::shared::messaging::{MessageView, ReactView, UserProfile};

/// The only reaction kind currently supported
pub const THUMBS_UP: u32 = 1;

/// Global permission level of a user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GlobalPermission {
    /// Permission id 1
    Owner,
    /// Permission id 2
    Member,
}

impl GlobalPermission {
    pub fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(Self::Owner),
            2 => Some(Self::Member),
            _ => None,
        }
    }

    pub fn id(self) -> u32 {
        match self {
            Self::Owner => 1,
            Self::Member => 2,
        }
    }
}

/// A channel or a DM
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ConversationRef {
    Channel(u32),
    Dm(u32),
}

impl ConversationRef {
    /// `(channelId, dmId)` with `-1` in the slot that does not apply
    pub fn wire_ids(self) -> (i64, i64) {
        match self {
            Self::Channel(id) => (i64::from(id), -1),
            Self::Dm(id) => (-1, i64::from(id)),
        }
    }
}

/// One `{value, timeStamp}` sample
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatPoint {
    pub value: u32,
    pub time_stamp: i64,
}

/// A time series that only grows a point when its value changes
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct StatSeries(Vec<StatPoint>);

impl StatSeries {
    /// Series starting at zero
    pub fn starting_at(time_stamp: i64) -> Self {
        Self(vec![StatPoint {
            value: 0,
            time_stamp,
        }])
    }

    pub fn current(&self) -> u32 {
        self.0.last().map(|point| point.value).unwrap_or(0)
    }

    /// Append a point if `value` differs from the latest one
    pub fn record(&mut self, value: u32, time_stamp: i64) {
        if self.0.is_empty() || self.current() != value {
            self.0.push(StatPoint { value, time_stamp });
        }
    }

    pub fn points(&self) -> &[StatPoint] {
        &self.0
    }
}

/// Per-user involvement history
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InvolvementLog {
    pub channels_joined: StatSeries,
    pub dms_joined: StatSeries,
    pub messages_sent: StatSeries,
}

impl InvolvementLog {
    pub fn starting_at(time_stamp: i64) -> Self {
        Self {
            channels_joined: StatSeries::starting_at(time_stamp),
            dms_joined: StatSeries::starting_at(time_stamp),
            messages_sent: StatSeries::starting_at(time_stamp),
        }
    }
}

/// Workspace-wide history
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceLog {
    pub channels_exist: StatSeries,
    pub dms_exist: StatSeries,
    pub messages_exist: StatSeries,
}

impl WorkspaceLog {
    pub fn starting_at(time_stamp: i64) -> Self {
        Self {
            channels_exist: StatSeries::starting_at(time_stamp),
            dms_exist: StatSeries::starting_at(time_stamp),
            messages_exist: StatSeries::starting_at(time_stamp),
        }
    }
}

/// Why a notification was raised
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Tagged,
    Invited,
    Reacted,
}

/// A notification event, ordered by `seq`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEvent {
    pub seq: u64,
    pub conversation: ConversationRef,
    pub message: String,
}

/// A user's notification events, one list per kind
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationLog {
    pub tagged: Vec<NotificationEvent>,
    pub invited: Vec<NotificationEvent>,
    pub reacted: Vec<NotificationEvent>,
}

impl NotificationLog {
    pub fn push(&mut self, kind: NotificationKind, event: NotificationEvent) {
        match kind {
            NotificationKind::Tagged => self.tagged.push(event),
            NotificationKind::Invited => self.invited.push(event),
            NotificationKind::Reacted => self.reacted.push(event),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub u_id: u32,
    pub email: String,
    pub name_first: String,
    pub name_last: String,
    pub handle_str: String,
    pub password_hash: String,
    pub permission: GlobalPermission,
    /// Active session ids; a token is only honoured while its id is here
    pub sessions: Vec<String>,
    pub profile_img_url: String,
    /// Set by admin removal; removed users keep their id and profile
    pub removed: bool,
    pub notifications: NotificationLog,
    pub involvement: InvolvementLog,
}

impl User {
    pub fn is_live(&self) -> bool {
        !self.removed
    }

    pub fn is_global_owner(&self) -> bool {
        self.permission == GlobalPermission::Owner
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            u_id: self.u_id,
            email: self.email.clone(),
            name_first: self.name_first.clone(),
            name_last: self.name_last.clone(),
            handle_str: self.handle_str.clone(),
            profile_img_url: self.profile_img_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct React {
    pub react_id: u32,
    pub u_ids: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message_id: u32,
    pub u_id: u32,
    pub message: String,
    pub time_sent: i64,
    pub reacts: Vec<React>,
    pub is_pinned: bool,
}

impl Message {
    pub fn new(message_id: u32, u_id: u32, message: String, time_sent: i64) -> Self {
        Self {
            message_id,
            u_id,
            message,
            time_sent,
            reacts: Vec::new(),
            is_pinned: false,
        }
    }

    pub fn has_reacted(&self, react_id: u32, u_id: u32) -> bool {
        self.reacts
            .iter()
            .any(|react| react.react_id == react_id && react.u_ids.contains(&u_id))
    }

    /// Render for `viewer`. Every supported react kind is listed, even when empty.
    pub fn view(&self, viewer: u32) -> MessageView {
        let reacts = [THUMBS_UP]
            .iter()
            .map(|&react_id| {
                let u_ids = self
                    .reacts
                    .iter()
                    .find(|react| react.react_id == react_id)
                    .map(|react| react.u_ids.clone())
                    .unwrap_or_default();
                ReactView {
                    react_id,
                    is_this_user_reacted: u_ids.contains(&viewer),
                    u_ids,
                }
            })
            .collect();

        MessageView {
            message_id: self.message_id,
            u_id: self.u_id,
            message: self.message.clone(),
            time_sent: self.time_sent,
            reacts,
            is_pinned: self.is_pinned,
        }
    }
}

/// Buffered standup. Lines are `"{handle}: {message}"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Standup {
    pub starter_id: u32,
    pub time_finish: i64,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub channel_id: u32,
    pub name: String,
    pub is_public: bool,
    pub owner_members: Vec<u32>,
    pub all_members: Vec<u32>,
    /// Oldest first
    pub messages: Vec<Message>,
    pub standup: Option<Standup>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Dm {
    pub dm_id: u32,
    pub name: String,
    pub creator_id: u32,
    pub members: Vec<u32>,
    /// Oldest first
    pub messages: Vec<Message>,
}

/// A message accepted now and delivered at `time_sent`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledMessage {
    pub message_id: u32,
    pub conversation: ConversationRef,
    pub u_id: u32,
    pub message: String,
    pub time_sent: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResetCode {
    pub code: String,
    pub u_id: u32,
}

/// Id allocation. Ids start at 1 and are never reused.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Counters {
    pub next_user_id: u32,
    pub next_channel_id: u32,
    pub next_dm_id: u32,
    pub next_message_id: u32,
    pub next_notification_seq: u64,
}

impl Default for Counters {
    fn default() -> Self {
        Self {
            next_user_id: 1,
            next_channel_id: 1,
            next_dm_id: 1,
            next_message_id: 1,
            next_notification_seq: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_series_records_changes_only() {
        let mut series = StatSeries::starting_at(100);
        series.record(0, 101);
        series.record(1, 102);
        series.record(1, 103);
        series.record(0, 104);
        let values: Vec<(u32, i64)> = series
            .points()
            .iter()
            .map(|p| (p.value, p.time_stamp))
            .collect();
        assert_eq!(values, vec![(0, 100), (1, 102), (0, 104)]);
    }

    #[test]
    fn test_permission_ids() {
        assert_eq!(GlobalPermission::from_id(1), Some(GlobalPermission::Owner));
        assert_eq!(GlobalPermission::from_id(2), Some(GlobalPermission::Member));
        assert_eq!(GlobalPermission::from_id(3), None);
        assert_eq!(GlobalPermission::Owner.id(), 1);
    }

    #[test]
    fn test_message_view_lists_thumbs_up_even_without_reacts() {
        let message = Message::new(1, 2, "hi".to_string(), 0);
        let view = message.view(5);
        assert_eq!(view.reacts.len(), 1);
        assert_eq!(view.reacts[0].react_id, THUMBS_UP);
        assert!(view.reacts[0].u_ids.is_empty());
        assert!(!view.reacts[0].is_this_user_reacted);
    }

    #[test]
    fn test_message_view_marks_viewer_reaction() {
        let mut message = Message::new(1, 2, "hi".to_string(), 0);
        message.reacts.push(React {
            react_id: THUMBS_UP,
            u_ids: vec![5],
        });
        assert!(message.view(5).reacts[0].is_this_user_reacted);
        assert!(!message.view(6).reacts[0].is_this_user_reacted);
    }

    #[test]
    fn test_conversation_wire_ids() {
        assert_eq!(ConversationRef::Channel(3).wire_ids(), (3, -1));
        assert_eq!(ConversationRef::Dm(4).wire_ids(), (-1, 4));
    }
}
