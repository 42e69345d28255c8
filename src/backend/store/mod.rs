/**
 * In-Memory Data Store
 *
 * All users, channels, DMs and messages live in one `DataStore` guarded by
 * a single `tokio::sync::RwLock` in `AppState`. Handlers take the lock,
 * apply an operation from one of the domain modules and ask `AppState` to
 * persist the result.
 *
 * # Lookup Rules
 *
 * Lookups are linear scans. Getters that take an id return
 * `BackendError::InputError` when the id is unknown, so domain operations
 * can check ids before access with a plain `?`.
 *
 * # Time
 *
 * `tick(now)` delivers due scheduled messages and closes expired standups.
 * It is run by the background scheduler and again by every handler that
 * reads time-dependent state.
 */

pub mod model;
pub mod persist;

use serde::{Deserialize, Serialize};

use crate::backend::error::BackendError;
pub use model::{
    Channel, ConversationRef, Counters, Dm, GlobalPermission, InvolvementLog, Message,
    NotificationEvent, NotificationKind, NotificationLog, React, ResetCode, ScheduledMessage,
    StatPoint, StatSeries, Standup, User, WorkspaceLog, THUMBS_UP,
};
pub use persist::Persistence;

/// Text that replaces every message of a user removed by an admin
pub const REMOVED_USER_TEXT: &str = "Removed user";

/// The whole persisted state
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataStore {
    pub users: Vec<User>,
    pub channels: Vec<Channel>,
    pub dms: Vec<Dm>,
    pub reset_codes: Vec<ResetCode>,
    pub scheduled: Vec<ScheduledMessage>,
    pub counters: Counters,
    /// Starts at the first registration
    pub workspace: Option<WorkspaceLog>,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- users ----

    /// Any user ever registered, including removed ones
    pub fn user(&self, u_id: u32) -> Result<&User, BackendError> {
        self.users
            .iter()
            .find(|user| user.u_id == u_id)
            .ok_or_else(|| BackendError::input("uId does not refer to a valid user"))
    }

    pub fn user_mut(&mut self, u_id: u32) -> Result<&mut User, BackendError> {
        self.users
            .iter_mut()
            .find(|user| user.u_id == u_id)
            .ok_or_else(|| BackendError::input("uId does not refer to a valid user"))
    }

    /// A user that has not been removed
    pub fn live_user(&self, u_id: u32) -> Result<&User, BackendError> {
        self.users
            .iter()
            .find(|user| user.u_id == u_id && user.is_live())
            .ok_or_else(|| BackendError::input("uId does not refer to a valid user"))
    }

    pub fn live_users(&self) -> impl Iterator<Item = &User> {
        self.users.iter().filter(|user| user.is_live())
    }

    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.live_users().find(|user| user.email == email)
    }

    /// Whether a live user other than `except` already uses `email`
    pub fn email_taken(&self, email: &str, except: Option<u32>) -> bool {
        self.live_users()
            .any(|user| user.email == email && Some(user.u_id) != except)
    }

    /// Whether a live user other than `except` already uses `handle`
    pub fn handle_taken(&self, handle: &str, except: Option<u32>) -> bool {
        self.live_users()
            .any(|user| user.handle_str == handle && Some(user.u_id) != except)
    }

    /// Handle of a user, or an empty string for an unknown id
    pub fn handle_of(&self, u_id: u32) -> String {
        self.user(u_id)
            .map(|user| user.handle_str.clone())
            .unwrap_or_default()
    }

    pub fn session_is_active(&self, u_id: u32, session_id: &str) -> bool {
        self.live_user(u_id)
            .map(|user| user.sessions.iter().any(|sid| sid == session_id))
            .unwrap_or(false)
    }

    pub fn global_owner_count(&self) -> usize {
        self.live_users().filter(|user| user.is_global_owner()).count()
    }

    pub fn is_global_owner(&self, u_id: u32) -> bool {
        self.live_user(u_id)
            .map(User::is_global_owner)
            .unwrap_or(false)
    }

    // ---- channels and DMs ----

    pub fn channel(&self, channel_id: u32) -> Result<&Channel, BackendError> {
        self.channels
            .iter()
            .find(|channel| channel.channel_id == channel_id)
            .ok_or_else(|| BackendError::input("channelId does not refer to a valid channel"))
    }

    pub fn channel_mut(&mut self, channel_id: u32) -> Result<&mut Channel, BackendError> {
        self.channels
            .iter_mut()
            .find(|channel| channel.channel_id == channel_id)
            .ok_or_else(|| BackendError::input("channelId does not refer to a valid channel"))
    }

    pub fn dm(&self, dm_id: u32) -> Result<&Dm, BackendError> {
        self.dms
            .iter()
            .find(|dm| dm.dm_id == dm_id)
            .ok_or_else(|| BackendError::input("dmId does not refer to a valid DM"))
    }

    pub fn dm_mut(&mut self, dm_id: u32) -> Result<&mut Dm, BackendError> {
        self.dms
            .iter_mut()
            .find(|dm| dm.dm_id == dm_id)
            .ok_or_else(|| BackendError::input("dmId does not refer to a valid DM"))
    }

    pub fn conversation_exists(&self, conversation: ConversationRef) -> bool {
        self.conversation_members(conversation).is_some()
    }

    pub fn conversation_name(&self, conversation: ConversationRef) -> Option<&str> {
        match conversation {
            ConversationRef::Channel(id) => self.channel(id).ok().map(|c| c.name.as_str()),
            ConversationRef::Dm(id) => self.dm(id).ok().map(|d| d.name.as_str()),
        }
    }

    pub fn conversation_members(&self, conversation: ConversationRef) -> Option<&[u32]> {
        match conversation {
            ConversationRef::Channel(id) => self.channel(id).ok().map(|c| c.all_members.as_slice()),
            ConversationRef::Dm(id) => self.dm(id).ok().map(|d| d.members.as_slice()),
        }
    }

    pub fn is_member(&self, conversation: ConversationRef, u_id: u32) -> bool {
        self.conversation_members(conversation)
            .map(|members| members.contains(&u_id))
            .unwrap_or(false)
    }

    /// Channel: a channel owner, or a global owner who is a member.
    /// DM: the creator, while still a member.
    pub fn has_owner_permissions(&self, conversation: ConversationRef, u_id: u32) -> bool {
        match conversation {
            ConversationRef::Channel(id) => match self.channel(id) {
                Ok(channel) => {
                    channel.owner_members.contains(&u_id)
                        || (channel.all_members.contains(&u_id) && self.is_global_owner(u_id))
                }
                Err(_) => false,
            },
            ConversationRef::Dm(id) => match self.dm(id) {
                Ok(dm) => dm.creator_id == u_id && dm.members.contains(&u_id),
                Err(_) => false,
            },
        }
    }

    pub fn messages(&self, conversation: ConversationRef) -> Option<&Vec<Message>> {
        match conversation {
            ConversationRef::Channel(id) => self.channel(id).ok().map(|c| &c.messages),
            ConversationRef::Dm(id) => self.dm(id).ok().map(|d| &d.messages),
        }
    }

    pub fn messages_mut(&mut self, conversation: ConversationRef) -> Option<&mut Vec<Message>> {
        match conversation {
            ConversationRef::Channel(id) => self.channel_mut(id).ok().map(|c| &mut c.messages),
            ConversationRef::Dm(id) => self.dm_mut(id).ok().map(|d| &mut d.messages),
        }
    }

    /// Where a delivered message lives: its conversation and index
    pub fn locate_message(&self, message_id: u32) -> Option<(ConversationRef, usize)> {
        let in_channels = self.channels.iter().find_map(|channel| {
            channel
                .messages
                .iter()
                .position(|message| message.message_id == message_id)
                .map(|index| (ConversationRef::Channel(channel.channel_id), index))
        });
        in_channels.or_else(|| {
            self.dms.iter().find_map(|dm| {
                dm.messages
                    .iter()
                    .position(|message| message.message_id == message_id)
                    .map(|index| (ConversationRef::Dm(dm.dm_id), index))
            })
        })
    }

    /// Locate a message in a conversation `u_id` belongs to
    pub fn accessible_message(
        &self,
        message_id: u32,
        u_id: u32,
    ) -> Result<(ConversationRef, usize), BackendError> {
        match self.locate_message(message_id) {
            Some((conversation, index)) if self.is_member(conversation, u_id) => {
                Ok((conversation, index))
            }
            _ => Err(BackendError::input(
                "messageId does not refer to a valid message in a channel or DM you have joined",
            )),
        }
    }

    pub fn message_mut(&mut self, conversation: ConversationRef, index: usize) -> Option<&mut Message> {
        self.messages_mut(conversation)
            .and_then(|messages| messages.get_mut(index))
    }

    pub fn message_count(&self) -> usize {
        self.channels.iter().map(|c| c.messages.len()).sum::<usize>()
            + self.dms.iter().map(|d| d.messages.len()).sum::<usize>()
    }

    // ---- id allocation ----

    pub fn allocate_user_id(&mut self) -> u32 {
        let id = self.counters.next_user_id;
        self.counters.next_user_id += 1;
        id
    }

    pub fn allocate_channel_id(&mut self) -> u32 {
        let id = self.counters.next_channel_id;
        self.counters.next_channel_id += 1;
        id
    }

    pub fn allocate_dm_id(&mut self) -> u32 {
        let id = self.counters.next_dm_id;
        self.counters.next_dm_id += 1;
        id
    }

    /// Message ids are shared by channels, DMs and scheduled messages
    pub fn allocate_message_id(&mut self) -> u32 {
        let id = self.counters.next_message_id;
        self.counters.next_message_id += 1;
        id
    }

    fn allocate_seq(&mut self) -> u64 {
        let seq = self.counters.next_notification_seq;
        self.counters.next_notification_seq += 1;
        seq
    }

    // ---- notifications ----

    /// Append a notification to `u_id`'s log. Unknown users are ignored.
    pub fn notify(
        &mut self,
        u_id: u32,
        kind: NotificationKind,
        conversation: ConversationRef,
        message: String,
    ) {
        let seq = self.allocate_seq();
        if let Ok(user) = self.user_mut(u_id) {
            user.notifications.push(
                kind,
                NotificationEvent {
                    seq,
                    conversation,
                    message,
                },
            );
        }
    }

    /// Notify every member tagged with `@handle` in `text`, once each
    pub fn notify_tags(&mut self, sender: u32, conversation: ConversationRef, text: &str) {
        let Some(name) = self.conversation_name(conversation).map(str::to_string) else {
            return;
        };
        let sender_handle = self.handle_of(sender);
        let preview: String = text.chars().take(20).collect();

        let tagged: Vec<u32> = extract_tags(text)
            .iter()
            .filter_map(|handle| {
                self.live_users()
                    .find(|user| &user.handle_str == handle)
                    .map(|user| user.u_id)
            })
            .filter(|u_id| self.is_member(conversation, *u_id))
            .collect();

        for u_id in tagged {
            self.notify(
                u_id,
                NotificationKind::Tagged,
                conversation,
                format!("{} tagged you in {}: {}", sender_handle, name, preview),
            );
        }
    }

    // ---- messages ----

    /// Append a message to a conversation and count it for the sender
    pub fn post_message(
        &mut self,
        conversation: ConversationRef,
        message_id: u32,
        u_id: u32,
        text: String,
        time_sent: i64,
        with_tags: bool,
    ) -> Result<(), BackendError> {
        let messages = self.messages_mut(conversation).ok_or_else(|| {
            BackendError::state(format!("conversation {:?} disappeared", conversation))
        })?;
        messages.push(Message::new(message_id, u_id, text.clone(), time_sent));

        if let Ok(user) = self.user_mut(u_id) {
            let sent = user.involvement.messages_sent.current() + 1;
            user.involvement.messages_sent.record(sent, time_sent);
        }
        if with_tags {
            self.notify_tags(u_id, conversation, &text);
        }
        self.sync_stats(time_sent);
        Ok(())
    }

    // ---- statistics ----

    /// Record the current channel, DM and message counts where they changed
    pub fn sync_stats(&mut self, now: i64) {
        let channel_counts: Vec<(u32, u32, u32)> = self
            .users
            .iter()
            .filter(|user| user.is_live())
            .map(|user| {
                let channels = self
                    .channels
                    .iter()
                    .filter(|c| c.all_members.contains(&user.u_id))
                    .count() as u32;
                let dms = self
                    .dms
                    .iter()
                    .filter(|d| d.members.contains(&user.u_id))
                    .count() as u32;
                (user.u_id, channels, dms)
            })
            .collect();

        for (u_id, channels, dms) in channel_counts {
            if let Ok(user) = self.user_mut(u_id) {
                user.involvement.channels_joined.record(channels, now);
                user.involvement.dms_joined.record(dms, now);
            }
        }

        let channels = self.channels.len() as u32;
        let dms = self.dms.len() as u32;
        let messages = self.message_count() as u32;
        if let Some(workspace) = self.workspace.as_mut() {
            workspace.channels_exist.record(channels, now);
            workspace.dms_exist.record(dms, now);
            workspace.messages_exist.record(messages, now);
        }
    }

    // ---- scheduler ----

    /// Deliver due scheduled messages and close expired standups.
    /// Returns whether anything changed.
    pub fn tick(&mut self, now: i64) -> bool {
        let mut changed = false;

        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.scheduled)
            .into_iter()
            .partition(|scheduled| scheduled.time_sent <= now);
        self.scheduled = pending;
        due.sort_by_key(|scheduled| (scheduled.time_sent, scheduled.message_id));

        for scheduled in due {
            changed = true;
            if !self.is_member(scheduled.conversation, scheduled.u_id) {
                tracing::debug!(
                    "Dropping scheduled message {}: target gone or sender left",
                    scheduled.message_id
                );
                continue;
            }
            if let Err(e) = self.post_message(
                scheduled.conversation,
                scheduled.message_id,
                scheduled.u_id,
                scheduled.message,
                scheduled.time_sent,
                true,
            ) {
                tracing::error!("Failed to deliver scheduled message: {}", e);
            }
        }

        let expired: Vec<u32> = self
            .channels
            .iter()
            .filter(|channel| {
                channel
                    .standup
                    .as_ref()
                    .map(|standup| standup.time_finish <= now)
                    .unwrap_or(false)
            })
            .map(|channel| channel.channel_id)
            .collect();

        for channel_id in expired {
            changed = true;
            let standup = match self.channel_mut(channel_id) {
                Ok(channel) => channel.standup.take(),
                Err(_) => None,
            };
            let Some(standup) = standup else { continue };
            let conversation = ConversationRef::Channel(channel_id);
            if standup.lines.is_empty() || !self.is_member(conversation, standup.starter_id) {
                tracing::debug!("Standup in channel {} closed with nothing to post", channel_id);
                continue;
            }
            let message_id = self.allocate_message_id();
            if let Err(e) = self.post_message(
                conversation,
                message_id,
                standup.starter_id,
                standup.lines.join("\n"),
                standup.time_finish,
                false,
            ) {
                tracing::error!("Failed to post standup summary: {}", e);
            }
        }

        if changed {
            tracing::debug!("Scheduler tick at {} changed the store", now);
        }
        changed
    }
}

/// Handles tagged in `text` with `@`, in order of first appearance
pub fn extract_tags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let mut rest = text;
    while let Some(at) = rest.find('@') {
        let after = &rest[at + 1..];
        let handle: String = after
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();
        if !handle.is_empty() && !tags.contains(&handle) {
            tags.push(handle.clone());
        }
        rest = &after[handle.len()..];
    }
    tags
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_tags_dedupes_and_stops_at_non_alphanumeric() {
        assert_eq!(
            extract_tags("hi @alice, @bob! @alice again @ @carol2"),
            vec!["alice".to_string(), "bob".to_string(), "carol2".to_string()]
        );
        assert!(extract_tags("no tags here").is_empty());
    }

    #[test]
    fn test_unknown_ids_are_input_errors() {
        let store = DataStore::new();
        assert_eq!(store.user(9).unwrap_err().status_code().as_u16(), 400);
        assert_eq!(store.channel(9).unwrap_err().status_code().as_u16(), 400);
        assert_eq!(store.dm(9).unwrap_err().status_code().as_u16(), 400);
    }

    #[test]
    fn test_message_ids_are_global() {
        let mut store = DataStore::new();
        assert_eq!(store.allocate_message_id(), 1);
        assert_eq!(store.allocate_message_id(), 2);
        assert_eq!(store.allocate_channel_id(), 1);
    }

    #[test]
    fn test_global_owner_acts_as_owner_only_when_member() {
        let mut store = DataStore::new();
        let owner = add_user(&mut store, "owner", GlobalPermission::Owner);
        let member = add_user(&mut store, "member", GlobalPermission::Member);
        let channel = add_channel(&mut store, "general", &[member]);
        let conversation = ConversationRef::Channel(channel);

        assert!(store.has_owner_permissions(conversation, member));
        assert!(!store.has_owner_permissions(conversation, owner));

        store.channel_mut(channel).unwrap().all_members.push(owner);
        assert!(store.has_owner_permissions(conversation, owner));
    }

    #[test]
    fn test_tag_notifies_members_only() {
        let mut store = DataStore::new();
        let alice = add_user(&mut store, "alice", GlobalPermission::Owner);
        let bob = add_user(&mut store, "bob", GlobalPermission::Member);
        let carol = add_user(&mut store, "carol", GlobalPermission::Member);
        let channel = add_channel(&mut store, "general", &[alice, bob]);

        store.notify_tags(alice, ConversationRef::Channel(channel), "@bob @carol @bob look");

        let bob_log = &store.user(bob).unwrap().notifications.tagged;
        assert_eq!(bob_log.len(), 1);
        assert_eq!(bob_log[0].message, "alice tagged you in general: @bob @carol @bob look");
        assert!(store.user(carol).unwrap().notifications.tagged.is_empty());
    }

    #[test]
    fn test_tick_delivers_due_messages_in_order() {
        let mut store = DataStore::new();
        let alice = add_user(&mut store, "alice", GlobalPermission::Owner);
        let channel = add_channel(&mut store, "general", &[alice]);
        for (text, at) in [("later", 20), ("sooner", 10)] {
            let message_id = store.allocate_message_id();
            store.scheduled.push(ScheduledMessage {
                message_id,
                conversation: ConversationRef::Channel(channel),
                u_id: alice,
                message: text.to_string(),
                time_sent: at,
            });
        }

        assert!(!store.tick(5));
        assert!(store.tick(15));
        assert_eq!(store.channel(channel).unwrap().messages.len(), 1);
        assert!(store.tick(25));

        let texts: Vec<&str> = store
            .channel(channel)
            .unwrap()
            .messages
            .iter()
            .map(|m| m.message.as_str())
            .collect();
        assert_eq!(texts, vec!["sooner", "later"]);
        assert!(store.scheduled.is_empty());
        assert_eq!(store.user(alice).unwrap().involvement.messages_sent.current(), 2);
    }

    #[test]
    fn test_tick_drops_delivery_when_sender_left() {
        let mut store = DataStore::new();
        let alice = add_user(&mut store, "alice", GlobalPermission::Owner);
        let bob = add_user(&mut store, "bob", GlobalPermission::Member);
        let channel = add_channel(&mut store, "general", &[alice]);
        let message_id = store.allocate_message_id();
        store.scheduled.push(ScheduledMessage {
            message_id,
            conversation: ConversationRef::Channel(channel),
            u_id: bob,
            message: "hello".to_string(),
            time_sent: 1,
        });

        assert!(store.tick(2));
        assert!(store.channel(channel).unwrap().messages.is_empty());
        assert!(store.scheduled.is_empty());
    }

    #[test]
    fn test_tick_drops_delivery_when_dm_removed() {
        let mut store = DataStore::new();
        let alice = add_user(&mut store, "alice", GlobalPermission::Owner);
        let bob = add_user(&mut store, "bob", GlobalPermission::Member);
        let dm_id = store.allocate_dm_id();
        store.dms.push(Dm {
            dm_id,
            name: "alice, bob".to_string(),
            creator_id: alice,
            members: vec![alice, bob],
            messages: Vec::new(),
        });
        let message_id = store.allocate_message_id();
        store.scheduled.push(ScheduledMessage {
            message_id,
            conversation: ConversationRef::Dm(dm_id),
            u_id: bob,
            message: "see you".to_string(),
            time_sent: 5,
        });

        store.dms.retain(|dm| dm.dm_id != dm_id);
        assert!(store.tick(5));
        assert!(store.scheduled.is_empty());
        assert!(store.dm(dm_id).is_err());
        assert!(store.dms.is_empty());
    }

    #[test]
    fn test_tick_closes_standup_and_posts_summary() {
        let mut store = DataStore::new();
        let alice = add_user(&mut store, "alice", GlobalPermission::Owner);
        let channel = add_channel(&mut store, "general", &[alice]);
        store.channel_mut(channel).unwrap().standup = Some(Standup {
            starter_id: alice,
            time_finish: 100,
            lines: vec!["alice: one".to_string(), "alice: two".to_string()],
        });

        assert!(!store.tick(99));
        assert!(store.tick(100));

        let channel = store.channel(channel).unwrap();
        assert!(channel.standup.is_none());
        assert_eq!(channel.messages.len(), 1);
        assert_eq!(channel.messages[0].message, "alice: one\nalice: two");
        assert_eq!(channel.messages[0].time_sent, 100);
    }

    #[test]
    fn test_empty_standup_posts_nothing() {
        let mut store = DataStore::new();
        let alice = add_user(&mut store, "alice", GlobalPermission::Owner);
        let channel = add_channel(&mut store, "general", &[alice]);
        store.channel_mut(channel).unwrap().standup = Some(Standup {
            starter_id: alice,
            time_finish: 10,
            lines: Vec::new(),
        });

        assert!(store.tick(10));
        assert!(store.channel(channel).unwrap().messages.is_empty());
    }

    #[test]
    fn test_sync_stats_tracks_workspace_counts() {
        let mut store = DataStore::new();
        let alice = add_user(&mut store, "alice", GlobalPermission::Owner);
        add_channel(&mut store, "general", &[alice]);
        store.sync_stats(7);

        let workspace = store.workspace.as_ref().unwrap();
        assert_eq!(workspace.channels_exist.current(), 1);
        assert_eq!(workspace.dms_exist.current(), 0);
        let user = store.user(alice).unwrap();
        assert_eq!(user.involvement.channels_joined.current(), 1);
        assert_eq!(user.involvement.channels_joined.points().len(), 2);
    }
}
