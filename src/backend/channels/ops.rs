/**
 * Channel Operations
 *
 * Creation, listing, membership and ownership of channels.
 *
 * A caller holds owner permissions in a channel if they are one of its
 * owners, or a global owner who is a member.
 */

use crate::backend::error::BackendError;
use crate::backend::messages::ops::require_member;
use crate::backend::messages::page;
use crate::backend::store::{Channel, ConversationRef, DataStore, NotificationKind, User};
use crate::shared::messaging::{ChannelDetails, ChannelSummary, MessagesPage, UserProfile};
use crate::shared::validation::validate_channel_name;

fn summary(channel: &Channel) -> ChannelSummary {
    ChannelSummary {
        channel_id: channel.channel_id,
        name: channel.name.clone(),
    }
}

/// Profiles for `ids`, in order
pub fn profiles(store: &DataStore, ids: &[u32]) -> Vec<UserProfile> {
    ids.iter()
        .filter_map(|id| store.user(*id).ok().map(User::profile))
        .collect()
}

pub fn create(
    store: &mut DataStore,
    u_id: u32,
    name: String,
    is_public: bool,
    now: i64,
) -> Result<u32, BackendError> {
    validate_channel_name(&name)?;

    let channel_id = store.allocate_channel_id();
    store.channels.push(Channel {
        channel_id,
        name,
        is_public,
        owner_members: vec![u_id],
        all_members: vec![u_id],
        messages: Vec::new(),
        standup: None,
    });
    store.sync_stats(now);

    tracing::info!("User {} created channel {}", u_id, channel_id);
    Ok(channel_id)
}

/// Channels the caller belongs to
pub fn list(store: &DataStore, u_id: u32) -> Vec<ChannelSummary> {
    store
        .channels
        .iter()
        .filter(|channel| channel.all_members.contains(&u_id))
        .map(summary)
        .collect()
}

/// Every channel, public or private
pub fn list_all(store: &DataStore) -> Vec<ChannelSummary> {
    store.channels.iter().map(summary).collect()
}

pub fn details(store: &DataStore, u_id: u32, channel_id: u32) -> Result<ChannelDetails, BackendError> {
    let channel = store.channel(channel_id)?;
    require_member(store, ConversationRef::Channel(channel_id), u_id)?;

    Ok(ChannelDetails {
        name: channel.name.clone(),
        is_public: channel.is_public,
        owner_members: profiles(store, &channel.owner_members),
        all_members: profiles(store, &channel.all_members),
    })
}

pub fn join(store: &mut DataStore, u_id: u32, channel_id: u32, now: i64) -> Result<(), BackendError> {
    let channel = store.channel(channel_id)?;
    if channel.all_members.contains(&u_id) {
        return Err(BackendError::input("You are already a member of this channel"));
    }
    if !channel.is_public && !store.is_global_owner(u_id) {
        tracing::warn!("User {} tried to join private channel {}", u_id, channel_id);
        return Err(BackendError::access("This channel is private"));
    }

    store.channel_mut(channel_id)?.all_members.push(u_id);
    store.sync_stats(now);
    tracing::info!("User {} joined channel {}", u_id, channel_id);
    Ok(())
}

/// Add a live user to a channel the caller belongs to, and tell them
pub fn invite(
    store: &mut DataStore,
    u_id: u32,
    channel_id: u32,
    invitee: u32,
    now: i64,
) -> Result<(), BackendError> {
    store.channel(channel_id)?;
    store.live_user(invitee)?;
    let conversation = ConversationRef::Channel(channel_id);
    require_member(store, conversation, u_id)?;
    if store.is_member(conversation, invitee) {
        return Err(BackendError::input("User is already a member of this channel"));
    }

    let text = format!("{} added you to {}", store.handle_of(u_id), store.channel(channel_id)?.name);
    store.channel_mut(channel_id)?.all_members.push(invitee);
    store.notify(invitee, NotificationKind::Invited, conversation, text);
    store.sync_stats(now);

    tracing::info!("User {} invited {} to channel {}", u_id, invitee, channel_id);
    Ok(())
}

pub fn messages(
    store: &DataStore,
    u_id: u32,
    channel_id: u32,
    start: usize,
) -> Result<MessagesPage, BackendError> {
    let channel = store.channel(channel_id)?;
    require_member(store, ConversationRef::Channel(channel_id), u_id)?;
    page(&channel.messages, start, u_id)
}

/// Leave a channel, giving up ownership too
pub fn leave(store: &mut DataStore, u_id: u32, channel_id: u32, now: i64) -> Result<(), BackendError> {
    let channel = store.channel(channel_id)?;
    require_member(store, ConversationRef::Channel(channel_id), u_id)?;
    if channel.standup.as_ref().map(|s| s.starter_id) == Some(u_id) {
        return Err(BackendError::input("You started the active standup in this channel"));
    }

    let channel = store.channel_mut(channel_id)?;
    channel.all_members.retain(|id| *id != u_id);
    channel.owner_members.retain(|id| *id != u_id);
    store.sync_stats(now);

    tracing::info!("User {} left channel {}", u_id, channel_id);
    Ok(())
}

fn require_owner_permissions(store: &DataStore, u_id: u32, channel_id: u32) -> Result<(), BackendError> {
    if store.has_owner_permissions(ConversationRef::Channel(channel_id), u_id) {
        return Ok(());
    }
    tracing::warn!("User {} lacks owner permissions in channel {}", u_id, channel_id);
    Err(BackendError::access("You do not have owner permissions in this channel"))
}

pub fn add_owner(store: &mut DataStore, u_id: u32, channel_id: u32, target: u32) -> Result<(), BackendError> {
    let channel = store.channel(channel_id)?;
    store.live_user(target)?;
    require_owner_permissions(store, u_id, channel_id)?;
    if !channel.all_members.contains(&target) {
        return Err(BackendError::input("User is not a member of this channel"));
    }
    if channel.owner_members.contains(&target) {
        return Err(BackendError::input("User is already an owner of this channel"));
    }

    store.channel_mut(channel_id)?.owner_members.push(target);
    tracing::info!("User {} made {} an owner of channel {}", u_id, target, channel_id);
    Ok(())
}

pub fn remove_owner(store: &mut DataStore, u_id: u32, channel_id: u32, target: u32) -> Result<(), BackendError> {
    let channel = store.channel(channel_id)?;
    store.live_user(target)?;
    require_owner_permissions(store, u_id, channel_id)?;
    if !channel.owner_members.contains(&target) {
        return Err(BackendError::input("User is not an owner of this channel"));
    }
    if channel.owner_members.len() == 1 {
        return Err(BackendError::input("User is the only owner of this channel"));
    }

    store
        .channel_mut(channel_id)?
        .owner_members
        .retain(|id| *id != target);
    tracing::info!("User {} removed {} as owner of channel {}", u_id, target, channel_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::test_support::add_user;
    use crate::backend::store::{GlobalPermission, Standup};
    use pretty_assertions::assert_eq;

    fn status(error: BackendError) -> u16 {
        error.status_code().as_u16()
    }

    fn setup() -> (DataStore, u32, u32, u32) {
        let mut store = DataStore::new();
        let owner = add_user(&mut store, "owner", GlobalPermission::Owner);
        let alice = add_user(&mut store, "alice", GlobalPermission::Member);
        let bob = add_user(&mut store, "bob", GlobalPermission::Member);
        (store, owner, alice, bob)
    }

    #[test]
    fn test_create_validates_name() {
        let (mut store, _, alice, _) = setup();
        assert_eq!(status(create(&mut store, alice, String::new(), true, 1).unwrap_err()), 400);
        assert_eq!(status(create(&mut store, alice, "x".repeat(21), true, 1).unwrap_err()), 400);
        let id = create(&mut store, alice, "x".repeat(20), true, 1).unwrap();
        assert_eq!(list(&store, alice), vec![ChannelSummary { channel_id: id, name: "x".repeat(20) }]);
    }

    #[test]
    fn test_private_channel_join() {
        let (mut store, owner, alice, bob) = setup();
        let id = create(&mut store, alice, "secret".into(), false, 1).unwrap();

        assert_eq!(status(join(&mut store, bob, id, 2).unwrap_err()), 403);
        assert_eq!(status(join(&mut store, alice, id, 2).unwrap_err()), 400);
        join(&mut store, owner, id, 2).unwrap();
        assert_eq!(list_all(&store).len(), 1);
        assert!(list(&store, bob).is_empty());
    }

    #[test]
    fn test_invite_notifies_invitee() {
        let (mut store, _, alice, bob) = setup();
        let id = create(&mut store, alice, "general".into(), true, 1).unwrap();

        invite(&mut store, alice, id, bob, 2).unwrap();
        assert_eq!(status(invite(&mut store, alice, id, bob, 2).unwrap_err()), 400);
        assert_eq!(status(invite(&mut store, alice, id, 99, 2).unwrap_err()), 400);

        let invited = &store.user(bob).unwrap().notifications.invited;
        assert_eq!(invited[0].message, "alice added you to general");
        assert_eq!(invited[0].conversation, ConversationRef::Channel(id));
    }

    #[test]
    fn test_invite_by_non_member_is_forbidden() {
        let (mut store, owner, alice, bob) = setup();
        let id = create(&mut store, alice, "general".into(), true, 1).unwrap();
        assert_eq!(status(invite(&mut store, bob, id, owner, 2).unwrap_err()), 403);
    }

    #[test]
    fn test_details_lists_profiles() {
        let (mut store, _, alice, bob) = setup();
        let id = create(&mut store, alice, "general".into(), true, 1).unwrap();
        join(&mut store, bob, id, 2).unwrap();

        let details = details(&store, bob, id).unwrap();
        assert_eq!(details.name, "general");
        assert_eq!(details.owner_members.len(), 1);
        assert_eq!(details.owner_members[0].handle_str, "alice");
        assert_eq!(details.all_members.len(), 2);
    }

    #[test]
    fn test_leave_drops_ownership() {
        let (mut store, _, alice, bob) = setup();
        let id = create(&mut store, alice, "general".into(), true, 1).unwrap();
        join(&mut store, bob, id, 2).unwrap();
        add_owner(&mut store, alice, id, bob).unwrap();

        leave(&mut store, alice, id, 3).unwrap();
        let channel = store.channel(id).unwrap();
        assert_eq!(channel.owner_members, vec![bob]);
        assert_eq!(channel.all_members, vec![bob]);
        assert_eq!(status(leave(&mut store, alice, id, 3).unwrap_err()), 403);
    }

    #[test]
    fn test_standup_starter_cannot_leave() {
        let (mut store, _, alice, _) = setup();
        let id = create(&mut store, alice, "general".into(), true, 1).unwrap();
        store.channel_mut(id).unwrap().standup = Some(Standup {
            starter_id: alice,
            time_finish: 100,
            lines: Vec::new(),
        });
        assert_eq!(status(leave(&mut store, alice, id, 2).unwrap_err()), 400);
    }

    #[test]
    fn test_owner_management_rules() {
        let (mut store, owner, alice, bob) = setup();
        let id = create(&mut store, alice, "general".into(), true, 1).unwrap();

        assert_eq!(status(add_owner(&mut store, alice, id, bob).unwrap_err()), 400);
        join(&mut store, bob, id, 2).unwrap();
        assert_eq!(status(add_owner(&mut store, bob, id, bob).unwrap_err()), 403);
        add_owner(&mut store, alice, id, bob).unwrap();
        assert_eq!(status(add_owner(&mut store, alice, id, bob).unwrap_err()), 400);

        remove_owner(&mut store, bob, id, alice).unwrap();
        assert_eq!(status(remove_owner(&mut store, bob, id, bob).unwrap_err()), 400);

        join(&mut store, owner, id, 3).unwrap();
        remove_owner(&mut store, owner, id, bob).unwrap_err();
        assert_eq!(store.channel(id).unwrap().owner_members, vec![bob]);
    }

    #[test]
    fn test_messages_require_membership() {
        let (mut store, _, alice, bob) = setup();
        let id = create(&mut store, alice, "general".into(), true, 1).unwrap();
        assert_eq!(status(messages(&store, bob, id, 0).unwrap_err()), 403);
        assert_eq!(status(messages(&store, alice, 99, 0).unwrap_err()), 400);
        assert_eq!(messages(&store, alice, id, 0).unwrap().end, -1);
    }
}
