/**
 * Message Operations
 *
 * Sending, editing, removing, sharing, reacting, pinning, scheduling and
 * searching messages. Every operation takes the caller's id and works on
 * the locked store.
 *
 * Checks run in a fixed order: unknown ids (400), then access (403), then
 * the remaining input rules (400).
 */

use crate::backend::error::BackendError;
use crate::backend::store::{ConversationRef, DataStore, NotificationKind, React, ScheduledMessage, THUMBS_UP};
use crate::shared::error::SharedError;
use crate::shared::messaging::MessageView;
use crate::shared::validation::{validate_message, validate_message_max, MAX_MESSAGE_LEN};

/// 400 if the channel or DM does not exist
pub fn require_conversation(store: &DataStore, conversation: ConversationRef) -> Result<(), BackendError> {
    match conversation {
        ConversationRef::Channel(id) => store.channel(id).map(|_| ()),
        ConversationRef::Dm(id) => store.dm(id).map(|_| ()),
    }
}

/// 403 if `u_id` is not a member
pub fn require_member(
    store: &DataStore,
    conversation: ConversationRef,
    u_id: u32,
) -> Result<(), BackendError> {
    if store.is_member(conversation, u_id) {
        return Ok(());
    }
    tracing::warn!("User {} is not a member of {:?}", u_id, conversation);
    Err(BackendError::access(match conversation {
        ConversationRef::Channel(_) => "You are not a member of this channel",
        ConversationRef::Dm(_) => "You are not a member of this DM",
    }))
}

/// Post a message now; tags in it notify members
pub fn send(
    store: &mut DataStore,
    u_id: u32,
    conversation: ConversationRef,
    text: String,
    now: i64,
) -> Result<u32, BackendError> {
    require_conversation(store, conversation)?;
    require_member(store, conversation, u_id)?;
    validate_message(&text)?;

    let message_id = store.allocate_message_id();
    store.post_message(conversation, message_id, u_id, text, now, true)?;
    tracing::info!("User {} sent message {} to {:?}", u_id, message_id, conversation);
    Ok(message_id)
}

/// Accept a message now for delivery at `time_sent`. The id is reserved immediately.
pub fn send_later(
    store: &mut DataStore,
    u_id: u32,
    conversation: ConversationRef,
    text: String,
    time_sent: i64,
    now: i64,
) -> Result<u32, BackendError> {
    require_conversation(store, conversation)?;
    require_member(store, conversation, u_id)?;
    validate_message(&text)?;
    if time_sent < now {
        return Err(BackendError::input("timeSent is a time in the past"));
    }

    let message_id = store.allocate_message_id();
    store.scheduled.push(ScheduledMessage {
        message_id,
        conversation,
        u_id,
        message: text,
        time_sent,
    });
    tracing::info!("User {} scheduled message {} for {}", u_id, message_id, time_sent);
    Ok(message_id)
}

/// Locate a message the caller may change: its sender or a conversation owner
fn editable_message(
    store: &DataStore,
    u_id: u32,
    message_id: u32,
) -> Result<(ConversationRef, usize), BackendError> {
    let (conversation, index) = store.accessible_message(message_id, u_id)?;
    let sender = store
        .messages(conversation)
        .and_then(|messages| messages.get(index))
        .map(|message| message.u_id);

    if sender != Some(u_id) && !store.has_owner_permissions(conversation, u_id) {
        tracing::warn!("User {} may not change message {}", u_id, message_id);
        return Err(BackendError::access(
            "You did not send this message and do not have owner permissions",
        ));
    }
    Ok((conversation, index))
}

/// Replace a message's text. Empty text removes the message.
pub fn edit(
    store: &mut DataStore,
    u_id: u32,
    message_id: u32,
    text: String,
    now: i64,
) -> Result<(), BackendError> {
    let (conversation, index) = editable_message(store, u_id, message_id)?;
    validate_message_max(&text)?;

    if text.is_empty() {
        return remove_at(store, conversation, index, now);
    }

    if let Some(message) = store.message_mut(conversation, index) {
        message.message = text.clone();
    }
    store.notify_tags(u_id, conversation, &text);
    tracing::info!("User {} edited message {}", u_id, message_id);
    Ok(())
}

pub fn remove(store: &mut DataStore, u_id: u32, message_id: u32, now: i64) -> Result<(), BackendError> {
    let (conversation, index) = editable_message(store, u_id, message_id)?;
    remove_at(store, conversation, index, now)?;
    tracing::info!("User {} removed message {}", u_id, message_id);
    Ok(())
}

fn remove_at(
    store: &mut DataStore,
    conversation: ConversationRef,
    index: usize,
    now: i64,
) -> Result<(), BackendError> {
    let messages = store
        .messages_mut(conversation)
        .ok_or_else(|| BackendError::state("conversation disappeared during removal"))?;
    messages.remove(index);
    store.sync_stats(now);
    Ok(())
}

/// Optional comment, a blank line, then the original quoted line by line
pub fn shared_text(comment: &str, original: &str) -> String {
    let quoted = original
        .lines()
        .map(|line| format!("> {}", line))
        .collect::<Vec<_>>()
        .join("\n");
    if comment.is_empty() {
        quoted
    } else {
        format!("{}\n\n{}", comment, quoted)
    }
}

/// Resolve the `(channelId, dmId)` pair where exactly one side is `-1`
pub fn share_target(channel_id: i64, dm_id: i64) -> Result<ConversationRef, BackendError> {
    let invalid = || BackendError::input("Exactly one of channelId and dmId must be -1");
    match (channel_id, dm_id) {
        (-1, -1) => Err(invalid()),
        (channel_id, -1) => u32::try_from(channel_id)
            .map(ConversationRef::Channel)
            .map_err(|_| BackendError::input("channelId does not refer to a valid channel")),
        (-1, dm_id) => u32::try_from(dm_id)
            .map(ConversationRef::Dm)
            .map_err(|_| BackendError::input("dmId does not refer to a valid DM")),
        _ => Err(invalid()),
    }
}

/// Post a copy of an accessible message, with an optional comment, into a channel or DM
pub fn share(
    store: &mut DataStore,
    u_id: u32,
    og_message_id: u32,
    comment: String,
    target: ConversationRef,
    now: i64,
) -> Result<u32, BackendError> {
    require_conversation(store, target)?;
    let (origin, index) = store.accessible_message(og_message_id, u_id)?;
    require_member(store, target, u_id)?;
    if comment.chars().count() > MAX_MESSAGE_LEN {
        return Err(SharedError::too_long("message", MAX_MESSAGE_LEN).into());
    }

    let original = store
        .messages(origin)
        .and_then(|messages| messages.get(index))
        .map(|message| message.message.clone())
        .unwrap_or_default();

    let message_id = store.allocate_message_id();
    store.post_message(target, message_id, u_id, shared_text(&comment, &original), now, false)?;
    if !comment.is_empty() {
        store.notify_tags(u_id, target, &comment);
    }
    tracing::info!("User {} shared message {} as {}", u_id, og_message_id, message_id);
    Ok(message_id)
}

fn require_react_id(react_id: u32) -> Result<(), BackendError> {
    if react_id != THUMBS_UP {
        return Err(BackendError::input("reactId is not a valid react ID"));
    }
    Ok(())
}

/// Add the caller's reaction and notify the sender if still a member
pub fn react(store: &mut DataStore, u_id: u32, message_id: u32, react_id: u32) -> Result<(), BackendError> {
    let (conversation, index) = store.accessible_message(message_id, u_id)?;
    require_react_id(react_id)?;

    let message = store
        .message_mut(conversation, index)
        .ok_or_else(|| BackendError::state("message disappeared during react"))?;
    if message.has_reacted(react_id, u_id) {
        return Err(BackendError::input("You have already reacted to this message"));
    }
    match message.reacts.iter_mut().find(|react| react.react_id == react_id) {
        Some(react) => react.u_ids.push(u_id),
        None => message.reacts.push(React {
            react_id,
            u_ids: vec![u_id],
        }),
    }
    let sender = message.u_id;

    if store.is_member(conversation, sender) {
        let name = store.conversation_name(conversation).unwrap_or_default().to_string();
        let text = format!("{} reacted to your message in {}", store.handle_of(u_id), name);
        store.notify(sender, NotificationKind::Reacted, conversation, text);
    }
    Ok(())
}

pub fn unreact(store: &mut DataStore, u_id: u32, message_id: u32, react_id: u32) -> Result<(), BackendError> {
    let (conversation, index) = store.accessible_message(message_id, u_id)?;
    require_react_id(react_id)?;

    let message = store
        .message_mut(conversation, index)
        .ok_or_else(|| BackendError::state("message disappeared during unreact"))?;
    if !message.has_reacted(react_id, u_id) {
        return Err(BackendError::input("You have not reacted to this message"));
    }
    for react in message.reacts.iter_mut().filter(|react| react.react_id == react_id) {
        react.u_ids.retain(|id| *id != u_id);
    }
    message.reacts.retain(|react| !react.u_ids.is_empty());
    Ok(())
}

/// Pin or unpin a message. Only conversation owners may.
pub fn set_pinned(
    store: &mut DataStore,
    u_id: u32,
    message_id: u32,
    pinned: bool,
) -> Result<(), BackendError> {
    let (conversation, index) = store.accessible_message(message_id, u_id)?;
    if !store.has_owner_permissions(conversation, u_id) {
        tracing::warn!("User {} may not pin in {:?}", u_id, conversation);
        return Err(BackendError::access("You do not have owner permissions"));
    }

    let message = store
        .message_mut(conversation, index)
        .ok_or_else(|| BackendError::state("message disappeared during pin"))?;
    if message.is_pinned == pinned {
        return Err(BackendError::input(if pinned {
            "Message is already pinned"
        } else {
            "Message is not pinned"
        }));
    }
    message.is_pinned = pinned;
    Ok(())
}

/// Case-insensitive substring search over the caller's channels and DMs, newest first
pub fn search(store: &DataStore, u_id: u32, query: &str) -> Result<Vec<MessageView>, BackendError> {
    let len = query.chars().count();
    if len < 1 || len > MAX_MESSAGE_LEN {
        return Err(SharedError::length("queryStr", 1, MAX_MESSAGE_LEN).into());
    }

    let needle = query.to_lowercase();
    let channel_messages = store
        .channels
        .iter()
        .filter(|channel| channel.all_members.contains(&u_id))
        .flat_map(|channel| channel.messages.iter());
    let dm_messages = store
        .dms
        .iter()
        .filter(|dm| dm.members.contains(&u_id))
        .flat_map(|dm| dm.messages.iter());

    let mut found: Vec<_> = channel_messages
        .chain(dm_messages)
        .filter(|message| message.message.to_lowercase().contains(&needle))
        .collect();
    found.sort_by(|a, b| {
        b.time_sent
            .cmp(&a.time_sent)
            .then(b.message_id.cmp(&a.message_id))
    });

    Ok(found.into_iter().map(|message| message.view(u_id)).collect())
}
