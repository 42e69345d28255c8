//! Standups Module
//!
//! A standup buffers short updates from channel members for a fixed
//! period. When it ends, the buffered lines are posted as one message from
//! the member who started it. Closing is done by the store's tick.

pub mod handlers;

use crate::backend::error::BackendError;
use crate::backend::messages::ops::require_member;
use crate::backend::store::{ConversationRef, DataStore, Standup};
use crate::shared::messaging::StandupActiveResponse;
use crate::shared::validation::validate_message_max;

/// Start a standup of `length` seconds; returns its finish time
pub fn start(
    store: &mut DataStore,
    u_id: u32,
    channel_id: u32,
    length: i64,
    now: i64,
) -> Result<i64, BackendError> {
    let channel = store.channel(channel_id)?;
    require_member(store, ConversationRef::Channel(channel_id), u_id)?;
    if length < 0 {
        return Err(BackendError::input("length cannot be negative"));
    }
    if channel.standup.is_some() {
        return Err(BackendError::input("A standup is already active in this channel"));
    }

    let time_finish = now
        .checked_add(length)
        .ok_or_else(|| BackendError::input("length is too large"))?;
    store.channel_mut(channel_id)?.standup = Some(Standup {
        starter_id: u_id,
        time_finish,
        lines: Vec::new(),
    });
    tracing::info!("User {} started a standup in channel {} until {}", u_id, channel_id, time_finish);
    Ok(time_finish)
}

pub fn active(store: &DataStore, u_id: u32, channel_id: u32) -> Result<StandupActiveResponse, BackendError> {
    let channel = store.channel(channel_id)?;
    require_member(store, ConversationRef::Channel(channel_id), u_id)?;
    let time_finish = channel.standup.as_ref().map(|standup| standup.time_finish);
    Ok(StandupActiveResponse {
        is_active: time_finish.is_some(),
        time_finish,
    })
}

/// Buffer `"{handle}: {message}"` in the active standup
pub fn send(store: &mut DataStore, u_id: u32, channel_id: u32, message: &str) -> Result<(), BackendError> {
    let channel = store.channel(channel_id)?;
    require_member(store, ConversationRef::Channel(channel_id), u_id)?;
    validate_message_max(message)?;
    if channel.standup.is_none() {
        return Err(BackendError::input("No standup is active in this channel"));
    }

    let line = format!("{}: {}", store.handle_of(u_id), message);
    if let Some(standup) = store.channel_mut(channel_id)?.standup.as_mut() {
        standup.lines.push(line);
    }
    Ok(())
}
