/**
 * Direct Message Operations
 *
 * A DM is created with a fixed member list and named after its members'
 * handles. Members may leave; the name does not change. Only the creator,
 * while still a member, may remove the DM.
 */

use std::collections::HashSet;

use crate::backend::channels::ops::profiles;
use crate::backend::error::BackendError;
use crate::backend::messages::ops::require_member;
use crate::backend::messages::page;
use crate::backend::store::{ConversationRef, DataStore, Dm, NotificationKind};
use crate::shared::messaging::{DmDetails, DmSummary, MessagesPage};

/// Member handles sorted and joined with `", "`
pub fn dm_name(store: &DataStore, members: &[u32]) -> String {
    let mut handles: Vec<String> = members.iter().map(|id| store.handle_of(*id)).collect();
    handles.sort();
    handles.join(", ")
}

/// Create a DM between the caller and `u_ids`
pub fn create(store: &mut DataStore, u_id: u32, u_ids: Vec<u32>, now: i64) -> Result<u32, BackendError> {
    for id in &u_ids {
        store.live_user(*id)?;
    }
    let mut members = vec![u_id];
    members.extend(u_ids.iter().copied());
    let unique: HashSet<u32> = members.iter().copied().collect();
    if unique.len() != members.len() {
        return Err(BackendError::input("uIds contains duplicate users"));
    }

    let name = dm_name(store, &members);
    let dm_id = store.allocate_dm_id();
    store.dms.push(Dm {
        dm_id,
        name: name.clone(),
        creator_id: u_id,
        members,
        messages: Vec::new(),
    });

    let text = format!("{} added you to {}", store.handle_of(u_id), name);
    for invitee in u_ids {
        store.notify(invitee, NotificationKind::Invited, ConversationRef::Dm(dm_id), text.clone());
    }
    store.sync_stats(now);

    tracing::info!("User {} created DM {}", u_id, dm_id);
    Ok(dm_id)
}

pub fn list(store: &DataStore, u_id: u32) -> Vec<DmSummary> {
    store
        .dms
        .iter()
        .filter(|dm| dm.members.contains(&u_id))
        .map(|dm| DmSummary {
            dm_id: dm.dm_id,
            name: dm.name.clone(),
        })
        .collect()
}

/// Delete a DM and its messages
pub fn remove(store: &mut DataStore, u_id: u32, dm_id: u32, now: i64) -> Result<(), BackendError> {
    let dm = store.dm(dm_id)?;
    if dm.creator_id != u_id || !dm.members.contains(&u_id) {
        tracing::warn!("User {} may not remove DM {}", u_id, dm_id);
        return Err(BackendError::access("Only the DM creator may remove it"));
    }

    store.dms.retain(|dm| dm.dm_id != dm_id);
    store.sync_stats(now);
    tracing::info!("User {} removed DM {}", u_id, dm_id);
    Ok(())
}

pub fn details(store: &DataStore, u_id: u32, dm_id: u32) -> Result<DmDetails, BackendError> {
    let dm = store.dm(dm_id)?;
    require_member(store, ConversationRef::Dm(dm_id), u_id)?;
    Ok(DmDetails {
        name: dm.name.clone(),
        members: profiles(store, &dm.members),
    })
}

pub fn leave(store: &mut DataStore, u_id: u32, dm_id: u32, now: i64) -> Result<(), BackendError> {
    store.dm(dm_id)?;
    require_member(store, ConversationRef::Dm(dm_id), u_id)?;

    store.dm_mut(dm_id)?.members.retain(|id| *id != u_id);
    store.sync_stats(now);
    tracing::info!("User {} left DM {}", u_id, dm_id);
    Ok(())
}

pub fn messages(store: &DataStore, u_id: u32, dm_id: u32, start: usize) -> Result<MessagesPage, BackendError> {
    let dm = store.dm(dm_id)?;
    require_member(store, ConversationRef::Dm(dm_id), u_id)?;
    page(&dm.messages, start, u_id)
}
