//! Admin Module
//!
//! Operations reserved for global owners. Caller access is checked before
//! anything else.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::backend::error::BackendError;
use crate::backend::middleware::{extract_json, extract_query, AuthUser};
use crate::backend::server::state::AppState;
use crate::backend::store::{DataStore, GlobalPermission, REMOVED_USER_TEXT};
use crate::shared::messaging::{EmptyResponse, UserQuery};
use crate::shared::now_secs;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionChangeRequest {
    pub u_id: u32,
    pub permission_id: u32,
}

fn require_global_owner(store: &DataStore, u_id: u32) -> Result<(), BackendError> {
    if store.is_global_owner(u_id) {
        return Ok(());
    }
    tracing::warn!("User {} attempted an admin operation", u_id);
    Err(BackendError::access("You are not a global owner"))
}

/// Remove a user from the workspace
///
/// The user leaves every channel and DM, their messages are replaced and
/// their name becomes "Removed user". Their id and profile stay readable.
pub fn remove_user(store: &mut DataStore, caller: u32, target: u32, now: i64) -> Result<(), BackendError> {
    require_global_owner(store, caller)?;
    let user = store.live_user(target)?;
    if user.is_global_owner() && store.global_owner_count() == 1 {
        return Err(BackendError::input("User is the only global owner"));
    }

    for channel in store.channels.iter_mut() {
        channel.all_members.retain(|id| *id != target);
        channel.owner_members.retain(|id| *id != target);
        for message in channel.messages.iter_mut().filter(|m| m.u_id == target) {
            message.message = REMOVED_USER_TEXT.to_string();
        }
    }
    for dm in store.dms.iter_mut() {
        dm.members.retain(|id| *id != target);
        for message in dm.messages.iter_mut().filter(|m| m.u_id == target) {
            message.message = REMOVED_USER_TEXT.to_string();
        }
    }
    store.scheduled.retain(|scheduled| scheduled.u_id != target);
    store.reset_codes.retain(|reset| reset.u_id != target);

    let user = store.user_mut(target)?;
    user.name_first = "Removed".to_string();
    user.name_last = "user".to_string();
    user.sessions.clear();
    user.removed = true;
    store.sync_stats(now);

    tracing::info!("User {} removed user {}", caller, target);
    Ok(())
}

pub fn change_permission(
    store: &mut DataStore,
    caller: u32,
    target: u32,
    permission_id: u32,
) -> Result<(), BackendError> {
    require_global_owner(store, caller)?;
    let user = store.live_user(target)?;
    let permission = GlobalPermission::from_id(permission_id)
        .ok_or_else(|| BackendError::input("permissionId is invalid"))?;
    if user.permission == permission {
        return Err(BackendError::input("User already has this permission"));
    }
    if user.is_global_owner() && store.global_owner_count() == 1 {
        return Err(BackendError::input("User is the only global owner"));
    }

    store.user_mut(target)?.permission = permission;
    tracing::info!("User {} set permission {} on user {}", caller, permission_id, target);
    Ok(())
}

/// DELETE /admin/user/remove/v1?uId=
pub async fn remove_user_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let query = extract_query(query)?;
    let mut store = state.lock_store().await?;
    remove_user(&mut store, user.u_id, query.u_id, now_secs())?;
    state.commit(&store).await?;
    Ok(Json(EmptyResponse {}))
}

/// POST /admin/userpermission/change/v1
pub async fn change_permission_handler(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<PermissionChangeRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    change_permission(&mut store, user.u_id, request.u_id, request.permission_id)?;
    state.commit(&store).await?;
    Ok(Json(EmptyResponse {}))
}

/// DELETE /clear/v1
///
/// Resets the workspace to empty. Not authenticated.
pub async fn clear(State(state): State<AppState>) -> Result<Json<EmptyResponse>, BackendError> {
    let mut store = state.store.write().await;
    *store = DataStore::new();
    state.commit(&store).await?;

    tracing::info!("Store cleared");
    Ok(Json(EmptyResponse {}))
}
