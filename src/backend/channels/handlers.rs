/**
 * Channel HTTP Handlers
 */

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::Json;

use crate::backend::channels::ops;
use crate::backend::error::BackendError;
use crate::backend::middleware::{extract_json, extract_query, AuthUser};
use crate::backend::server::state::AppState;
use crate::shared::messaging::{
    ChannelDetails, ChannelIdRequest, ChannelMemberRequest, ChannelMessagesQuery, ChannelQuery,
    ChannelsCreateRequest, ChannelsCreateResponse, ChannelsListResponse, EmptyResponse, MessagesPage,
};
use crate::shared::now_secs;

/// POST /channels/create/v3
pub async fn create_channel(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<ChannelsCreateRequest>, JsonRejection>,
) -> Result<Json<ChannelsCreateResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    let channel_id = ops::create(&mut store, user.u_id, request.name, request.is_public, now_secs())?;
    state.commit(&store).await?;
    Ok(Json(ChannelsCreateResponse { channel_id }))
}

/// GET /channels/list/v3
pub async fn list_channels(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ChannelsListResponse>, BackendError> {
    let store = state.store.read().await;
    Ok(Json(ChannelsListResponse {
        channels: ops::list(&store, user.u_id),
    }))
}

/// GET /channels/listall/v3
pub async fn list_all_channels(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<ChannelsListResponse>, BackendError> {
    let store = state.store.read().await;
    Ok(Json(ChannelsListResponse {
        channels: ops::list_all(&store),
    }))
}

/// GET /channel/details/v3?channelId=
pub async fn channel_details(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<ChannelQuery>, QueryRejection>,
) -> Result<Json<ChannelDetails>, BackendError> {
    let query = extract_query(query)?;
    let store = state.store.read().await;
    Ok(Json(ops::details(&store, user.u_id, query.channel_id)?))
}

/// POST /channel/join/v3
pub async fn join_channel(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<ChannelIdRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    ops::join(&mut store, user.u_id, request.channel_id, now_secs())?;
    state.commit(&store).await?;
    Ok(Json(EmptyResponse {}))
}

/// POST /channel/invite/v3
pub async fn invite_to_channel(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<ChannelMemberRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    ops::invite(&mut store, user.u_id, request.channel_id, request.u_id, now_secs())?;
    state.commit(&store).await?;
    Ok(Json(EmptyResponse {}))
}

/// GET /channel/messages/v3?channelId=&start=
pub async fn channel_messages(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<ChannelMessagesQuery>, QueryRejection>,
) -> Result<Json<MessagesPage>, BackendError> {
    let query = extract_query(query)?;
    let store = state.lock_store().await?;
    Ok(Json(ops::messages(&store, user.u_id, query.channel_id, query.start)?))
}

/// POST /channel/leave/v2
pub async fn leave_channel(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<ChannelIdRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    ops::leave(&mut store, user.u_id, request.channel_id, now_secs())?;
    state.commit(&store).await?;
    Ok(Json(EmptyResponse {}))
}

/// POST /channel/addowner/v2
pub async fn add_owner(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<ChannelMemberRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    ops::add_owner(&mut store, user.u_id, request.channel_id, request.u_id)?;
    state.commit(&store).await?;
    Ok(Json(EmptyResponse {}))
}

/// POST /channel/removeowner/v2
pub async fn remove_owner(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<ChannelMemberRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    ops::remove_owner(&mut store, user.u_id, request.channel_id, request.u_id)?;
    state.commit(&store).await?;
    Ok(Json(EmptyResponse {}))
}
