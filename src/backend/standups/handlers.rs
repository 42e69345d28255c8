/**
 * Standup HTTP Handlers
 */

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::Json;

use crate::backend::error::BackendError;
use crate::backend::middleware::{extract_json, extract_query, AuthUser};
use crate::backend::server::state::AppState;
use crate::backend::standups;
use crate::shared::messaging::{
    ChannelQuery, EmptyResponse, StandupActiveResponse, StandupSendRequest, StandupStartRequest,
    StandupStartResponse,
};
use crate::shared::now_secs;

/// POST /standup/start/v1
pub async fn start_standup(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<StandupStartRequest>, JsonRejection>,
) -> Result<Json<StandupStartResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    let time_finish = standups::start(&mut store, user.u_id, request.channel_id, request.length, now_secs())?;
    state.commit(&store).await?;
    Ok(Json(StandupStartResponse { time_finish }))
}

/// GET /standup/active/v1?channelId=
pub async fn standup_active(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<ChannelQuery>, QueryRejection>,
) -> Result<Json<StandupActiveResponse>, BackendError> {
    let query = extract_query(query)?;
    let store = state.lock_store().await?;
    Ok(Json(standups::active(&store, user.u_id, query.channel_id)?))
}

/// POST /standup/send/v1
pub async fn standup_send(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<StandupSendRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    standups::send(&mut store, user.u_id, request.channel_id, &request.message)?;
    state.commit(&store).await?;
    Ok(Json(EmptyResponse {}))
}
