/**
 * Message HTTP Handlers
 *
 * Thin wrappers around `messages::ops`: extract the caller and request,
 * run the operation under the store lock and persist the result.
 */

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::Json;

use crate::backend::error::BackendError;
use crate::backend::messages::ops;
use crate::backend::middleware::{extract_json, extract_query, AuthUser};
use crate::backend::server::state::AppState;
use crate::backend::store::ConversationRef;
use crate::shared::messaging::{
    EditMessageRequest, EmptyResponse, MessageIdRequest, MessageQuery, ReactRequest, SearchQuery,
    SearchResponse, SendDmRequest, SendLaterDmRequest, SendLaterRequest, SendMessageRequest,
    SendMessageResponse, ShareMessageRequest, ShareMessageResponse,
};
use crate::shared::now_secs;

/// POST /message/send/v2
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<SendMessageResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    let message_id = ops::send(
        &mut store,
        user.u_id,
        ConversationRef::Channel(request.channel_id),
        request.message,
        now_secs(),
    )?;
    state.commit(&store).await?;
    Ok(Json(SendMessageResponse { message_id }))
}

/// POST /message/senddm/v2
pub async fn send_dm(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<SendDmRequest>, JsonRejection>,
) -> Result<Json<SendMessageResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    let message_id = ops::send(
        &mut store,
        user.u_id,
        ConversationRef::Dm(request.dm_id),
        request.message,
        now_secs(),
    )?;
    state.commit(&store).await?;
    Ok(Json(SendMessageResponse { message_id }))
}

/// PUT /message/edit/v2
pub async fn edit_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<EditMessageRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    ops::edit(&mut store, user.u_id, request.message_id, request.message, now_secs())?;
    state.commit(&store).await?;
    Ok(Json(EmptyResponse {}))
}

/// DELETE /message/remove/v2?messageId=
pub async fn remove_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<MessageQuery>, QueryRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let query = extract_query(query)?;
    let mut store = state.lock_store().await?;
    ops::remove(&mut store, user.u_id, query.message_id, now_secs())?;
    state.commit(&store).await?;
    Ok(Json(EmptyResponse {}))
}

/// POST /message/share/v1
pub async fn share_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<ShareMessageRequest>, JsonRejection>,
) -> Result<Json<ShareMessageResponse>, BackendError> {
    let request = extract_json(body)?;
    let target = ops::share_target(request.channel_id, request.dm_id)?;

    let mut store = state.lock_store().await?;
    let shared_message_id = ops::share(
        &mut store,
        user.u_id,
        request.og_message_id,
        request.message,
        target,
        now_secs(),
    )?;
    state.commit(&store).await?;
    Ok(Json(ShareMessageResponse { shared_message_id }))
}

/// POST /message/react/v1
pub async fn react(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<ReactRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    ops::react(&mut store, user.u_id, request.message_id, request.react_id)?;
    state.commit(&store).await?;
    Ok(Json(EmptyResponse {}))
}

/// POST /message/unreact/v1
pub async fn unreact(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<ReactRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    ops::unreact(&mut store, user.u_id, request.message_id, request.react_id)?;
    state.commit(&store).await?;
    Ok(Json(EmptyResponse {}))
}

/// POST /message/pin/v1
pub async fn pin(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<MessageIdRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    ops::set_pinned(&mut store, user.u_id, request.message_id, true)?;
    state.commit(&store).await?;
    Ok(Json(EmptyResponse {}))
}

/// POST /message/unpin/v1
pub async fn unpin(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<MessageIdRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    ops::set_pinned(&mut store, user.u_id, request.message_id, false)?;
    state.commit(&store).await?;
    Ok(Json(EmptyResponse {}))
}

/// POST /message/sendlater/v1
pub async fn send_later(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<SendLaterRequest>, JsonRejection>,
) -> Result<Json<SendMessageResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    let message_id = ops::send_later(
        &mut store,
        user.u_id,
        ConversationRef::Channel(request.channel_id),
        request.message,
        request.time_sent,
        now_secs(),
    )?;
    state.commit(&store).await?;
    Ok(Json(SendMessageResponse { message_id }))
}

/// POST /message/sendlaterdm/v1
pub async fn send_later_dm(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<SendLaterDmRequest>, JsonRejection>,
) -> Result<Json<SendMessageResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    let message_id = ops::send_later(
        &mut store,
        user.u_id,
        ConversationRef::Dm(request.dm_id),
        request.message,
        request.time_sent,
        now_secs(),
    )?;
    state.commit(&store).await?;
    Ok(Json(SendMessageResponse { message_id }))
}

/// GET /search/v1?queryStr=
pub async fn search(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<SearchResponse>, BackendError> {
    let query = extract_query(query)?;
    let store = state.lock_store().await?;
    let messages = ops::search(&store, user.u_id, &query.query_str)?;
    Ok(Json(SearchResponse { messages }))
}
