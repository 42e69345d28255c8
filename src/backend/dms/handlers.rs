/**
 * DM HTTP Handlers
 */

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::Json;

use crate::backend::dms::ops;
use crate::backend::error::BackendError;
use crate::backend::middleware::{extract_json, extract_query, AuthUser};
use crate::backend::server::state::AppState;
use crate::shared::messaging::{
    DmCreateRequest, DmCreateResponse, DmDetails, DmIdRequest, DmListResponse, DmMessagesQuery,
    DmQuery, EmptyResponse, MessagesPage,
};
use crate::shared::now_secs;

/// POST /dm/create/v2
pub async fn create_dm(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<DmCreateRequest>, JsonRejection>,
) -> Result<Json<DmCreateResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    let dm_id = ops::create(&mut store, user.u_id, request.u_ids, now_secs())?;
    state.commit(&store).await?;
    Ok(Json(DmCreateResponse { dm_id }))
}

/// GET /dm/list/v2
pub async fn list_dms(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<DmListResponse>, BackendError> {
    let store = state.store.read().await;
    Ok(Json(DmListResponse {
        dms: ops::list(&store, user.u_id),
    }))
}

/// DELETE /dm/remove/v2?dmId=
pub async fn remove_dm(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<DmQuery>, QueryRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let query = extract_query(query)?;
    let mut store = state.lock_store().await?;
    ops::remove(&mut store, user.u_id, query.dm_id, now_secs())?;
    state.commit(&store).await?;
    Ok(Json(EmptyResponse {}))
}

/// GET /dm/details/v2?dmId=
pub async fn dm_details(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<DmQuery>, QueryRejection>,
) -> Result<Json<DmDetails>, BackendError> {
    let query = extract_query(query)?;
    let store = state.store.read().await;
    Ok(Json(ops::details(&store, user.u_id, query.dm_id)?))
}

/// POST /dm/leave/v2
pub async fn leave_dm(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<DmIdRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    ops::leave(&mut store, user.u_id, request.dm_id, now_secs())?;
    state.commit(&store).await?;
    Ok(Json(EmptyResponse {}))
}

/// GET /dm/messages/v2?dmId=&start=
pub async fn dm_messages(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<DmMessagesQuery>, QueryRejection>,
) -> Result<Json<MessagesPage>, BackendError> {
    let query = extract_query(query)?;
    let store = state.lock_store().await?;
    Ok(Json(ops::messages(&store, user.u_id, query.dm_id, query.start)?))
}
