/**
 * User HTTP Handlers
 */

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::Json;

use crate::backend::error::BackendError;
use crate::backend::middleware::{extract_json, extract_query, AuthUser};
use crate::backend::server::state::AppState;
use crate::backend::users::{ops, photo};
use crate::shared::messaging::{
    EmptyResponse, SetEmailRequest, SetHandleRequest, SetNameRequest, UploadPhotoRequest,
    UserProfileResponse, UserQuery, UsersAllResponse,
};

/// GET /users/all/v2
pub async fn all_users(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<UsersAllResponse>, BackendError> {
    let store = state.store.read().await;
    Ok(Json(UsersAllResponse {
        users: ops::all(&store),
    }))
}

/// GET /user/profile/v3?uId=
pub async fn user_profile(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<UserProfileResponse>, BackendError> {
    let query = extract_query(query)?;
    let store = state.store.read().await;
    Ok(Json(UserProfileResponse {
        user: ops::profile(&store, query.u_id)?,
    }))
}

/// PUT /user/profile/setname/v2
pub async fn set_name(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<SetNameRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    ops::set_name(&mut store, user.u_id, request.name_first, request.name_last)?;
    state.commit(&store).await?;
    Ok(Json(EmptyResponse {}))
}

/// PUT /user/profile/setemail/v2
pub async fn set_email(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<SetEmailRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    ops::set_email(&mut store, user.u_id, request.email)?;
    state.commit(&store).await?;
    Ok(Json(EmptyResponse {}))
}

/// PUT /user/profile/sethandle/v2
pub async fn set_handle(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<SetHandleRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let request = extract_json(body)?;
    let mut store = state.lock_store().await?;
    ops::set_handle(&mut store, user.u_id, request.handle_str)?;
    state.commit(&store).await?;
    Ok(Json(EmptyResponse {}))
}

/// POST /user/profile/uploadphoto/v1
///
/// The download and crop happen before the store is locked.
pub async fn upload_photo(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    body: Result<Json<UploadPhotoRequest>, JsonRejection>,
) -> Result<Json<EmptyResponse>, BackendError> {
    let request = extract_json(body)?;
    let file = photo::store_photo(&state.http, state.config.image_dir.clone(), user.u_id, request).await?;
    let url = photo::image_url(&state.config, &file);

    let mut store = state.lock_store().await?;
    let previous = std::mem::replace(&mut store.user_mut(user.u_id)?.profile_img_url, url);
    state.commit(&store).await?;
    drop(store);
    photo::discard_photo(&state.config, &previous).await;

    tracing::info!("User {} uploaded a profile photo", user.u_id);
    Ok(Json(EmptyResponse {}))
}
