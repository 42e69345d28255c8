/**
 * API Route Handlers
 *
 * This module maps every versioned endpoint to its handler. Paths keep
 * their version suffix so existing clients keep working.
 *
 * # Routes
 *
 * ## Authentication (no token)
 * - `POST /auth/register/v3`, `POST /auth/login/v3`
 * - `POST /auth/passwordreset/request/v1`, `POST /auth/passwordreset/reset/v1`
 *
 * ## Everything else
 * Requires the `token` header, checked by the `AuthUser` extractor inside
 * each handler. `DELETE /clear/v1` is the one unauthenticated exception.
 */

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::backend::admin::{change_permission_handler, clear, remove_user_handler};
use crate::backend::auth::{login, logout, register, request_reset, reset};
use crate::backend::channels::handlers as channels;
use crate::backend::dms::handlers as dms;
use crate::backend::messages::handlers as messages;
use crate::backend::notifications::get_notifications;
use crate::backend::server::state::AppState;
use crate::backend::standups::handlers as standups;
use crate::backend::stats::{get_user_stats, get_workspace_stats};
use crate::backend::users::handlers as users;

/// Configure API routes
///
/// # Arguments
///
/// * `router` - The router to add routes to
///
/// # Returns
///
/// Router with every API route configured
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    let router = auth_routes(router);
    let router = channel_routes(router);
    let router = dm_routes(router);
    let router = message_routes(router);
    let router = user_routes(router);
    let router = standup_routes(router);
    admin_routes(router)
}

fn auth_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/auth/register/v3", post(register))
        .route("/auth/login/v3", post(login))
        .route("/auth/logout/v2", post(logout))
        .route("/auth/passwordreset/request/v1", post(request_reset))
        .route("/auth/passwordreset/reset/v1", post(reset))
}

fn channel_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/channels/create/v3", post(channels::create_channel))
        .route("/channels/list/v3", get(channels::list_channels))
        .route("/channels/listall/v3", get(channels::list_all_channels))
        .route("/channel/details/v3", get(channels::channel_details))
        .route("/channel/join/v3", post(channels::join_channel))
        .route("/channel/invite/v3", post(channels::invite_to_channel))
        .route("/channel/messages/v3", get(channels::channel_messages))
        .route("/channel/leave/v2", post(channels::leave_channel))
        .route("/channel/addowner/v2", post(channels::add_owner))
        .route("/channel/removeowner/v2", post(channels::remove_owner))
}

fn dm_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/dm/create/v2", post(dms::create_dm))
        .route("/dm/list/v2", get(dms::list_dms))
        .route("/dm/remove/v2", delete(dms::remove_dm))
        .route("/dm/details/v2", get(dms::dm_details))
        .route("/dm/leave/v2", post(dms::leave_dm))
        .route("/dm/messages/v2", get(dms::dm_messages))
}

fn message_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/message/send/v2", post(messages::send_message))
        .route("/message/edit/v2", put(messages::edit_message))
        .route("/message/remove/v2", delete(messages::remove_message))
        .route("/message/senddm/v2", post(messages::send_dm))
        .route("/message/share/v1", post(messages::share_message))
        .route("/message/react/v1", post(messages::react))
        .route("/message/unreact/v1", post(messages::unreact))
        .route("/message/pin/v1", post(messages::pin))
        .route("/message/unpin/v1", post(messages::unpin))
        .route("/message/sendlater/v1", post(messages::send_later))
        .route("/message/sendlaterdm/v1", post(messages::send_later_dm))
        .route("/search/v1", get(messages::search))
        .route("/notifications/get/v1", get(get_notifications))
}

fn user_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/users/all/v2", get(users::all_users))
        .route("/user/profile/v3", get(users::user_profile))
        .route("/user/profile/setname/v2", put(users::set_name))
        .route("/user/profile/setemail/v2", put(users::set_email))
        .route("/user/profile/sethandle/v2", put(users::set_handle))
        .route("/user/profile/uploadphoto/v1", post(users::upload_photo))
        .route("/user/stats/v1", get(get_user_stats))
        .route("/users/stats/v1", get(get_workspace_stats))
}

fn standup_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/standup/start/v1", post(standups::start_standup))
        .route("/standup/active/v1", get(standups::standup_active))
        .route("/standup/send/v1", post(standups::standup_send))
}

fn admin_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/admin/user/remove/v1", delete(remove_user_handler))
        .route("/admin/userpermission/change/v1", post(change_permission_handler))
        .route("/clear/v1", delete(clear))
}
