//! Notifications Module
//!
//! A user's feed is built on read. Tagged, invited and reacted events are
//! kept in separate logs; the feed merges them by sequence number, newest
//! first, and keeps the latest 20.

use axum::extract::State;
use axum::response::Json;

use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::store::{NotificationEvent, NotificationLog};
use crate::shared::messaging::{Notification, NotificationsResponse};

pub const FEED_LEN: usize = 20;

/// The latest `FEED_LEN` notifications, newest first
pub fn feed(log: &NotificationLog) -> Vec<Notification> {
    let mut events: Vec<&NotificationEvent> = log
        .tagged
        .iter()
        .chain(log.invited.iter())
        .chain(log.reacted.iter())
        .collect();
    events.sort_by(|a, b| b.seq.cmp(&a.seq));

    events
        .into_iter()
        .take(FEED_LEN)
        .map(|event| {
            let (channel_id, dm_id) = event.conversation.wire_ids();
            Notification {
                channel_id,
                dm_id,
                notification_message: event.message.clone(),
            }
        })
        .collect()
}

/// GET /notifications/get/v1
pub async fn get_notifications(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<NotificationsResponse>, BackendError> {
    let store = state.lock_store().await?;
    let notifications = feed(&store.user(user.u_id)?.notifications);
    Ok(Json(NotificationsResponse { notifications }))
}
