//! Statistics Module
//!
//! Involvement of one user and utilization of the whole workspace. The
//! series themselves are recorded by the store as state changes; this
//! module only renders them and computes the rates.

use axum::extract::State;
use axum::response::Json;

use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::store::{DataStore, StatSeries};
use crate::shared::messaging::{
    ChannelsExistPoint, ChannelsJoinedPoint, DmsExistPoint, DmsJoinedPoint, MessagesExistPoint,
    MessagesSentPoint, UserStats, UserStatsResponse, WorkspaceStats, WorkspaceStatsResponse,
};

fn points<T>(series: Option<&StatSeries>, point: impl Fn(u32, i64) -> T) -> Vec<T> {
    series
        .map(|series| {
            series
                .points()
                .iter()
                .map(|p| point(p.value, p.time_stamp))
                .collect()
        })
        .unwrap_or_default()
}

fn ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    (f64::from(numerator) / f64::from(denominator)).min(1.0)
}

pub fn user_stats(store: &DataStore, u_id: u32) -> Result<UserStats, BackendError> {
    let involvement = &store.user(u_id)?.involvement;

    let involved = involvement.channels_joined.current()
        + involvement.dms_joined.current()
        + involvement.messages_sent.current();
    let existing = store
        .workspace
        .as_ref()
        .map(|w| w.channels_exist.current() + w.dms_exist.current() + w.messages_exist.current())
        .unwrap_or(0);

    Ok(UserStats {
        channels_joined: points(Some(&involvement.channels_joined), |num_channels_joined, time_stamp| {
            ChannelsJoinedPoint { num_channels_joined, time_stamp }
        }),
        dms_joined: points(Some(&involvement.dms_joined), |num_dms_joined, time_stamp| {
            DmsJoinedPoint { num_dms_joined, time_stamp }
        }),
        messages_sent: points(Some(&involvement.messages_sent), |num_messages_sent, time_stamp| {
            MessagesSentPoint { num_messages_sent, time_stamp }
        }),
        involvement_rate: ratio(involved, existing),
    })
}

pub fn workspace_stats(store: &DataStore) -> WorkspaceStats {
    let workspace = store.workspace.as_ref();

    let live_users = store.live_users().count() as u32;
    let involved_users = store
        .live_users()
        .filter(|user| {
            store.channels.iter().any(|c| c.all_members.contains(&user.u_id))
                || store.dms.iter().any(|d| d.members.contains(&user.u_id))
        })
        .count() as u32;

    WorkspaceStats {
        channels_exist: points(workspace.map(|w| &w.channels_exist), |num_channels_exist, time_stamp| {
            ChannelsExistPoint { num_channels_exist, time_stamp }
        }),
        dms_exist: points(workspace.map(|w| &w.dms_exist), |num_dms_exist, time_stamp| {
            DmsExistPoint { num_dms_exist, time_stamp }
        }),
        messages_exist: points(workspace.map(|w| &w.messages_exist), |num_messages_exist, time_stamp| {
            MessagesExistPoint { num_messages_exist, time_stamp }
        }),
        utilization_rate: ratio(involved_users, live_users),
    }
}

/// GET /user/stats/v1
pub async fn get_user_stats(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserStatsResponse>, BackendError> {
    let store = state.lock_store().await?;
    Ok(Json(UserStatsResponse {
        user_stats: user_stats(&store, user.u_id)?,
    }))
}

/// GET /users/stats/v1
pub async fn get_workspace_stats(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
) -> Result<Json<WorkspaceStatsResponse>, BackendError> {
    let store = state.lock_store().await?;
    Ok(Json(WorkspaceStatsResponse {
        workspace_stats: workspace_stats(&store),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::store::test_support::{add_channel, add_user};
    use crate::backend::store::{ConversationRef, GlobalPermission};

    #[test]
    fn test_rates_on_empty_workspace() {
        let mut store = DataStore::new();
        let alice = add_user(&mut store, "alice", GlobalPermission::Owner);
        assert_eq!(user_stats(&store, alice).unwrap().involvement_rate, 0.0);
        assert_eq!(workspace_stats(&store).utilization_rate, 0.0);
    }

    #[test]
    fn test_involvement_and_utilization() {
        let mut store = DataStore::new();
        let alice = add_user(&mut store, "alice", GlobalPermission::Owner);
        let bob = add_user(&mut store, "bob", GlobalPermission::Member);
        let channel = add_channel(&mut store, "general", &[alice]);
        let message_id = store.allocate_message_id();
        store
            .post_message(ConversationRef::Channel(channel), message_id, alice, "hi".into(), 5, false)
            .unwrap();

        let alice_stats = user_stats(&store, alice).unwrap();
        assert_eq!(alice_stats.involvement_rate, 1.0);
        assert_eq!(alice_stats.messages_sent.last().unwrap().num_messages_sent, 1);
        assert_eq!(user_stats(&store, bob).unwrap().involvement_rate, 0.0);

        let workspace = workspace_stats(&store);
        assert_eq!(workspace.utilization_rate, 0.5);
        assert_eq!(workspace.messages_exist.last().unwrap().num_messages_exist, 1);
    }

    #[test]
    fn test_involvement_is_capped() {
        assert_eq!(ratio(5, 2), 1.0);
        assert_eq!(ratio(1, 4), 0.25);
    }
}
