/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct is the central state container. It holds:
 * - The data store behind one `RwLock`
 * - The loaded configuration
 * - The mailer used for password reset codes
 * - The persistence handle that mirrors the store to disk
 * - An HTTP client for profile photo downloads
 *
 * # Thread Safety
 *
 * Everything is cheap to clone and shared through `Arc`. The store is the
 * only mutable part and is only touched through its lock.
 *
 * # Example
 *
 * ```rust,ignore
 * use beans::backend::server::state::AppState;
 * use axum::extract::State;
 *
 * async fn handler(State(state): State<AppState>) {
 *     let store = state.lock_store().await?;
 *     // ...
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;
use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::backend::error::BackendError;
use crate::backend::mail::Mailer;
use crate::backend::store::{DataStore, Persistence};
use crate::shared::{now_secs, AppConfig};

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Users, channels, DMs and messages
    pub store: Arc<RwLock<DataStore>>,

    /// Loaded configuration
    pub config: Arc<AppConfig>,

    /// Delivery of password reset codes
    pub mailer: Mailer,

    /// Where the store is mirrored; in-memory when `data_path` is unset
    pub persistence: Persistence,

    /// Client for downloading profile photos
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(store: DataStore, config: AppConfig, mailer: Mailer, persistence: Persistence) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            config: Arc::new(config),
            mailer,
            persistence,
            http: reqwest::Client::new(),
        }
    }

    /// Take the write lock with time-dependent state brought up to date
    ///
    /// Due scheduled messages are delivered and expired standups closed
    /// before the guard is handed out, so handlers never see stale state.
    pub async fn lock_store(&self) -> Result<RwLockWriteGuard<'_, DataStore>, BackendError> {
        let mut store = self.store.write().await;
        if store.tick(now_secs()) {
            self.persistence.save(&store).await?;
        }
        Ok(store)
    }

    /// Persist the store after a mutation
    pub async fn commit(&self, store: &DataStore) -> Result<(), BackendError> {
        self.persistence.save(store).await
    }

    /// One scheduler pass, used by the background ticker
    pub async fn run_tick(&self) -> Result<bool, BackendError> {
        let mut store = self.store.write().await;
        let changed = store.tick(now_secs());
        if changed {
            self.persistence.save(&store).await?;
        }
        Ok(changed)
    }
}

/// Implement FromRef for the store
///
/// Lets handlers that never need time-dependent state take
/// `State<Arc<RwLock<DataStore>>>` directly.
impl FromRef<AppState> for Arc<RwLock<DataStore>> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for Arc<AppConfig> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.config.clone()
    }
}

impl FromRef<AppState> for Mailer {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.mailer.clone()
    }
}
