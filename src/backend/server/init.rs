/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including state creation, store loading, and route configuration.
 *
 * # Initialization Process
 *
 * 1. Load the store from the data file (an absent file is an empty store)
 * 2. Make sure the image directory and the default photo exist
 * 3. Build the mailer from the SMTP settings
 * 4. Start the scheduler task
 * 5. Create the router
 */

use std::time::Duration;

use axum::Router;

use crate::backend::error::BackendError;
use crate::backend::mail::Mailer;
use crate::backend::routes::router::create_router;
use crate::backend::server::state::AppState;
use crate::backend::store::Persistence;
use crate::backend::users::photo::ensure_default_image;
use crate::shared::AppConfig;

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails when the data file exists but cannot be parsed, when the image
/// directory cannot be created, or when the SMTP settings are invalid.
pub async fn create_app(config: AppConfig) -> Result<Router<()>, BackendError> {
    tracing::info!("Initializing Beans backend server");

    let mailer = Mailer::from_config(config.smtp.as_ref())?;
    let state = build_state(config, mailer).await?;
    spawn_scheduler(state.clone());

    let app = create_router(state);
    tracing::info!("Router configured");
    Ok(app)
}

/// Load the store and assemble the shared state
///
/// Split out from `create_app` so callers can supply their own mailer.
pub async fn build_state(config: AppConfig, mailer: Mailer) -> Result<AppState, BackendError> {
    let persistence = Persistence::new(config.data_path.clone());
    let store = persistence.load().await?;
    ensure_default_image(&config.image_dir).await?;

    match persistence.path() {
        Some(path) => tracing::info!("Store mirrored to {}", path.display()),
        None => tracing::warn!("No data path configured. State will not survive a restart."),
    }

    Ok(AppState::new(store, config, mailer, persistence))
}

/// Deliver scheduled messages and close standups in the background
///
/// Handlers also catch up on their own when they take the store lock; the
/// task keeps delivery timely when no requests arrive.
pub fn spawn_scheduler(state: AppState) -> tokio::task::JoinHandle<()> {
    let period = Duration::from_millis(state.config.tick_interval_ms);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            match state.run_tick().await {
                Ok(true) => tracing::debug!("Scheduler delivered pending work"),
                Ok(false) => {}
                Err(e) => tracing::error!("Scheduler tick failed: {}", e),
            }
        }
    })
}
