/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. API routes (auth, channels, DMs, messages, users, standups, admin)
 * 2. Profile images under `/imgurl`
 * 3. Fallback handler (JSON 404)
 *
 * Request tracing and CORS wrap every route.
 */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state holding the store and services
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
///
/// ## Static Files
///
/// Profile photos are served from `image_dir` under `/imgurl`.
///
/// ## Fallback
///
/// Unknown routes answer 404 with the usual error body.
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = configure_api_routes(Router::new());

    let router = router.nest_service("/imgurl", ServeDir::new(&app_state.config.image_dir));

    let router = router.fallback(not_found);

    let router = router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    router.with_state(app_state)
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Not found",
            "status": 404,
        })),
    )
}
