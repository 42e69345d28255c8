/**
 * Error Conversion
 *
 * Every `BackendError` becomes a JSON response so handlers can return it
 * directly.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "channelId does not refer to a valid channel",
 *   "status": 400
 * }
 * ```
 *
 * Server-side failures (5xx) are logged here, once, with their full
 * message. Client errors are logged by the handlers that raise them.
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!("Request failed with {}: {}", status, message);
        }

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

/// Reject JSON bodies and query strings that do not parse with a 400
pub fn rejection_to_error(status: StatusCode, body_text: String) -> BackendError {
    if status.is_client_error() {
        BackendError::input(body_text)
    } else {
        BackendError::handler(status, body_text)
    }
}
