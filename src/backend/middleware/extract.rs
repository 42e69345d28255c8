//! Request Body and Query Extraction
//!
//! Handlers take `Result<Json<T>, JsonRejection>` (or the `Query`
//! equivalent) and unwrap it with these helpers, so malformed input is
//! reported as a 400 in the usual error body instead of axum's plain-text
//! rejection.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;

use crate::backend::error::{rejection_to_error, BackendError};

/// Extract a JSON body, mapping deserialization errors to an input error
///
/// ```ignore
/// async fn handler(body: Result<Json<T>, JsonRejection>) -> Result<..., BackendError> {
///     let request = extract_json(body)?;
/// }
/// ```
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, BackendError> {
    result.map(|Json(value)| value).map_err(|rejection| {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        rejection_to_error(rejection.status(), rejection.body_text())
    })
}

/// Extract query parameters, mapping parse errors to an input error
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, BackendError> {
    result.map(|Query(value)| value).map_err(|rejection| {
        tracing::warn!("Rejected query string: {}", rejection.body_text());
        rejection_to_error(rejection.status(), rejection.body_text())
    })
}
