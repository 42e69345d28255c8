//! Timestamps are unix seconds throughout the API.

/// Current unix time in seconds
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}
