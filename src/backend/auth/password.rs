//! bcrypt hashing on the blocking pool
//!
//! Hashing at production cost takes long enough to stall a runtime worker,
//! so both directions run through `spawn_blocking`.

use crate::backend::error::BackendError;

pub async fn hash_password(password: String, cost: u32) -> Result<String, BackendError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| BackendError::state(format!("Hashing task failed: {}", e)))?
        .map_err(|e| {
            tracing::error!("Password hashing error: {:?}", e);
            BackendError::state("Failed to hash password")
        })
}

pub async fn verify_password(password: String, hash: String) -> Result<bool, BackendError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| BackendError::state(format!("Verification task failed: {}", e)))?
        .map_err(|e| {
            tracing::error!("Password verification error: {:?}", e);
            BackendError::state("Failed to verify password")
        })
}
