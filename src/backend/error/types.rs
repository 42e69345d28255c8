/**
 * Backend Error Types
 *
 * This module defines the error type returned by every handler and every
 * store operation. Each variant maps to one HTTP status code.
 *
 * # Error Categories
 *
 * ## Input Errors (400)
 *
 * The request names something that does not exist, breaks a length or
 * format rule, or asks for a state change that is already in effect.
 *
 * ## Access Errors (403)
 *
 * The token is missing, expired or revoked, or the caller is not allowed to
 * act on the channel, DM or message.
 *
 * ## State and Storage Errors (500)
 *
 * The store could not be read or written, or a background task failed.
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::shared::SharedError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use beans::backend::error::BackendError;
///
/// let err = BackendError::input("channelId does not refer to a valid channel");
/// let err = BackendError::access("User is not a member of the channel");
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request is well-formed but its content is invalid
    #[error("Input error: {message}")]
    InputError {
        /// Human-readable error message
        message: String,
    },

    /// The caller is not authenticated or not permitted
    #[error("Access error: {message}")]
    AccessError {
        /// Human-readable error message
        message: String,
    },

    /// Handler error with an explicit status code
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// State management error (e.g. a background task panicked)
    #[error("State error: {message}")]
    StateError {
        /// Human-readable error message
        message: String,
    },

    /// The JSON data file could not be read or written
    #[error("Storage error: {message}")]
    StorageError {
        /// Human-readable error message
        message: String,
    },

    /// Shared error (from shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new input error (400)
    pub fn input(message: impl Into<String>) -> Self {
        Self::InputError {
            message: message.into(),
        }
    }

    /// Create a new access error (403)
    pub fn access(message: impl Into<String>) -> Self {
        Self::AccessError {
            message: message.into(),
        }
    }

    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Create a new state error
    pub fn state(message: impl Into<String>) -> Self {
        Self::StateError {
            message: message.into(),
        }
    }

    /// Create a new storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageError {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `InputError` - 400 Bad Request
    /// - `AccessError` - 403 Forbidden
    /// - `HandlerError` - Uses the status code from the error
    /// - `StateError`, `StorageError` - 500 Internal Server Error
    /// - `SharedError` - 400 Bad Request
    /// - `SerializationError` - 500 Internal Server Error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InputError { .. } => StatusCode::BAD_REQUEST,
            Self::AccessError { .. } => StatusCode::FORBIDDEN,
            Self::HandlerError { status, .. } => *status,
            Self::StateError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::StorageError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(_) => StatusCode::BAD_REQUEST,
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::InputError { message } => message.clone(),
            Self::AccessError { message } => message.clone(),
            Self::HandlerError { message, .. } => message.clone(),
            Self::StateError { message } => message.clone(),
            Self::StorageError { message } => message.clone(),
            Self::SharedError(err) => err.to_string(),
            Self::SerializationError(err) => err.to_string(),
        }
    }
}
