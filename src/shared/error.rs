//! Input Rules
//!
//! Errors raised when a request field breaks a length or format rule.
//! They do not depend on the HTTP layer; the backend wraps them in
//! `BackendError`, which always answers 400.
//!
//! ```rust
//! use beans::shared::error::SharedError;
//!
//! let error = SharedError::length("nameFirst", 1, 50);
//! assert_eq!(error.to_string(), "nameFirst must be between 1 and 50 characters");
//! ```
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Character count outside `min..=max`
    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },

    #[error("{field} must be at least {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// Right length, wrong shape
    #[error("{field} {reason}")]
    Format {
        field: &'static str,
        reason: &'static str,
    },
}

impl SharedError {
    pub fn length(field: &'static str, min: usize, max: usize) -> Self {
        Self::Length { field, min, max }
    }

    pub fn too_short(field: &'static str, min: usize) -> Self {
        Self::TooShort { field, min }
    }

    pub fn too_long(field: &'static str, max: usize) -> Self {
        Self::TooLong { field, max }
    }

    pub fn format(field: &'static str, reason: &'static str) -> Self {
        Self::Format { field, reason }
    }
}
