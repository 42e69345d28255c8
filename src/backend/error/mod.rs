//! Backend Error Module
//!
//! This module defines the error type used by handlers and store
//! operations, and its conversion into HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - Error type definitions
//! └── conversion.rs - IntoResponse and rejection mapping
//! ```
//!
//! # Error Types
//!
//! - `InputError` - 400, invalid request content
//! - `AccessError` - 403, bad token or missing permission
//! - `HandlerError` - explicit status code
//! - `StateError` / `StorageError` - 500
//! - `SharedError` - Validation errors from the shared module
//! - `SerializationError` - JSON serialization errors

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;
pub use conversion::rejection_to_error;
