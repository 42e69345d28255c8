//! Shared Module
//!
//! Types and rules that are independent of the HTTP layer: the JSON shapes
//! exchanged with clients, field validation, configuration and the shared
//! error type.

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Wire types for users, channels, DMs, messages and statistics
pub mod messaging;

/// Field validation rules
pub mod validation;

/// Wall-clock helpers
pub mod time;

/// Re-export commonly used types for convenience
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError, SmtpConfig};
pub use time::now_secs;
