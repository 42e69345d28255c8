//! Backend Module
//!
//! This module contains all server-side code for Beans: the Axum router,
//! the request handlers, the data store and the background scheduler.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Application state and startup
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`store`** - The data model, its lookups and JSON persistence
//! - **`auth`** - Registration, login, sessions and password reset
//! - **`channels`** / **`dms`** - Conversations and their membership
//! - **`messages`** - Sending, editing, reactions, pins, search
//! - **`standups`** - Timed collection windows in channels
//! - **`notifications`** - Per-user notification feed
//! - **`users`** - Profiles and profile photos
//! - **`stats`** - Involvement and utilization series
//! - **`admin`** - Global owner operations
//! - **`mail`** - Delivery of password reset codes
//! - **`middleware`** - Token authentication and body/query extraction
//! - **`error`** - Backend error type and response mapping
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - State and initialization
//! ├── routes/         - Route configuration
//! ├── store/          - Data model and persistence
//! ├── auth/           - Authentication
//! ├── channels/       - Channels
//! ├── dms/            - Direct messages
//! ├── messages/       - Messages
//! ├── standups/       - Standups
//! ├── notifications/  - Notification feed
//! ├── users/          - Profiles and photos
//! ├── stats/          - Statistics
//! ├── admin/          - Admin operations
//! ├── mail/           - Outgoing mail
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # State Management
//!
//! Handlers share one `AppState`. The store sits behind a single
//! `tokio::sync::RwLock`; every mutation happens under the write lock and
//! is written to disk before the lock is released, so a request never
//! observes a half-applied change.
//!
//! # Error Handling
//!
//! Every handler returns `Result<_, BackendError>`. Input problems answer
//! 400, authentication and permission problems answer 403.

/// Server setup and state
pub mod server;

/// Route configuration
pub mod routes;

/// Data model and persistence
pub mod store;

/// Backend error types
pub mod error;

/// Authentication and sessions
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Channels
pub mod channels;

/// Direct messages
pub mod dms;

/// Messages in channels and DMs
pub mod messages;

/// Standups
pub mod standups;

/// Notification feed
pub mod notifications;

/// Profiles and profile photos
pub mod users;

/// Involvement and utilization statistics
pub mod stats;

/// Global owner operations
pub mod admin;

/// Outgoing mail
pub mod mail;

/// Re-export commonly used types
pub use error::BackendError;
pub use server::{create_app, AppState};
