//! Beans - Main Library
//!
//! Beans is a small messaging-platform backend: users, channels, direct
//! messages, reactions, standups and notifications, served over HTTP with
//! Axum and backed by a single in-memory store that is mirrored to a JSON
//! file after every change.
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types, validation rules, configuration and the
//!   errors shared by every layer
//! - **`backend`** - The Axum server: state, routes, handlers, the data
//!   store and the background scheduler
//!
//! # Usage
//!
//! ```rust,no_run
//! use beans::backend::server::init::create_app;
//! use beans::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let app = create_app(config).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3200").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Thread Safety
//!
//! The whole data model sits behind one `Arc<RwLock<DataStore>>`. Handlers
//! take the write half for anything that mutates or depends on scheduled
//! work, and the read half for plain lookups.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;
