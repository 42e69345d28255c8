//! Messages Module
//!
//! Everything that creates, changes or reads individual messages in
//! channels and DMs.
//!
//! # Module Structure
//!
//! ```text
//! messages/
//! ├── mod.rs        - Module exports
//! ├── ops.rs        - Store operations and their checks
//! ├── pagination.rs - Newest-first history pages
//! └── handlers.rs   - HTTP handlers
//! ```
//!
//! Tags (`@handle`) in sent, edited, shared and delivered messages notify
//! the tagged members. Reactions notify the sender.

pub mod handlers;
pub mod ops;
pub mod pagination;

pub use pagination::{page, PAGE_SIZE};
