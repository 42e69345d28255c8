//! DMs Module
//!
//! Direct message conversations with a fixed initial member list.

pub mod handlers;
pub mod ops;
