//! Channels Module
//!
//! Public and private group conversations with owners and members.

pub mod handlers;
pub mod ops;
