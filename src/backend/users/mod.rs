//! Users Module
//!
//! Profiles, profile editing and profile photos.

pub mod handlers;
pub mod ops;
pub mod photo;
