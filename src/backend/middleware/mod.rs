//! Middleware Module
//!
//! Request-level plumbing shared by every handler.
//!
//! - **`auth`** - The `AuthUser` extractor for token-protected routes
//! - **`extract`** - JSON body and query extraction with uniform errors

pub mod auth;
pub mod extract;

pub use auth::{token_from_headers, AuthUser, AuthenticatedUser, TOKEN_HEADER};
pub use extract::{extract_json, extract_query};
