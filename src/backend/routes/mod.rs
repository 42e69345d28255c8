//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation, static files, fallback
//! └── api_routes.rs   - Versioned API endpoints
//! ```
//!
//! # Route Organization
//!
//! 1. **API Routes** - `/auth`, `/channel(s)`, `/dm`, `/message`, `/user(s)`,
//!    `/standup`, `/notifications`, `/search`, `/admin`, `/clear`
//! 2. **Images** - `/imgurl/{file}`
//! 3. **Fallback Handler** - JSON 404

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
