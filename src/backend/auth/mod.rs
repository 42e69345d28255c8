//! Authentication Module
//!
//! Registration, login, logout and password reset.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── users.rs        - Account store operations and handle generation
//! ├── sessions.rs     - JWT token management
//! ├── password.rs     - bcrypt on the blocking pool
//! └── handlers/       - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: details validated → user created → session opened → token returned
//! 2. **Login**: password verified → new session opened → token returned
//! 3. **Any other route**: token decoded → session checked against the user
//! 4. **Logout**: the token's session is revoked
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - Tokens are JWTs tied to a server-side session id, so they can be revoked
//! - Invalid or revoked tokens are rejected with 403

/// Account store operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// Password hashing
pub mod password;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::{login, logout, register, request_reset, reset};
pub use handlers::types::{AuthResponse, LoginRequest, RegisterRequest};
