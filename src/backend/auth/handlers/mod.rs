//! Authentication Handlers Module
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs            - Module exports and documentation
//! ├── types.rs          - Request and response types
//! ├── register.rs       - Account creation
//! ├── login.rs          - Login and logout
//! └── password_reset.rs - Reset code request and redemption
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /auth/register/v3
//! - **`login`** - POST /auth/login/v3
//! - **`logout`** - POST /auth/logout/v2
//! - **`request_reset`** - POST /auth/passwordreset/request/v1
//! - **`reset`** - POST /auth/passwordreset/reset/v1

/// Request and response types
pub mod types;

/// Register handler
pub mod register;

/// Login and logout handlers
pub mod login;

/// Password reset handlers
pub mod password_reset;

pub use types::{AuthResponse, LoginRequest, PasswordResetConfirm, PasswordResetRequest, RegisterRequest};

pub use login::{login, logout};
pub use password_reset::{request_reset, reset};
pub use register::register;
