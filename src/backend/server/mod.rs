//! Server Module
//!
//! This module contains the code that initializes the Axum HTTP server and
//! holds the state shared by every handler.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! └── init.rs         - Store loading, scheduler and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Store Loading**: Reads the JSON data file, if configured
//! 2. **Images**: Creates the image directory and default photo
//! 3. **Background Tasks**: Starts the scheduler tick
//! 4. **Router Creation**: Configures all routes and middleware

/// Application state management
pub mod state;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use init::{build_state, create_app, spawn_scheduler};
pub use state::AppState;
