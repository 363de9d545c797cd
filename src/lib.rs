//! Practice Tracker - personal practice-time tracking server
//!
//! This library provides the session timer state machine, the practice
//! report aggregation, the user and token stores, and the HTTP API that
//! exposes them.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod reports;
pub mod shutdown;
pub mod state;
pub mod tasks;
pub mod timer;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::TrackerError;
pub use state::AppState;
pub use shutdown::shutdown_signal;
