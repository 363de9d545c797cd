//! State management module
//!
//! This module contains the shared application state, the user and token
//! stores it owns, and the per-request caller context.

pub mod app_state;
pub mod session_context;
pub mod token_store;
pub mod user_store;

// Re-export main types
pub use app_state::AppState;
pub use session_context::SessionContext;
pub use token_store::TokenStore;
pub use user_store::UserStore;
