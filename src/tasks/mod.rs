//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod token_sweep;

// Re-export main functions
pub use token_sweep::token_sweep_task;
