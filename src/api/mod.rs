//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers, the bearer-token
//! extractor and the request/response structures.

pub mod error;
pub mod extractor;
pub mod handlers;
pub mod responses;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
pub use error::ApiError;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/register", post(register_handler))
        .route("/api/login", post(login_handler))
        .route("/api/logout", post(logout_handler))
        .route(
            "/api/user",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
        .route(
            "/api/user/practice",
            get(list_practice_handler).post(add_practice_handler),
        )
        .route("/api/user/practice/:id", delete(delete_practice_handler))
        .route("/api/timer", get(timer_status_handler))
        .route("/api/timer/mode", put(timer_mode_handler))
        .route("/api/timer/start", post(timer_start_handler))
        .route("/api/timer/stop", post(timer_stop_handler))
        .route("/api/timer/reset", post(timer_reset_handler))
        .route("/api/timer/manual", put(timer_manual_handler))
        .route("/api/timer/save", post(timer_save_handler))
        .route("/api/reports", get(report_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
