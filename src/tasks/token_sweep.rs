//! Expired-token sweep background task

use std::{sync::Arc, time::Duration};
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Background task that periodically drops expired bearer tokens
pub async fn token_sweep_task(state: Arc<AppState>, every: Duration) {
    info!("Starting token sweep task (every {}s)", every.as_secs());

    let mut interval = interval(every);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;

        match state.sweep_tokens() {
            Ok(0) => debug!("Token sweep found nothing to remove"),
            Ok(removed) => info!("Token sweep removed {} expired tokens", removed),
            Err(e) => warn!("Token sweep failed: {}", e),
        }
    }
}
