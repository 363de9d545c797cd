//! Practice Tracker - personal practice-time tracking server
//!
//! This is the main entry point for the practice-tracker application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use practice_tracker::{
    api::create_router,
    config::Config,
    shutdown::shutdown_signal,
    state::{AppState, UserStore},
    tasks::token_sweep_task,
    timer::SystemClock,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "practice_tracker={},tower_http=info",
            config.log_level()
        ))
        .init();

    info!("Starting practice-tracker server v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, token_ttl={}h, data_file={:?}",
        config.host, config.port, config.token_ttl_hours, config.data_file
    );

    let store = match &config.data_file {
        Some(path) => UserStore::open(path)?,
        None => {
            info!("No data file configured, users are kept in memory only");
            UserStore::in_memory()
        }
    };

    // Create application state
    let state = Arc::new(AppState::new(
        store,
        config.token_ttl(),
        Arc::new(SystemClock),
        config.port,
        config.host.clone(),
    ));

    // Start the token sweep background task
    let sweep_state = Arc::clone(&state);
    let sweep_every = config.sweep_interval();
    tokio::spawn(async move {
        token_sweep_task(sweep_state, sweep_every).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST   /api/register, /api/login, /api/logout");
    info!("  GET    /api/user  PUT /api/user  DELETE /api/user");
    info!("  GET    /api/user/practice  POST /api/user/practice");
    info!("  DELETE /api/user/practice/:id");
    info!("  GET    /api/timer  PUT /api/timer/mode  PUT /api/timer/manual");
    info!("  POST   /api/timer/start, /stop, /reset, /save");
    info!("  GET    /api/reports?range=daily|weekly|monthly|yearly");
    info!("  GET    /health");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
