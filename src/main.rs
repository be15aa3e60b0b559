//! Focus Timer - A state-managed HTTP server for a work/break focus timer
//!
//! This is the main entry point for the focus-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use focus_timer::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::tick_timer_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("focus_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting focus-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, divisor={}, background_darkness={}",
          config.host, config.port, config.divisor, config.background_darkness);

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.divisor,
        config.settings(),
    ));

    // Start the tick timer background task
    let tick_task = tokio::spawn(tick_timer_task(Arc::clone(&state)));

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timer/start     - Start or resume the timer");
    info!("  POST /timer/pause     - Pause the timer");
    info!("  POST /timer/reset     - Reset to idle");
    info!("  POST /timer/break     - Switch to break");
    info!("  POST /timer/work      - Switch to work");
    info!("  PUT  /timer/task      - Set the current task");
    info!("  POST /tasks/complete  - Complete the current task");
    info!("  GET  /tasks/history   - Completed tasks");
    info!("  GET  /settings        - Current settings");
    info!("  PUT  /settings        - Update settings");
    info!("  GET  /status          - Timer status");
    info!("  GET  /notifications   - Recent notifications");
    info!("  GET  /events          - Notification and audio event stream");
    info!("  GET  /health          - Health check");

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

    // Stop ticking before the state goes away
    tick_task.abort();

    info!("Server shutdown complete");
    Ok(())
}
