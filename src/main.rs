//! Countdown - A background countdown timer with an observable state API
//! 
//! This is the main entry point for the countdown server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use countdown::{
    api::create_router,
    config::Config,
    services::LogNotifications,
    state::AppState,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}", config.host, config.port);

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        Arc::new(LogNotifications),
    ));
    state.bridge.set_theme(config.theme());

    if let Some(digits) = &config.start {
        let seconds = digits.to_seconds();
        if seconds > 0 {
            info!("Starting launch countdown of {}", digits);
            state
                .start_timer(seconds, !config.paused)
                .map_err(anyhow::Error::msg)?;
        } else {
            warn!("Launch countdown is empty, not starting");
        }
    }

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timer/start    - Start a countdown");
    info!("  POST /timer/pause    - Pause the countdown");
    info!("  POST /timer/resume   - Resume the countdown");
    info!("  POST /timer/add      - Add time (60s by default)");
    info!("  POST /timer/cancel   - Cancel the countdown");
    info!("  POST /timer/reset    - Restart from the last entered duration");
    info!("  GET  /timer/events   - Stream countdown updates");
    info!("  POST /editor         - Open the duration editor");
    info!("  GET  /settings/theme - Theme preference");
    info!("  GET  /status         - Check current status");
    info!("  GET  /health         - Health check");

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

    if let Err(e) = state.engine.shutdown().await {
        warn!("Failed to stop countdown: {}", e);
    }

    info!("Server shutdown complete");
    Ok(())
}
