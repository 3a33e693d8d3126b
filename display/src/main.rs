// Display server binary entry point

use anyhow::Result;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};

use common::config::Settings;
use display::routes;
use display::startup::wait_for_log_file;
use display::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    common::telemetry::init_logging("display=info,common=info,tower_http=warn")?;

    info!("Starting speedtest display server");

    // Load configuration
    let settings = Settings::load().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;
    settings.validate().map_err(|e| anyhow::anyhow!(e))?;
    info!(
        host = %settings.server.host,
        port = settings.server.port,
        log_path = %settings.display.log_path,
        "Configuration loaded"
    );

    // The speedtest runner may still be producing its first result
    wait_for_log_file(
        Path::new(&settings.display.log_path),
        Duration::from_secs(settings.display.startup_timeout_seconds),
        Duration::from_secs(settings.display.startup_poll_seconds),
    )
    .await?;

    // Create application state and router
    let state = AppState::new(settings.clone());
    let app = routes::create_router(state);

    // Start server
    let addr = SocketAddr::from((
        settings.server.host.parse::<std::net::IpAddr>()?,
        settings.server.port,
    ));
    info!(addr = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Display server stopped");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Initiating graceful shutdown");
}
