use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use capacity_planner::config::Config;
use capacity_planner::sync::graph::GraphMirror;
use capacity_planner::sync::{worker, Mirror};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env().expect("Failed to load configuration");

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    tracing::info!("Starting capacity planner");

    let mirror: Option<Arc<dyn Mirror>> = match config.sync.graph.as_ref() {
        Some(graph) => match GraphMirror::new(graph) {
            Ok(mirror) => Some(Arc::new(mirror)),
            Err(e) => {
                tracing::warn!("Workbook mirror not available: {e}");
                None
            }
        },
        None => {
            tracing::info!("No workbook token configured, running without a mirror");
            None
        }
    };

    let addr = SocketAddr::new(config.host, config.port);
    let state = capacity_planner::build_state(config, mirror);

    // Connecting may create the workbook, so do it off the startup path
    if state.planner.sync().mirror().is_ok() {
        let state = state.clone();
        tokio::spawn(async move {
            if let Err(e) = state.planner.sync().connect().await {
                tracing::warn!("Initial mirror connection failed: {e}");
            }
        });
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let workers = worker::spawn(state.clone(), shutdown_rx);

    let app = capacity_planner::build_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    for handle in workers {
        let _ = handle.await;
    }

    tracing::info!("Sync workers stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
