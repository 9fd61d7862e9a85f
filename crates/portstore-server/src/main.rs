use anyhow::Context;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

mod adapters;
mod application;
mod config;
mod logging;
mod models;
mod routes;

use adapters::InMemoryPortRepository;
use application::{PortIngestor, PortService};
use config::ServerConfig;

/// Type aliases for application services with concrete repository implementations
pub type AppPortService = PortService<InMemoryPortRepository>;
pub type AppPortIngestor = PortIngestor<InMemoryPortRepository>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub port_service: Arc<AppPortService>,
    pub port_ingestor: Arc<AppPortIngestor>,
    /// Parent of every per-request token; cancelled when the shutdown
    /// grace period runs out
    pub cancel_root: CancellationToken,
}

impl AppState {
    pub fn new(repo: Arc<InMemoryPortRepository>, cancel_root: CancellationToken) -> Self {
        let port_service = Arc::new(PortService::new(repo));
        let port_ingestor = Arc::new(PortIngestor::new(port_service.clone()));
        Self {
            port_service,
            port_ingestor,
            cancel_root,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    logging::init_logger(config.log_format);

    tracing::info!("Portstore API initializing...");

    let cancel_root = CancellationToken::new();
    let state = AppState::new(Arc::new(InMemoryPortRepository::new()), cancel_root.clone());
    let router = routes::app(state);

    let listener = TcpListener::bind(&config.http_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.http_addr))?;

    tracing::info!("Swagger UI: /swagger-ui");
    tracing::info!("Portstore API listening on {}", listener.local_addr()?);

    let stop_accepting = CancellationToken::new();
    let mut server = tokio::spawn(
        axum::serve(listener, router)
            .with_graceful_shutdown(stop_accepting.clone().cancelled_owned())
            .into_future(),
    );

    tokio::select! {
        result = &mut server => {
            result.context("Server task failed")?.context("Server error")?;
            return Ok(());
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received, draining in-flight requests");
        }
    }

    stop_accepting.cancel();
    drain(&mut server, config.shutdown_timeout, &cancel_root).await?;

    tracing::info!("Portstore API stopped");
    Ok(())
}

/// Wait for in-flight requests, cancelling them once the grace period ends
async fn drain(
    server: &mut tokio::task::JoinHandle<std::io::Result<()>>,
    grace: Duration,
    cancel_root: &CancellationToken,
) -> anyhow::Result<()> {
    let result = match tokio::time::timeout(grace, &mut *server).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                "Requests still running after {:?}, cancelling them",
                grace
            );
            cancel_root.cancel();
            server.await
        }
    };

    result.context("Server task failed")?.context("Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
