//! Do Stuff site server entry point.
//!
//! Loads configuration, initialises logging, wires the sign-up relay and the
//! optional background content audit into shared state, then serves the site
//! with graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use dostuff_server::config::SiteConfig;
use dostuff_server::monitor::AuditMonitor;
use dostuff_server::notify::{FormRelaySink, SubscriptionSink};
use dostuff_server::routes::build_router;
use dostuff_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment.
    let config = SiteConfig::from_env();

    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(base_url = %config.base_url, "Do Stuff site starting");

    let sink: Arc<dyn SubscriptionSink> = Arc::new(
        FormRelaySink::new(config.notify_endpoint.clone(), config.notify_timeout)
            .context("failed to build notify relay")?,
    );

    // Shutdown signal channel.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut state = AppState::new(config.clone(), sink);
    let monitor_handle = if config.audit.enabled {
        let (monitor, handle) =
            AuditMonitor::spawn(state.renderer.clone(), &config.audit, shutdown_rx.clone());
        state = state.with_monitor(monitor);
        Some(handle)
    } else {
        None
    };

    if let Some(dir) = config.assets_dir.as_ref() {
        info!(dir = %dir.display(), "serving static assets");
    }

    let app = build_router(Arc::new(state));

    // Bind and serve.
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "Do Stuff site listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .context("server error")?;

    // Wait for the audit monitor to finish (with timeout).
    if let Some(handle) = monitor_handle {
        info!("waiting for audit monitor to stop");
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }

    info!("Do Stuff site stopped");
    Ok(())
}

/// Wait for SIGINT or SIGTERM, then broadcast shutdown.
async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
    let _ = shutdown_tx.send(true);
}
