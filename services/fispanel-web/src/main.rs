//! Fispanel Web
//!
//! # Usage
//!
//! ```bash
//! # Start with config/default.toml and config/local.toml
//! fispanel-web
//!
//! # Point at another API
//! fispanel-web --api-url http://localhost:3000
//!
//! # Environment overrides
//! FISPANEL__SERVER__PORT=9000 FISPANEL__COOKIES__SECURE=true fispanel-web
//! ```

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use tokio::signal;
use tokio::sync::oneshot;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fispanel_web::config::LoggingConfig;
use fispanel_web::{create_router, AppState, WebConfig};

/// Fispanel Web - browser console for the receipt/license admin API
#[derive(Parser, Debug)]
#[command(name = "fispanel-web")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TOML, JSON, or YAML)
    #[arg(short, long, env = "FISPANEL_CONFIG")]
    config: Option<String>,

    /// Host to bind to
    #[arg(long, env = "FISPANEL_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "FISPANEL_PORT")]
    port: Option<u16>,

    /// Admin API base URL
    #[arg(long, env = "FISPANEL_API_URL")]
    api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "FISPANEL_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format (json, pretty)
    #[arg(long, env = "FISPANEL_LOG_FORMAT")]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut config = WebConfig::load(args.config.as_deref()).context("Invalid configuration")?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(api_url) = args.api_url {
        config.api.base_url = api_url;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    if let Some(format) = args.log_format {
        config.logging.format = format;
    }

    init_logging(&config.logging);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        api = %config.api.base_url,
        "Starting Fispanel Web"
    );

    let addr = config
        .server
        .socket_addr()
        .with_context(|| format!("Invalid bind address {}:{}", config.server.host, config.server.port))?;
    let shutdown_timeout = config.server.shutdown_timeout();

    let state = Arc::new(AppState::new(config).context("Invalid API configuration")?);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot bind {addr}"))?;
    tracing::info!(%addr, "Server listening");

    let (signalled, on_signal) = oneshot::channel();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        let _ = signalled.send(());
    });

    tokio::select! {
        result = server.into_future() => {
            result.context("Server error")?;
            tracing::info!("Server shutdown complete");
        }
        _ = drain_deadline(on_signal, shutdown_timeout) => {
            tracing::warn!(
                timeout_secs = shutdown_timeout.as_secs(),
                "In-flight requests still running at the shutdown deadline, exiting"
            );
        }
    }
    Ok(())
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => subscriber.with(fmt::layer().json().with_target(true)).init(),
        _ => subscriber.with(fmt::layer().pretty().with_target(true)).init(),
    }
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}

/// Resolves `timeout` after the shutdown signal; never if none arrives
async fn drain_deadline(on_signal: oneshot::Receiver<()>, timeout: Duration) {
    if on_signal.await.is_err() {
        std::future::pending::<()>().await;
    }
    tracing::info!(
        timeout_secs = timeout.as_secs(),
        "Waiting for in-flight requests to complete..."
    );
    tokio::time::sleep(timeout).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["fispanel-web", "--port", "9000", "--api-url", "http://localhost:3000"]);
        assert_eq!(args.port, Some(9000));
        assert_eq!(args.api_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(args.host, None);
    }

    #[tokio::test]
    async fn test_drain_deadline_starts_at_the_signal() {
        let (signalled, on_signal) = oneshot::channel();
        let deadline = drain_deadline(on_signal, Duration::from_millis(10));
        tokio::pin!(deadline);

        let early = tokio::time::timeout(Duration::from_millis(50), &mut deadline).await;
        assert!(early.is_err());

        signalled.send(()).unwrap();
        let done = tokio::time::timeout(Duration::from_secs(1), &mut deadline).await;
        assert!(done.is_ok());
    }

    #[tokio::test]
    async fn test_drain_deadline_without_signal_never_fires() {
        let (signalled, on_signal) = oneshot::channel::<()>();
        drop(signalled);
        let waited = tokio::time::timeout(Duration::from_millis(50), drain_deadline(on_signal, Duration::ZERO)).await;
        assert!(waited.is_err());
    }
}
