//! HTTP server startup logic.

use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use axum::Router;
use axum_server::Handle;

use crate::config::HttpServerConfig;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address {0}")]
    Address(String),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the HTTP server and serve `app` until a shutdown signal arrives.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, config: &HttpServerConfig) -> Result<(), ServerError> {
    let addr = resolve_addr(&config.host, config.port)?;
    let handle = Handle::new();

    tracing::info!(%addr, "Starting HTTP server");

    shutdown::setup_shutdown_handler(
        handle.clone(),
        Duration::from_secs(config.shutdown_timeout_seconds),
    );

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Resolve `host:port` to the first matching socket address.
///
/// Accepts IP literals (v4 or v6) and hostnames such as `localhost`.
fn resolve_addr(host: &str, port: u16) -> Result<SocketAddr, ServerError> {
    (host, port)
        .to_socket_addrs()
        .map_err(|e| ServerError::Address(format!("{}:{} ({})", host, port, e)))?
        .next()
        .ok_or_else(|| ServerError::Address(format!("{}:{}", host, port)))
}
