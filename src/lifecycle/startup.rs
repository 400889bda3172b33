//! Startup orchestration.

use std::path::Path;

use tokio::net::TcpListener;

use crate::config::{load_config, ConfigError, ProxyConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::upstream::BuildError;

/// Fatal error while bringing the proxy up.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("upstream client setup failed: {0}")]
    Upstream(#[from] BuildError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Load the configuration file (if any) and the environment overlay.
pub fn load(path: Option<&Path>) -> Result<ProxyConfig, StartupError> {
    Ok(load_config(path)?)
}

/// Bind, serve, and wait for a termination signal.
pub async fn run(config: ProxyConfig) -> Result<(), StartupError> {
    let address = config.listen_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;
    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "Proxy server listening");
    tracing::info!(
        "Visit http://localhost:{} for usage information",
        local_addr.port()
    );

    let server = HttpServer::new(&config)?;
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    let serve = tokio::spawn(server.run(listener, server_shutdown));

    signals::shutdown_signal().await;
    shutdown.trigger();

    match serve.await {
        Ok(result) => result?,
        Err(e) => tracing::error!(error = %e, "Server task failed"),
    }
    Ok(())
}
