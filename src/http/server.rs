//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the three endpoints
//! - Wire up middleware (request id, tracing, permissive CORS)
//! - Bind server to listener and stop on the shutdown signal

use std::sync::Arc;

use axum::{body::Body, http::Request, routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::feed::ProxyBase;
use crate::http::handlers;
use crate::http::request::{MakeProxyRequestId, RequestIdExt, X_REQUEST_ID};
use crate::lifecycle::StartupError;
use crate::upstream::Fetcher;

/// Application state injected into handlers. Immutable and shared.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<Fetcher>,
    pub proxy_base: Arc<ProxyBase>,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &ProxyConfig) -> Result<Self, StartupError> {
        let fetcher = Fetcher::new(&config.upstream)?;
        let proxy_base = ProxyBase::new(config.public_base());

        tracing::info!(
            proxy_base = %proxy_base,
            upstream_timeout_ms = config.upstream.timeout_ms,
            user_agent = %config.upstream.user_agent,
            "Proxy initialized"
        );

        let state = AppState {
            fetcher: Arc::new(fetcher),
            proxy_base: Arc::new(proxy_base),
        };

        Ok(Self {
            router: Self::build_router(state),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/", get(handlers::index))
            .route("/proxy", get(handlers::proxy))
            .route("/rss-proxy", get(handlers::rss_proxy))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeProxyRequestId))
                    .layer(TraceLayer::new_for_http().make_span_with(
                        |request: &Request<Body>| {
                            tracing::info_span!(
                                "request",
                                method = %request.method(),
                                uri = %request.uri(),
                                request_id = %request.request_id(),
                            )
                        },
                    ))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(cors),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
