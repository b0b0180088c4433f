//! Proxy Server - Axum HTTP server

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::proxy::handlers::{custom::handle_custom_model_proxy, dispatch::handle_dispatch};
use crate::proxy::middleware::{disable_response_buffering, preflight_no_content};
use crate::proxy::upstream::client::UpstreamClient;
use crate::proxy::RouteTable;

const GREETING: &str = "A proxy for AI!";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub upstream: Arc<UpstreamClient>,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(routes: RouteTable, request_timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            routes: Arc::new(routes),
            upstream: Arc::new(UpstreamClient::new()?),
            request_timeout,
        })
    }
}

/// Proxy server instance
pub struct ProxyServer {
    host: String,
    port: u16,
    state: AppState,
}

impl ProxyServer {
    pub fn new(
        host: String,
        port: u16,
        routes: RouteTable,
        request_timeout_ms: u64,
    ) -> anyhow::Result<Self> {
        let state = AppState::new(routes, Duration::from_millis(request_timeout_ms))?;
        Ok(Self { host, port, state })
    }

    /// Run the proxy server (blocking)
    pub async fn run(self) -> anyhow::Result<()> {
        let app = build_router(self.state);

        let addr = format!("{}:{}", self.host, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        tracing::info!("Proxy server listening on {}", addr);

        // Handle graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Proxy server stopped");
        Ok(())
    }
}

/// Fixed routes first; anything else (other methods on the fixed paths
/// included) goes to route-table dispatch.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(greeting_handler).fallback(handle_dispatch))
        .route(
            "/custom-model-proxy",
            post(handle_custom_model_proxy).fallback(handle_dispatch),
        )
        .fallback(handle_dispatch)
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(preflight_no_content))
        .layer(middleware::from_fn(disable_response_buffering))
        .with_state(state)
}

async fn greeting_handler() -> &'static str {
    GREETING
}

/// Shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
