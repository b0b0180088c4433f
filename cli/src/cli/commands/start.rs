use std::path::PathBuf;

use ai_proxy_core::config::load_config;
use ai_proxy_core::proxy::{ProxyServer, RouteTable};

pub async fn run(
    config_path: Option<PathBuf>,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> anyhow::Result<()> {
    // Load configuration
    let mut config = load_config(config_path)?;

    // Apply overrides if provided
    if let Some(host) = host_override {
        config.server.host = host;
    }
    if let Some(port) = port_override {
        config.server.port = port;
    }

    let routes = RouteTable::builtin();

    tracing::info!("Starting AI Proxy...");
    tracing::info!("  Port: {}", config.server.port);
    tracing::info!("  Host: {}", config.server.host);
    tracing::info!("  Request timeout: {}ms", config.timeouts.request_timeout_ms);
    tracing::info!("  Routes: {}", routes.entries().len());

    let server = ProxyServer::new(
        config.server.host.clone(),
        config.server.port,
        routes,
        config.timeouts.request_timeout_ms,
    )?;

    tracing::info!("Proxy server starting on http://{}", config.server.bind_address());
    tracing::info!("Press Ctrl+C to stop");

    // Run server (blocks until shutdown)
    server.run().await?;

    Ok(())
}
