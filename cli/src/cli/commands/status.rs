use std::path::PathBuf;

use ai_proxy_core::config::{default_config_path, load_config};

pub async fn run(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    println!("AI Proxy Status");
    println!("===============");
    println!();
    println!("Configuration:");
    println!("  Default config file: {:?}", default_config_path());
    println!();
    println!("Server settings:");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);
    println!("  Request timeout: {}ms", config.timeouts.request_timeout_ms);

    // Check if server is reachable
    println!();
    let url = format!("http://{}/", config.server.bind_address());
    match reqwest::get(&url).await {
        Ok(resp) if resp.status().is_success() => {
            println!("Server: RUNNING ✓");
        }
        _ => {
            println!("Server: NOT RUNNING");
        }
    }

    Ok(())
}
