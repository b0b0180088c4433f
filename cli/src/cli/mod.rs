pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ai-proxy")]
#[command(author, version, about = "Reverse proxy for AI provider APIs, routed by path prefix")]
pub struct Cli {
    /// Path to config file (checked in order: local config.toml, ~/.config/ai-proxy/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the proxy server
    Start {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List the provider routes
    Routes,

    /// Show proxy status
    Status,
}
