//! CLI module for the Niche-Scout proxy
//!
//! - `serve`: run the proxy server (default)
//! - `check-config`: load and validate configuration, then exit

pub mod check_config;
pub mod serve;

use clap::{Parser, Subcommand};

/// Niche-Scout caching proxy with similarity re-ranking
#[derive(Parser)]
#[command(name = "niche-scout-proxy")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the proxy server
    Serve,

    /// Validate configuration without serving
    CheckConfig,
}
