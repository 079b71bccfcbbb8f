//! # GoldRadar CLI
//!
//! Terminal host for the GoldRadar dashboard.
//!
//! ## Usage
//!
//! - `goldradar` - Start the interactive dashboard
//! - `goldradar routes` - List registered routes
//! - `goldradar config` - Print the resolved configuration

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod interactive;

use commands::{config_command, interactive_command, routes_command};
use config::CliConfigLoader;

/// goldradar - gold breakout dashboard in the terminal
#[derive(Parser)]
#[command(name = "goldradar")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Simulated XAU/USD breakout dashboard")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file or directory path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Route shown at startup, e.g. /scanner
    #[arg(long)]
    route: Option<String>,

    /// Maximum automatic retries per route
    #[arg(long)]
    max_retries: Option<u32>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Append analytics events to this file on exit (JSON lines)
    #[arg(long)]
    analytics_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered routes
    Routes,

    /// Print the resolved configuration
    Config,
}

/// Build a configuration loader from CLI arguments
fn build_config_loader(cli: &Cli) -> CliConfigLoader {
    let mut loader = CliConfigLoader::new();

    if let Some(config_path) = &cli.config {
        loader = loader.with_config_override(config_path.clone());
    }

    if let Some(route) = &cli.route {
        loader = loader.with_route_override(route.clone());
    }

    if let Some(max_retries) = cli.max_retries {
        loader = loader.with_max_retries_override(max_retries);
    }

    loader
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    goldradar_core::init_tracing(cli.verbose);

    let config_loader = build_config_loader(&cli);

    match cli.command {
        Some(Commands::Routes) => routes_command(config_loader).await,
        Some(Commands::Config) => config_command(config_loader).await,
        None => interactive_command(config_loader, cli.analytics_file).await,
    }
}
