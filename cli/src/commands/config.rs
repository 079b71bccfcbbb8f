//! Effective configuration command

use crate::config::CliConfigLoader;
use anyhow::Result;

/// Print the resolved configuration as JSON
pub async fn config_command(config_loader: CliConfigLoader) -> Result<()> {
    let loaded = config_loader.load().await?;

    match &loaded.source {
        Some(path) => eprintln!("Loaded from {}", path.display()),
        None => eprintln!("No configuration file found, using defaults"),
    }
    println!("{}", serde_json::to_string_pretty(&loaded.config)?);

    Ok(())
}
