//! Route listing command

use crate::config::CliConfigLoader;
use crate::interactive::pages::{register_pages, MarketFeed};
use anyhow::Result;
use goldradar_core::services::MemoryViewport;
use goldradar_core::{ManualConnectivity, RouterBuilder, RouterServices};
use std::sync::Arc;
use tracing::info;

/// Show the registered routes and their options
pub async fn routes_command(config_loader: CliConfigLoader) -> Result<()> {
    let loaded = config_loader.load().await?;
    let config = loaded.config;
    info!("Listing routes");

    let feed = Arc::new(MarketFeed::new(Arc::new(ManualConnectivity::default())));
    let router = register_pages(RouterBuilder::new(config.clone()), &feed)
        .build(RouterServices::new(Arc::new(MemoryViewport::new())))?;

    println!("{:<14}{:<20}{:<8}{:<9}", "ROUTE", "TITLE", "CACHE", "PRELOAD");
    for route in router.routes() {
        let preload = route.options.preload
            && route.options.cache
            && config.preload_paths.iter().any(|path| path == route.id.as_str());
        let mut line = format!(
            "{:<14}{:<20}{:<8}{:<9}",
            route.id.as_str(),
            route.title,
            if route.options.cache { "yes" } else { "no" },
            if preload { "yes" } else { "no" }
        );
        if route.id.as_str() == config.default_route {
            line.push_str("(default)");
        }
        println!("{}", line.trim_end());
    }

    Ok(())
}
