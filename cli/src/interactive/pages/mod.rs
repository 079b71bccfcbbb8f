//! Pages of the GoldRadar dashboard
//!
//! This module contains the pages the router manages and the route table
//! that registers them.

pub mod about;
pub mod alerts;
pub mod backtest;
pub mod dashboard;
pub mod market;
pub mod scanner;

// Re-export commonly used types
pub use about::AboutPage;
pub use alerts::AlertsPage;
pub use backtest::BacktestPage;
pub use dashboard::DashboardPage;
pub use market::MarketFeed;
pub use scanner::ScannerPage;

use goldradar_core::{factory_fn, ContentNode, RouteOptions, RouterBuilder};
use std::sync::Arc;

/// Register every dashboard page on `builder`
pub fn register_pages(builder: RouterBuilder, feed: &Arc<MarketFeed>) -> RouterBuilder {
    let dashboard_feed = feed.clone();
    let scanner_feed = feed.clone();
    let alerts_feed = feed.clone();
    let backtest_feed = feed.clone();

    builder
        .route_with(
            "/dashboard",
            "Dashboard",
            factory_fn(move || DashboardPage::new(dashboard_feed.clone())),
            RouteOptions::new().with_preload(true),
        )
        .route_with(
            "/scanner",
            "Breakout Scanner",
            factory_fn(move || ScannerPage::new(scanner_feed.clone())),
            RouteOptions::new().with_preload(true),
        )
        .route(
            "/alerts",
            "Price Alerts",
            factory_fn(move || AlertsPage::new(alerts_feed.clone())),
        )
        // Results are regenerated on every visit
        .route_with(
            "/backtest",
            "Backtest",
            factory_fn(move || BacktestPage::new(backtest_feed.clone())),
            RouteOptions::uncached(),
        )
        .route("/about", "About", factory_fn(AboutPage::new))
}

pub(crate) fn heading(text: impl Into<String>) -> ContentNode {
    ContentNode::new("h1").with_text(text)
}

pub(crate) fn section(title: impl Into<String>) -> ContentNode {
    ContentNode::new("h2").with_text(title)
}

pub(crate) fn paragraph(text: impl Into<String>) -> ContentNode {
    ContentNode::new("p").with_text(text)
}

pub(crate) fn stat(label: &str, value: impl std::fmt::Display) -> ContentNode {
    ContentNode::new("div")
        .with_class("stat")
        .with_text(format!("{}: {}", label, value))
}

pub(crate) fn item(text: impl Into<String>) -> ContentNode {
    ContentNode::new("li").with_text(text)
}

/// Class for a signed value: `up`, `down` or `muted` for zero
pub(crate) fn trend_class(value: f64) -> &'static str {
    if value > 0.0 {
        "up"
    } else if value < 0.0 {
        "down"
    } else {
        "muted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goldradar_core::services::MemoryViewport;
    use goldradar_core::{ManualConnectivity, RouterConfig, RouterServices};

    #[test]
    fn test_route_table() {
        let connectivity = Arc::new(ManualConnectivity::default());
        let feed = Arc::new(MarketFeed::new(connectivity));
        let router = register_pages(RouterBuilder::new(RouterConfig::default()), &feed)
            .build(RouterServices::new(Arc::new(MemoryViewport::new())))
            .unwrap();

        let paths: Vec<String> = router
            .routes()
            .iter()
            .map(|route| route.id.to_string())
            .collect();
        assert_eq!(
            paths,
            vec!["/about", "/alerts", "/backtest", "/dashboard", "/scanner"]
        );

        let backtest = router
            .routes()
            .into_iter()
            .find(|route| route.id.as_str() == "/backtest")
            .unwrap();
        assert!(!backtest.options.cache);
    }

    #[test]
    fn test_trend_class() {
        assert_eq!(trend_class(1.5), "up");
        assert_eq!(trend_class(-0.1), "down");
        assert_eq!(trend_class(0.0), "muted");
    }
}
