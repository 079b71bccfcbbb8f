//! # GoldRadar Core
//!
//! Core library for GoldRadar - a simulated gold breakout dashboard.
//!
//! This library provides the page router that drives the dashboard: route
//! registration, a page lifecycle contract, a transition state machine with
//! page caching, retry with exponential backoff, connectivity-aware retry and
//! navigation telemetry.

// Core modules
pub mod analytics;
pub mod config;
pub mod error;
pub mod metrics;
pub mod page;
pub mod router;
pub mod services;

// Re-export commonly used types
pub use analytics::Analytics;
pub use config::RouterConfig;
pub use error::{Error, PageError, PageResult, Result, RouterError};
pub use metrics::PerformanceMetrics;
pub use page::{factory_fn, ContentNode, Page, PageContent, PageFactory, PageHandle};
pub use router::{
    NavigationOutcome, RouteId, RouteOptions, Router, RouterBuilder, RouterEvent, RouterServices,
    TransitionPhase,
};
pub use services::{ConnectivitySignal, ErrorPanel, LoadingIndicator, ManualConnectivity, Viewport};

/// Current version of the goldradar-core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize tracing to stderr.
///
/// `RUST_LOG` takes precedence; otherwise `debug` when verbose, `info` if not.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
