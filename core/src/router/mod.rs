//! Router module for managing page navigation and routing
//!
//! This module provides the page router: route registration, the transition
//! state machine with page lifecycle management, page caching, retry with
//! backoff and connectivity-aware retry.

mod connectivity;
pub mod events;
pub mod history;
mod loading;
pub mod route;
pub mod router;
pub mod state;

// Re-export commonly used types
pub use events::RouterEvent;
pub use history::PathHistory;
pub use route::{RetryRecord, Route, RouteId, RouteOptions};
pub use router::{NavigationOutcome, Router, RouterBuilder, RouterServices};
pub use state::{NavigationState, TransitionPhase};
