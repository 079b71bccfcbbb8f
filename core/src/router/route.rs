//! Route definitions and utilities
//!
//! This module defines the route types registered with the router,
//! including the per-route retry record.

use crate::page::PageFactory;
use std::borrow::Borrow;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Unique identifier for a route: a normalized path such as `/scanner`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(pub String);

impl RouteId {
    /// Create a route ID from a raw path, normalizing it.
    ///
    /// Surrounding whitespace and a leading `#` are dropped, a leading `/` is
    /// added and a trailing `/` removed. An empty path normalizes to `/`.
    pub fn new(path: impl AsRef<str>) -> Self {
        let trimmed = path.as_ref().trim();
        let trimmed = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let trimmed = trimmed.trim_matches('/');
        Self(format!("/{}", trimmed))
    }

    /// Whether this is the root path
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RouteId {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for RouteId {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl From<&RouteId> for RouteId {
    fn from(id: &RouteId) -> Self {
        id.clone()
    }
}

impl std::fmt::Display for RouteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RouteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RouteId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Registration options for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteOptions {
    /// Keep the page instance across navigations away and back
    pub cache: bool,
    /// Construct the instance eagerly at startup (preload set only)
    pub preload: bool,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            cache: true,
            preload: false,
        }
    }
}

impl RouteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn uncached() -> Self {
        Self {
            cache: false,
            preload: false,
        }
    }

    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_preload(mut self, preload: bool) -> Self {
        self.preload = preload;
        self
    }
}

/// Retry bookkeeping carried by each route
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryRecord {
    /// Failed attempts since the last successful load
    pub count: u32,
    /// Earliest time the next automatic retry may run
    pub next_eligible_at: Option<Instant>,
}

impl RetryRecord {
    /// Record a failed attempt; the next retry is allowed after `delay`
    pub fn record_failure(&mut self, delay: Duration) {
        self.count += 1;
        self.next_eligible_at = Some(Instant::now() + delay);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether an automatic retry is still allowed under `max_retries`
    pub fn can_retry(&self, max_retries: u32) -> bool {
        self.count < max_retries
    }

    /// Whether this route is waiting for a connectivity-triggered retry
    pub fn is_pending(&self, max_retries: u32) -> bool {
        self.count > 0 && self.count < max_retries
    }
}

/// Route definition containing the page factory and its metadata
#[derive(Clone)]
pub struct Route {
    /// Unique identifier for this route
    pub id: RouteId,
    /// Human-readable title for this route
    pub title: String,
    /// Factory producing page instances
    pub factory: Arc<dyn PageFactory>,
    /// Registration options
    pub options: RouteOptions,
    /// Retry state of this route
    pub retry: RetryRecord,
}

impl Route {
    /// Create a new route with the given ID, factory and title
    pub fn new(
        id: impl Into<RouteId>,
        factory: Arc<dyn PageFactory>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            factory,
            options: RouteOptions::default(),
            retry: RetryRecord::default(),
        }
    }

    /// Set the registration options for this route
    pub fn with_options(mut self, options: RouteOptions) -> Self {
        self.options = options;
        self
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("options", &self.options)
            .field("retry", &self.retry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_id_normalization() {
        assert_eq!(RouteId::new("scanner").as_str(), "/scanner");
        assert_eq!(RouteId::new("/scanner/").as_str(), "/scanner");
        assert_eq!(RouteId::new("#/alerts").as_str(), "/alerts");
        assert_eq!(RouteId::new("  /backtest ").as_str(), "/backtest");
        assert!(RouteId::new("").is_root());
        assert!(RouteId::new("/").is_root());
    }

    #[test]
    fn test_route_id_traits() {
        let route_id = RouteId::from("test");

        assert_eq!(format!("{}", route_id), "/test");

        let s: &str = route_id.as_ref();
        assert_eq!(s, "/test");

        let s: &str = route_id.borrow();
        assert_eq!(s, "/test");
    }

    #[test]
    fn test_route_options_defaults() {
        let options = RouteOptions::default();
        assert!(options.cache);
        assert!(!options.preload);

        let options = RouteOptions::uncached().with_preload(true);
        assert!(!options.cache);
        assert!(options.preload);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_record() {
        let mut record = RetryRecord::default();
        assert!(!record.is_pending(3));
        assert!(record.can_retry(3));

        record.record_failure(Duration::from_secs(1));
        assert_eq!(record.count, 1);
        assert!(record.is_pending(3));
        assert!(record.next_eligible_at.unwrap() > Instant::now());

        record.record_failure(Duration::from_secs(2));
        record.record_failure(Duration::from_secs(4));
        assert!(!record.can_retry(3));
        assert!(!record.is_pending(3));

        record.reset();
        assert_eq!(record, RetryRecord::default());
    }
}
