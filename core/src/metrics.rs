//! Navigation telemetry
//!
//! Tracks load times per route, cache usage and a bounded history of
//! navigation errors.

use crate::error::RouterError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// Snapshot of router telemetry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Transitions started
    pub navigation_count: u64,
    /// Failed transition attempts
    pub error_count: u64,
    /// Automatic retries scheduled
    pub retry_count: u64,
    /// Mean of the latest load time per route, in milliseconds
    pub average_load_time: f64,
    /// Percentage of page resolutions served from the cache
    pub cache_hit_rate: f64,
}

/// Entry of the global error history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub route: String,
    pub kind: String,
    pub message: String,
    pub attempt: u32,
    pub timestamp: DateTime<Utc>,
}

impl ErrorRecord {
    pub fn new(error: &RouterError, attempt: u32) -> Self {
        Self {
            route: error.route().unwrap_or_default().to_string(),
            kind: error.kind().to_string(),
            message: error.to_string(),
            attempt,
            timestamp: Utc::now(),
        }
    }
}

/// Mutable telemetry state owned by the router
#[derive(Debug)]
pub struct MetricsRecorder {
    navigation_count: u64,
    error_count: u64,
    retry_count: u64,
    cache_hits: u64,
    resolutions: u64,
    load_times: HashMap<String, Duration>,
    errors: VecDeque<ErrorRecord>,
    error_limit: usize,
}

impl MetricsRecorder {
    pub fn new(error_limit: usize) -> Self {
        Self {
            navigation_count: 0,
            error_count: 0,
            retry_count: 0,
            cache_hits: 0,
            resolutions: 0,
            load_times: HashMap::new(),
            errors: VecDeque::with_capacity(error_limit),
            error_limit: error_limit.max(1),
        }
    }

    pub fn record_navigation(&mut self) {
        self.navigation_count += 1;
    }

    /// Record how a page instance was obtained
    pub fn record_resolution(&mut self, cache_hit: bool) {
        self.resolutions += 1;
        if cache_hit {
            self.cache_hits += 1;
        }
    }

    pub fn record_load(&mut self, route: &str, load_time: Duration) {
        self.load_times.insert(route.to_string(), load_time);
    }

    pub fn record_retry(&mut self) {
        self.retry_count += 1;
    }

    pub fn record_error(&mut self, error: &RouterError, attempt: u32) {
        self.error_count += 1;
        if self.errors.len() == self.error_limit {
            self.errors.pop_front();
        }
        self.errors.push_back(ErrorRecord::new(error, attempt));
    }

    /// Latest load time of a route
    pub fn load_time(&self, route: &str) -> Option<Duration> {
        self.load_times.get(route).copied()
    }

    pub fn error_history(&self) -> Vec<ErrorRecord> {
        self.errors.iter().cloned().collect()
    }

    pub fn average_load_time(&self) -> Duration {
        if self.load_times.is_empty() {
            return Duration::ZERO;
        }
        let total: Duration = self.load_times.values().sum();
        total / self.load_times.len() as u32
    }

    pub fn cache_hit_rate(&self) -> f64 {
        if self.resolutions == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / self.resolutions as f64 * 100.0
    }

    pub fn snapshot(&self) -> PerformanceMetrics {
        PerformanceMetrics {
            navigation_count: self.navigation_count,
            error_count: self.error_count,
            retry_count: self.retry_count,
            average_load_time: self.average_load_time().as_secs_f64() * 1000.0,
            cache_hit_rate: self.cache_hit_rate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot() {
        let metrics = MetricsRecorder::new(10).snapshot();
        assert_eq!(metrics, PerformanceMetrics::default());
    }

    #[test]
    fn test_average_uses_latest_load_per_route() {
        let mut metrics = MetricsRecorder::new(10);
        metrics.record_load("/dashboard", Duration::from_millis(400));
        metrics.record_load("/dashboard", Duration::from_millis(100));
        metrics.record_load("/scanner", Duration::from_millis(300));

        assert_eq!(metrics.average_load_time(), Duration::from_millis(200));
        assert_eq!(
            metrics.load_time("/dashboard"),
            Some(Duration::from_millis(100))
        );
    }

    #[test]
    fn test_cache_hit_rate() {
        let mut metrics = MetricsRecorder::new(10);
        metrics.record_resolution(false);
        metrics.record_resolution(false);
        metrics.record_resolution(true);
        metrics.record_resolution(true);
        assert!((metrics.cache_hit_rate() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_error_history_is_bounded() {
        let mut metrics = MetricsRecorder::new(2);
        for attempt in 1..=3 {
            metrics.record_error(&RouterError::Offline("/alerts".to_string()), attempt);
        }

        let history = metrics.error_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].attempt, 2);
        assert_eq!(history[1].kind, "offline");
        assert_eq!(metrics.snapshot().error_count, 3);
    }
}
