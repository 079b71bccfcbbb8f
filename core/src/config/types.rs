//! Router configuration types
//!
//! Core only accepts fully resolved, validated configuration.
//! All discovery, loading, and merging happens in CLI layer.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the page router
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Route used when navigating to an empty path or `/`
    pub default_route: String,
    /// Route navigated to when a requested route is missing or terminally failing
    pub fallback_route: String,
    /// Maximum number of automatic retries per route
    pub max_retries: u32,
    /// First retry delay; doubled on every further attempt
    pub retry_base_delay_ms: u64,
    /// Transitions faster than this never show the loading indicator
    pub loading_delay_ms: u64,
    /// Fade-out delay before the page container is replaced
    pub transition_delay_ms: u64,
    /// Connectivity polling interval
    pub connectivity_poll_ms: u64,
    /// Capacity of the global error history ring buffer
    pub error_history_limit: usize,
    /// Maximum number of path history entries
    pub max_history: usize,
    /// Routes eligible for eager construction at startup
    pub preload_paths: Vec<String>,
    /// Page loads slower than this are logged as warnings
    pub slow_load_warn_ms: u64,
    /// Prefix used for page titles
    pub app_title: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_route: "/dashboard".to_string(),
            fallback_route: "/dashboard".to_string(),
            max_retries: 3,
            retry_base_delay_ms: 1000,
            loading_delay_ms: 100,
            transition_delay_ms: 150,
            connectivity_poll_ms: 5000,
            error_history_limit: 50,
            max_history: 50,
            preload_paths: vec!["/dashboard".to_string(), "/scanner".to_string()],
            slow_load_warn_ms: 1000,
            app_title: "GoldRadar".to_string(),
        }
    }
}

impl RouterConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default route
    pub fn with_default_route(mut self, route: impl Into<String>) -> Self {
        self.default_route = route.into();
        self
    }

    /// Set the fallback route
    pub fn with_fallback_route(mut self, route: impl Into<String>) -> Self {
        self.fallback_route = route.into();
        self
    }

    /// Set the retry ceiling
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base retry delay in milliseconds
    pub fn with_retry_base_delay_ms(mut self, delay_ms: u64) -> Self {
        self.retry_base_delay_ms = delay_ms;
        self
    }

    /// Set the fade-out delay in milliseconds
    pub fn with_transition_delay_ms(mut self, delay_ms: u64) -> Self {
        self.transition_delay_ms = delay_ms;
        self
    }

    /// Set the preload set
    pub fn with_preload_paths(mut self, paths: Vec<String>) -> Self {
        self.preload_paths = paths;
        self
    }

    pub fn loading_delay(&self) -> Duration {
        Duration::from_millis(self.loading_delay_ms)
    }

    pub fn transition_delay(&self) -> Duration {
        Duration::from_millis(self.transition_delay_ms)
    }

    pub fn connectivity_poll_interval(&self) -> Duration {
        Duration::from_millis(self.connectivity_poll_ms)
    }

    /// Backoff delay before retry number `attempt` (1-based)
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.retry_base_delay_ms.saturating_mul(1u64 << exponent))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("default_route", &self.default_route),
            ("fallback_route", &self.fallback_route),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: value.clone(),
                });
            }
        }

        if self.connectivity_poll_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "connectivity_poll_ms".to_string(),
                value: "0".to_string(),
            });
        }

        if self.error_history_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "error_history_limit".to_string(),
                value: "0".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RouterConfig::default();
        assert_eq!(config.default_route, "/dashboard");
        assert_eq!(config.fallback_route, "/dashboard");
        assert_eq!(config.max_retries, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_retry_delay_doubles() {
        let config = RouterConfig::default().with_retry_base_delay_ms(1000);
        assert_eq!(config.retry_delay(1), Duration::from_millis(1000));
        assert_eq!(config.retry_delay(2), Duration::from_millis(2000));
        assert_eq!(config.retry_delay(3), Duration::from_millis(4000));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RouterConfig =
            serde_json::from_str(r#"{"max_retries": 5, "default_route": "/home"}"#).unwrap();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.default_route, "/home");
        assert_eq!(config.fallback_route, "/dashboard");
        assert_eq!(config.transition_delay_ms, 150);
    }

    #[test]
    fn test_validate_rejects_empty_fallback() {
        let config = RouterConfig::default().with_fallback_route("  ");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("fallback_route"));
    }
}
