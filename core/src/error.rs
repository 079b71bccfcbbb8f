//! Error types and handling for GoldRadar Core

use thiserror::Error;

/// Result type alias for GoldRadar operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type produced by page lifecycle hooks and page factories.
///
/// Pages are external collaborators, so any error type is accepted here and
/// classified by the router at its boundary.
pub type PageError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for page lifecycle hooks
pub type PageResult<T> = std::result::Result<T, PageError>;

/// Main error type for GoldRadar Core
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Router errors
    #[error("Router error: {0}")]
    Router(#[from] RouterError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Generic(String),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for field '{field}': {value}")]
    InvalidValue { field: String, value: String },
}

/// Lifecycle stage a page failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStage {
    Render,
    Init,
    Reinit,
}

impl LifecycleStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleStage::Render => "render",
            LifecycleStage::Init => "init",
            LifecycleStage::Reinit => "reinit",
        }
    }
}

impl std::fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while resolving or transitioning between routes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("Route '{0}' not found")]
    RouteNotFound(String),

    #[error("Failed to construct page for '{route}': {message}")]
    PageConstruction { route: String, message: String },

    #[error("Page '{route}' failed during {stage}: {message}")]
    PageLifecycle {
        route: String,
        stage: LifecycleStage,
        message: String,
    },

    #[error("Failed to destroy page '{route}': {message}")]
    Destroy { route: String, message: String },

    #[error("Navigation to '{0}' failed while offline")]
    Offline(String),

    #[error("Navigation to '{0}' was superseded by a newer navigation")]
    Superseded(String),

    #[error("No history entry to move to")]
    NoHistory,
}

impl RouterError {
    /// Route path the error refers to, if any
    pub fn route(&self) -> Option<&str> {
        match self {
            RouterError::RouteNotFound(route)
            | RouterError::Offline(route)
            | RouterError::Superseded(route) => Some(route),
            RouterError::PageConstruction { route, .. }
            | RouterError::PageLifecycle { route, .. }
            | RouterError::Destroy { route, .. } => Some(route),
            RouterError::NoHistory => None,
        }
    }

    /// Short machine-friendly error kind, used by telemetry
    pub fn kind(&self) -> &'static str {
        match self {
            RouterError::RouteNotFound(_) => "route_not_found",
            RouterError::PageConstruction { .. } => "page_construction",
            RouterError::PageLifecycle { .. } => "page_lifecycle",
            RouterError::Destroy { .. } => "destroy",
            RouterError::Offline(_) => "offline",
            RouterError::Superseded(_) => "superseded",
            RouterError::NoHistory => "no_history",
        }
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Generic(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Generic(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_error_messages() {
        let error = RouterError::RouteNotFound("/missing".to_string());
        assert_eq!(error.to_string(), "Route '/missing' not found");

        let error = RouterError::PageLifecycle {
            route: "/scanner".to_string(),
            stage: LifecycleStage::Init,
            message: "feed down".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Page '/scanner' failed during init: feed down"
        );
        assert_eq!(error.route(), Some("/scanner"));
        assert_eq!(error.kind(), "page_lifecycle");

        assert_eq!(RouterError::NoHistory.route(), None);
    }

    #[test]
    fn test_error_conversions() {
        let error: Error = RouterError::Offline("/alerts".to_string()).into();
        assert_eq!(
            error.to_string(),
            "Router error: Navigation to '/alerts' failed while offline"
        );

        let error: Error = "boom".into();
        assert!(matches!(error, Error::Generic(_)));
    }
}
