//! Lightweight analytics fed by router events
//!
//! Tracks page views with their load times, navigation errors and
//! connectivity changes in a bounded buffer that can be flushed as JSON lines.

use crate::error::Result;
use crate::router::{Router, RouterEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Default number of buffered events
pub const DEFAULT_MAX_EVENTS: usize = 500;

/// A recorded analytics event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    PageView {
        session: Uuid,
        route: String,
        load_time_ms: f64,
        ts: DateTime<Utc>,
    },
    Error {
        session: Uuid,
        route: String,
        kind: String,
        message: String,
        ts: DateTime<Utc>,
    },
    Connectivity {
        session: Uuid,
        online: bool,
        ts: DateTime<Utc>,
    },
}

/// Analytics recorder
#[derive(Debug)]
pub struct Analytics {
    session: Uuid,
    events: Mutex<VecDeque<AnalyticsEvent>>,
    max_events: usize,
}

impl Analytics {
    pub fn new(max_events: usize) -> Self {
        Self {
            session: Uuid::new_v4(),
            events: Mutex::new(VecDeque::new()),
            max_events: max_events.max(1),
        }
    }

    pub fn session(&self) -> Uuid {
        self.session
    }

    pub fn track_page_view(&self, route: &str, load_time: Duration) {
        self.push(AnalyticsEvent::PageView {
            session: self.session,
            route: route.to_string(),
            load_time_ms: load_time.as_secs_f64() * 1000.0,
            ts: Utc::now(),
        });
    }

    pub fn track_error(&self, route: &str, kind: &str, message: &str) {
        self.push(AnalyticsEvent::Error {
            session: self.session,
            route: route.to_string(),
            kind: kind.to_string(),
            message: message.to_string(),
            ts: Utc::now(),
        });
    }

    pub fn track_connectivity(&self, online: bool) {
        self.push(AnalyticsEvent::Connectivity {
            session: self.session,
            online,
            ts: Utc::now(),
        });
    }

    /// Record a router event; events without analytics value are ignored
    pub fn observe(&self, event: &RouterEvent) {
        match event {
            RouterEvent::RouteLoaded {
                route, load_time, ..
            } => self.track_page_view(route.as_str(), *load_time),
            RouterEvent::NavigationFailed { route, error } => {
                self.track_error(route.as_str(), error.kind(), &error.to_string())
            }
            RouterEvent::ConnectivityChanged { online } => self.track_connectivity(*online),
            RouterEvent::RouteChanged { .. } => {}
        }
    }

    /// Follow a router's events until the task is aborted
    pub fn attach(self: &Arc<Self>, router: &Router) -> JoinHandle<()> {
        let analytics = Arc::clone(self);
        let mut receiver = router.subscribe();
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => analytics.observe(&event),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Analytics dropped {} router events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    /// Buffered events, oldest first
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.lock().iter().cloned().collect()
    }

    /// Take all buffered events
    pub fn flush(&self) -> Vec<AnalyticsEvent> {
        self.lock().drain(..).collect()
    }

    /// Append all buffered events to `path` as JSON lines
    pub async fn flush_to(&self, path: impl AsRef<Path>) -> Result<usize> {
        let events = self.flush();
        if events.is_empty() {
            return Ok(0);
        }

        if let Err(e) = append_json_lines(path.as_ref(), &events).await {
            warn!(
                "Failed to write analytics to {}, keeping {} events",
                path.as_ref().display(),
                events.len()
            );
            self.restore(events);
            return Err(e);
        }

        debug!(
            "Flushed {} analytics events to {}",
            events.len(),
            path.as_ref().display()
        );
        Ok(events.len())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<AnalyticsEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Put unwritten events back in front of anything recorded since
    fn restore(&self, unwritten: Vec<AnalyticsEvent>) {
        let mut events = self.lock();
        for event in unwritten.into_iter().rev() {
            if events.len() == self.max_events {
                break;
            }
            events.push_front(event);
        }
    }

    fn push(&self, event: AnalyticsEvent) {
        let mut events = self.lock();
        if events.len() == self.max_events {
            events.pop_front();
        }
        events.push_back(event);
    }
}

async fn append_json_lines(path: &Path, events: &[AnalyticsEvent]) -> Result<()> {
    let mut payload = String::new();
    for event in events {
        payload.push_str(&serde_json::to_string(event)?);
        payload.push('\n');
    }

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(payload.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

impl Default for Analytics {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_EVENTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouterError;
    use tempfile::tempdir;

    #[test]
    fn test_buffer_is_bounded() {
        let analytics = Analytics::new(2);
        analytics.track_page_view("/dashboard", Duration::from_millis(10));
        analytics.track_page_view("/scanner", Duration::from_millis(20));
        analytics.track_connectivity(false);

        let events = analytics.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], AnalyticsEvent::PageView { ref route, .. } if route == "/scanner"));
        assert!(matches!(events[1], AnalyticsEvent::Connectivity { online: false, .. }));
    }

    #[test]
    fn test_observe_navigation_failure() {
        let analytics = Analytics::default();
        analytics.observe(&RouterEvent::NavigationFailed {
            route: "/alerts".into(),
            error: RouterError::RouteNotFound("/alerts".to_string()),
        });

        match &analytics.events()[0] {
            AnalyticsEvent::Error { route, kind, .. } => {
                assert_eq!(route, "/alerts");
                assert_eq!(kind, "route_not_found");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_flush_to_writes_json_lines() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("analytics.jsonl");

        let analytics = Analytics::default();
        analytics.track_page_view("/backtest", Duration::from_millis(42));
        analytics.track_connectivity(true);

        assert_eq!(analytics.flush_to(&path).await.unwrap(), 2);
        assert!(analytics.events().is_empty());
        assert_eq!(analytics.flush_to(&path).await.unwrap(), 0);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "page_view");
        assert_eq!(first["route"], "/backtest");
    }

    #[tokio::test]
    async fn test_failed_flush_keeps_events() {
        let temp_dir = tempdir().unwrap();

        let analytics = Analytics::default();
        analytics.track_page_view("/alerts", Duration::from_millis(12));
        analytics.track_connectivity(false);

        // A directory cannot be opened for appending
        assert!(analytics.flush_to(temp_dir.path()).await.is_err());
        let events = analytics.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], AnalyticsEvent::PageView { ref route, .. } if route == "/alerts"));

        let path = temp_dir.path().join("analytics.jsonl");
        assert_eq!(analytics.flush_to(&path).await.unwrap(), 2);
        assert!(analytics.events().is_empty());
    }
}
