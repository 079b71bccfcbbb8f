//! Router event broadcasting

use super::route::RouteId;
use crate::error::RouterError;
use crate::page::PageHandle;
use std::time::Duration;
use tokio::sync::broadcast;

/// Events broadcast by the router to external listeners
#[derive(Debug, Clone)]
pub enum RouterEvent {
    /// A route entered the ready state
    RouteChanged { route: RouteId, page: PageHandle },
    /// Load telemetry for a route was recorded
    RouteLoaded {
        route: RouteId,
        page: PageHandle,
        load_time: Duration,
    },
    /// The connectivity signal changed
    ConnectivityChanged { online: bool },
    /// A navigation attempt failed
    NavigationFailed { route: RouteId, error: RouterError },
}

impl RouterEvent {
    /// Event name as seen by listeners
    pub fn name(&self) -> &'static str {
        match self {
            RouterEvent::RouteChanged { .. } => "routeChanged",
            RouterEvent::RouteLoaded { .. } => "routeLoaded",
            RouterEvent::ConnectivityChanged { .. } => "connectivityChanged",
            RouterEvent::NavigationFailed { .. } => "navigationFailed",
        }
    }
}

/// Broadcast channel wrapper; sending without subscribers is not an error
#[derive(Debug, Clone)]
pub(crate) struct EventBus {
    sender: broadcast::Sender<RouterEvent>,
}

impl EventBus {
    pub(crate) fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub(crate) fn emit(&self, event: RouterEvent) {
        let name = event.name();
        if self.sender.send(event).is_err() {
            tracing::trace!("No subscribers for {}", name);
        }
    }

    pub(crate) fn subscribe(&self) -> broadcast::Receiver<RouterEvent> {
        self.sender.subscribe()
    }
}
