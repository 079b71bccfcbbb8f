//! Connectivity-aware retry
//!
//! Mirrors the host's online/offline signal and, when connectivity returns,
//! re-attempts every route with a pending retry.

use super::events::RouterEvent;
use super::router::{NavigationOutcome, Router};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

impl Router {
    /// Poll the connectivity signal once.
    ///
    /// Returns the new state when it changed. Coming back online schedules
    /// retries for every route with a pending retry count.
    pub fn check_connectivity(&self) -> Option<bool> {
        let online = self.services_connectivity_online();
        if !self.set_online(online) {
            return None;
        }

        if online {
            info!("Connection restored");
        } else {
            warn!("Connection lost");
        }
        self.emit(RouterEvent::ConnectivityChanged { online });

        if online {
            self.retry_pending();
        }

        Some(online)
    }

    /// Retry every route whose retry count is above zero and below the
    /// ceiling, one at a time, each no earlier than its backoff delay.
    ///
    /// Returns `None` when nothing is pending. The sweep stops early when a
    /// newer navigation supersedes one of its retries; the remaining routes
    /// stay pending for the next time connectivity returns.
    pub fn retry_pending(&self) -> Option<JoinHandle<Vec<NavigationOutcome>>> {
        let pending = self.pending_retries();
        if pending.is_empty() {
            return None;
        }
        info!("Retrying {} queued route(s)", pending.len());

        let router = self.clone();
        Some(tokio::spawn(async move {
            let started = Instant::now();
            let mut outcomes = Vec::with_capacity(pending.len());
            for (route, delay) in pending {
                debug!("Queued retry for {} in {}ms", route, delay.as_millis());
                tokio::time::sleep_until(started + delay).await;

                let outcome = router.navigate_queued(route).await;
                let superseded = matches!(outcome, NavigationOutcome::Superseded(_));
                outcomes.push(outcome);
                if superseded {
                    debug!("Retry sweep interrupted by a newer navigation");
                    break;
                }
            }
            outcomes
        }))
    }

    /// Spawn the periodic connectivity monitor
    pub fn spawn_connectivity_monitor(&self) -> JoinHandle<()> {
        let router = self.clone();
        let period = self.config().connectivity_poll_interval();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                router.check_connectivity();
            }
        })
    }
}
