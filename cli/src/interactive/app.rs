//! Interactive dashboard application
//!
//! Owns the router together with the services it drives: the terminal
//! viewport, the loading bar, the simulated connectivity switch and the market
//! feed shared by every page.

use super::components::StatusLineContext;
use super::loading::ProgressLoadingIndicator;
use super::pages::{register_pages, MarketFeed};
use super::terminal_output::{OutputHandle, TerminalViewport};
use anyhow::Result;
use goldradar_core::analytics::DEFAULT_MAX_EVENTS;
use goldradar_core::{
    Analytics, ManualConnectivity, NavigationOutcome, Router, RouterBuilder, RouterConfig,
    RouterEvent, RouterServices, TransitionPhase,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub struct App<O: OutputHandle + 'static> {
    router: Router,
    viewport: Arc<TerminalViewport<O>>,
    connectivity: Arc<ManualConnectivity>,
    analytics: Arc<Analytics>,
    analytics_file: Option<PathBuf>,
    /// Set while the REPL drives the router and repaints by itself
    busy: Arc<AtomicBool>,
    tasks: Vec<JoinHandle<()>>,
}

impl<O: OutputHandle + 'static> App<O> {
    pub fn new(
        config: RouterConfig,
        viewport: TerminalViewport<O>,
        loading: Arc<ProgressLoadingIndicator>,
    ) -> Result<Self> {
        let connectivity = Arc::new(ManualConnectivity::default());
        let feed = Arc::new(MarketFeed::new(connectivity.clone()));
        let viewport = Arc::new(viewport);

        let services = RouterServices::new(viewport.clone())
            .with_loading(loading)
            .with_connectivity(connectivity.clone());
        let router = register_pages(RouterBuilder::new(config), &feed).build(services)?;

        viewport.set_routes(
            router
                .routes()
                .into_iter()
                .map(|route| (route.id.to_string(), route.title))
                .collect(),
        );

        Ok(Self {
            router,
            viewport,
            connectivity,
            analytics: Arc::new(Analytics::new(DEFAULT_MAX_EVENTS)),
            analytics_file: None,
            busy: Arc::new(AtomicBool::new(false)),
            tasks: Vec::new(),
        })
    }

    /// Append analytics events to `path` on shutdown
    pub fn with_analytics_file(mut self, path: Option<PathBuf>) -> Self {
        self.analytics_file = path;
        self
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn viewport(&self) -> &TerminalViewport<O> {
        &self.viewport
    }

    /// Start background services and show the default route
    pub async fn start(&mut self) -> NavigationOutcome {
        self.tasks.push(self.analytics.attach(&self.router));
        self.tasks.push(self.router.spawn_connectivity_monitor());
        self.tasks.push(self.spawn_painter());

        let outcome = self.run_command(|router| async move { router.start().await }).await;
        if let Some(route) = self.router.current_route() {
            info!("GoldRadar started at {}", route);
        }
        outcome
    }

    /// Run a router operation from the REPL and repaint afterwards.
    ///
    /// Navigations started elsewhere are painted by the background painter.
    pub async fn run_command<F, Fut, T>(&self, command: F) -> T
    where
        F: FnOnce(Router) -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        self.busy.store(true, Ordering::SeqCst);
        let result = command(self.router.clone()).await;
        self.repaint().await;
        self.busy.store(false, Ordering::SeqCst);
        result
    }

    /// Flip the simulated network and let the router notice
    pub fn set_online(&self, online: bool) -> Option<bool> {
        self.connectivity.set_online(online);
        self.router.check_connectivity()
    }

    pub async fn repaint(&self) {
        paint(&self.router, &self.viewport).await;
    }

    /// Destroy cached pages, stop background tasks and flush analytics
    pub async fn shutdown(mut self) -> Result<()> {
        self.router.clear_cache().await;
        for task in self.tasks.drain(..) {
            task.abort();
        }

        if let Some(path) = &self.analytics_file {
            let written = self.analytics.flush_to(path).await?;
            info!("Wrote {} analytics events to {}", written, path.display());
        }
        Ok(())
    }

    fn spawn_painter(&self) -> JoinHandle<()> {
        let router = self.router.clone();
        let viewport = self.viewport.clone();
        let busy = self.busy.clone();
        let mut events = router.subscribe();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(RouterEvent::RouteChanged { route, .. }) => {
                        if !busy.load(Ordering::SeqCst) {
                            debug!("Repainting after background navigation to {}", route);
                            paint(&router, &viewport).await;
                        }
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        debug!("Painter skipped {} router events", skipped);
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}

fn status_of(router: &Router) -> StatusLineContext {
    StatusLineContext {
        online: router.is_online(),
        phase: router.phase(),
        metrics: router.performance_metrics(),
    }
}

/// Re-render the current page into the viewport and draw the frame
async fn paint<O: OutputHandle>(router: &Router, viewport: &TerminalViewport<O>) {
    // A failed navigation keeps its error panel on screen
    if router.phase() != TransitionPhase::Failed {
        if let Some(page) = router.current_page() {
            let rendered = page.lock().await.render();
            match rendered {
                Ok(content) => goldradar_core::Viewport::install(viewport, &content),
                Err(e) => warn!("Failed to render page: {}", e),
            }
        }
    }
    viewport.present(Some(&status_of(router)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactive::terminal_output::BufferHandle;
    use std::time::Duration;

    fn app() -> (App<BufferHandle>, BufferHandle) {
        let out = BufferHandle::default();
        let viewport = TerminalViewport::new(out.clone())
            .with_colors(false)
            .with_width(60);
        let config = RouterConfig::default().with_transition_delay_ms(0);
        let app = App::new(config, viewport, Arc::new(ProgressLoadingIndicator::hidden())).unwrap();
        (app, out)
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_paints_dashboard() {
        let (mut app, out) = app();

        let outcome = app.start().await;
        assert!(outcome.is_ready());
        assert_eq!(app.router().current_route().unwrap().as_str(), "/dashboard");

        let text = out.contents();
        assert!(text.contains("[Dashboard]"));
        assert!(text.contains("Gold Breakout Dashboard"));
        assert!(text.contains("● online"));
        app.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_offline_failure_recovers_when_back_online() {
        let (mut app, _out) = app();
        app.start().await;

        assert_eq!(app.set_online(false), Some(false));
        let outcome = app
            .run_command(|router| async move { router.navigate("/alerts").await })
            .await;
        assert!(matches!(outcome, NavigationOutcome::Failed(_)));
        assert!(app.viewport().last_error().is_some());

        assert_eq!(app.set_online(true), Some(true));
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(app.router().phase(), TransitionPhase::Ready);
        assert!(app.viewport().last_error().is_none());
        app.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_flushes_analytics() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analytics.jsonl");
        let (app, _out) = app();
        let mut app = app.with_analytics_file(Some(path.clone()));

        app.start().await;
        app.run_command(|router| async move { router.navigate("/about").await })
            .await;
        // Let the analytics task drain the event channel
        tokio::time::sleep(Duration::from_millis(10)).await;
        app.shutdown().await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.lines().count() >= 2);
        assert!(written.contains("\"type\":\"page_view\""));
        assert!(written.contains("/about"));
    }
}
