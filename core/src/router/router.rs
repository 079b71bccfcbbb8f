//! Router implementation for managing navigation state
//!
//! This module provides the core router functionality: route registration,
//! the transition state machine, page caching and retry with backoff.

use super::events::{EventBus, RouterEvent};
use super::history::PathHistory;
use super::loading::DeferredLoading;
use super::route::{Route, RouteId, RouteOptions};
use super::state::{NavigationState, TransitionPhase};
use crate::config::RouterConfig;
use crate::error::{LifecycleStage, PageError, Result, RouterError};
use crate::metrics::{ErrorRecord, MetricsRecorder, PerformanceMetrics};
use crate::page::{PageFactory, PageHandle};
use crate::services::{
    ConnectivitySignal, ErrorPanel, LoadingIndicator, ManualConnectivity, NoopLoadingIndicator,
    Viewport,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

const EVENT_CAPACITY: usize = 64;

/// Host services the router drives
#[derive(Clone)]
pub struct RouterServices {
    pub viewport: Arc<dyn Viewport>,
    pub loading: Arc<dyn LoadingIndicator>,
    pub connectivity: Arc<dyn ConnectivitySignal>,
}

impl RouterServices {
    /// Services with a silent loading indicator and an always-online signal
    pub fn new(viewport: Arc<dyn Viewport>) -> Self {
        Self {
            viewport,
            loading: Arc::new(NoopLoadingIndicator),
            connectivity: Arc::new(ManualConnectivity::default()),
        }
    }

    pub fn with_loading(mut self, loading: Arc<dyn LoadingIndicator>) -> Self {
        self.loading = loading;
        self
    }

    pub fn with_connectivity(mut self, connectivity: Arc<dyn ConnectivitySignal>) -> Self {
        self.connectivity = connectivity;
        self
    }
}

/// Result of one navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// The route reached the ready state
    Ready {
        route: RouteId,
        /// Originally requested route when a redirect to the fallback happened
        redirected_from: Option<RouteId>,
    },
    /// The requested route is already displayed
    Unchanged(RouteId),
    /// Navigation failed terminally; an error panel is displayed
    Failed(RouterError),
    /// A newer navigation took over before this one completed
    Superseded(RouteId),
}

impl NavigationOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(self, NavigationOutcome::Ready { .. })
    }
}

/// Mutable router state; never held across an await point
struct RouterState {
    routes: HashMap<RouteId, Route>,
    cache: HashMap<RouteId, PageHandle>,
    /// Cached instances constructed by preload and not yet initialized
    preloaded: HashSet<RouteId>,
    navigation: NavigationState,
    history: PathHistory,
    metrics: MetricsRecorder,
    online: bool,
}

struct RouterInner {
    config: RouterConfig,
    services: RouterServices,
    state: Mutex<RouterState>,
    events: EventBus,
}

/// What to do after a failed transition attempt
enum FailureAction {
    Retry(Duration),
    Fail,
    Superseded,
}

/// Page router with lifecycle management, caching and retry.
///
/// Cloning yields another handle to the same router.
#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

impl Router {
    /// Create a new router with the given configuration and host services
    pub fn new(config: RouterConfig, services: RouterServices) -> Result<Self> {
        config.validate()?;

        let online = services.connectivity.is_online();
        let state = RouterState {
            routes: HashMap::new(),
            cache: HashMap::new(),
            preloaded: HashSet::new(),
            navigation: NavigationState::default(),
            history: PathHistory::new(config.max_history),
            metrics: MetricsRecorder::new(config.error_history_limit),
            online,
        };

        Ok(Self {
            inner: Arc::new(RouterInner {
                config,
                services,
                state: Mutex::new(state),
                events: EventBus::new(EVENT_CAPACITY),
            }),
        })
    }

    fn state(&self) -> MutexGuard<'_, RouterState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Router configuration
    pub fn config(&self) -> &RouterConfig {
        &self.inner.config
    }

    /// Register a route; registering an existing path replaces its definition
    pub fn register(
        &self,
        path: impl Into<RouteId>,
        factory: Arc<dyn PageFactory>,
        title: impl Into<String>,
        options: RouteOptions,
    ) {
        let route = Route::new(path, factory, title).with_options(options);
        let mut state = self.state();
        if state.routes.contains_key(&route.id) {
            debug!("Replacing route definition for {}", route.id);
        }
        state.routes.insert(route.id.clone(), route);
    }

    /// Registered routes, sorted by path
    pub fn routes(&self) -> Vec<Route> {
        let mut routes: Vec<Route> = self.state().routes.values().cloned().collect();
        routes.sort_by(|a, b| a.id.cmp(&b.id));
        routes
    }

    /// Subscribe to router events
    pub fn subscribe(&self) -> broadcast::Receiver<RouterEvent> {
        self.inner.events.subscribe()
    }

    /// Route of the current page
    pub fn current_route(&self) -> Option<RouteId> {
        self.state().navigation.current_route.clone()
    }

    /// Current page instance
    pub fn current_page(&self) -> Option<PageHandle> {
        self.state().navigation.current_page.clone()
    }

    /// Phase of the latest navigation
    pub fn phase(&self) -> TransitionPhase {
        self.state().navigation.phase
    }

    /// Last known connectivity
    pub fn is_online(&self) -> bool {
        self.state().online
    }

    /// Retry count of a route, if registered
    pub fn retry_count(&self, path: impl Into<RouteId>) -> Option<u32> {
        let id = path.into();
        self.state().routes.get(&id).map(|route| route.retry.count)
    }

    /// Whether a page instance for the route is cached
    pub fn is_cached(&self, path: impl Into<RouteId>) -> bool {
        let id = path.into();
        self.state().cache.contains_key(&id)
    }

    pub fn performance_metrics(&self) -> PerformanceMetrics {
        self.state().metrics.snapshot()
    }

    /// Latest load time of a route
    pub fn load_time(&self, path: impl Into<RouteId>) -> Option<Duration> {
        let id = path.into();
        self.state().metrics.load_time(id.as_str())
    }

    /// Recent navigation errors, oldest first
    pub fn error_history(&self) -> Vec<ErrorRecord> {
        self.state().metrics.error_history()
    }

    pub fn can_go_back(&self) -> bool {
        self.state().history.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.state().history.can_go_forward()
    }

    /// Eagerly construct preloadable routes from the preload set
    pub fn preload(&self) {
        let candidates: Vec<Route> = {
            let state = self.state();
            self.inner
                .config
                .preload_paths
                .iter()
                .map(RouteId::new)
                .filter_map(|id| state.routes.get(&id))
                .filter(|route| route.options.preload && route.options.cache)
                .filter(|route| !state.cache.contains_key(&route.id))
                .cloned()
                .collect()
        };

        for route in candidates {
            match route.factory.create() {
                Ok(instance) => {
                    debug!("Preloaded page {}", route.id);
                    let mut state = self.state();
                    if !state.cache.contains_key(&route.id) {
                        state.cache.insert(route.id.clone(), PageHandle::new(instance));
                        state.preloaded.insert(route.id.clone());
                    }
                }
                Err(e) => warn!("Failed to preload page {}: {}", route.id, e),
            }
        }
    }

    /// Preload pages and navigate to the default route
    pub async fn start(&self) -> NavigationOutcome {
        self.preload();
        self.navigate("/").await
    }

    /// Navigate to a path.
    ///
    /// Resolves once the navigation reached a terminal state: ready, failed,
    /// or superseded by a newer navigation.
    pub async fn navigate(&self, path: impl Into<RouteId>) -> NavigationOutcome {
        let target = self.resolve_path(path.into());
        {
            let mut state = self.state();
            if state.navigation.is_ready_at(&target) {
                debug!("Already at {}, ignoring navigation", target);
                return NavigationOutcome::Unchanged(target);
            }
            state.history.push(target.clone());

            let max_retries = self.inner.config.max_retries;
            if let Some(route) = state.routes.get_mut(&target) {
                if !route.retry.can_retry(max_retries) {
                    route.retry.reset();
                }
            }
        }
        self.run(target).await
    }

    /// Fire-and-forget navigation
    pub fn navigate_detached(&self, path: impl Into<RouteId>) -> JoinHandle<NavigationOutcome> {
        let router = self.clone();
        let path = path.into();
        tokio::spawn(async move { router.navigate(path).await })
    }

    /// Re-run the transition for the current route, or for the latest
    /// target when no page is current
    pub async fn refresh(&self) -> NavigationOutcome {
        let target = {
            let state = self.state();
            state
                .navigation
                .current_route
                .clone()
                .or_else(|| state.navigation.target.clone())
        };
        let target = target.unwrap_or_else(|| self.resolve_path(RouteId::new("/")));
        self.run(target).await
    }

    /// Manual retry: restart the full transition with a fresh retry budget
    pub async fn retry(&self, path: impl Into<RouteId>) -> NavigationOutcome {
        let target = self.resolve_path(path.into());
        {
            let mut state = self.state();
            if let Some(route) = state.routes.get_mut(&target) {
                route.retry.reset();
            }
            state.history.push(target.clone());
        }
        self.run(target).await
    }

    /// Navigate to the previous history entry
    pub async fn go_back(&self) -> std::result::Result<NavigationOutcome, RouterError> {
        let target = self.state().history.go_back().ok_or(RouterError::NoHistory)?;
        Ok(self.run_unless_ready(target).await)
    }

    /// Navigate to the next history entry
    pub async fn go_forward(&self) -> std::result::Result<NavigationOutcome, RouterError> {
        let target = self
            .state()
            .history
            .go_forward()
            .ok_or(RouterError::NoHistory)?;
        Ok(self.run_unless_ready(target).await)
    }

    /// Destroy every cached page and empty the cache
    pub async fn clear_cache(&self) {
        let evicted: Vec<(RouteId, PageHandle)> = {
            let mut state = self.state();
            let state = &mut *state;
            let current_is_cached = state
                .navigation
                .current_page
                .as_ref()
                .is_some_and(|current| state.cache.values().any(|page| page.ptr_eq(current)));
            if current_is_cached {
                state.navigation.detach_current();
            }
            state.preloaded.clear();
            state.cache.drain().collect()
        };

        info!("Clearing page cache ({} pages)", evicted.len());
        futures::future::join_all(
            evicted
                .iter()
                .map(|(route, page)| self.destroy_page(route, page)),
        )
        .await;
    }

    /// Navigation used by the connectivity sweep; keeps the retry record
    pub(super) async fn navigate_queued(&self, target: RouteId) -> NavigationOutcome {
        self.state().history.push(target.clone());
        self.run(target).await
    }

    pub(super) fn services_connectivity_online(&self) -> bool {
        self.inner.services.connectivity.is_online()
    }

    pub(super) fn set_online(&self, online: bool) -> bool {
        let mut state = self.state();
        let changed = state.online != online;
        state.online = online;
        changed
    }

    /// Routes waiting for a connectivity-triggered retry with their backoff,
    /// shortest delay first
    pub(super) fn pending_retries(&self) -> Vec<(RouteId, Duration)> {
        let max_retries = self.inner.config.max_retries;
        let state = self.state();
        let mut pending: Vec<(RouteId, Duration)> = state
            .routes
            .values()
            .filter(|route| route.retry.is_pending(max_retries))
            .map(|route| {
                (
                    route.id.clone(),
                    self.inner.config.retry_delay(route.retry.count),
                )
            })
            .collect();
        pending.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        pending
    }

    pub(super) fn emit(&self, event: RouterEvent) {
        self.inner.events.emit(event);
    }

    fn resolve_path(&self, path: RouteId) -> RouteId {
        if path.is_root() {
            RouteId::new(&self.inner.config.default_route)
        } else {
            path
        }
    }

    fn is_stale(&self, generation: u64) -> bool {
        !self.state().navigation.is_current(generation)
    }

    async fn run_unless_ready(&self, target: RouteId) -> NavigationOutcome {
        if self.state().navigation.is_ready_at(&target) {
            debug!("Already at {}, ignoring history move", target);
            return NavigationOutcome::Unchanged(target);
        }
        self.run(target).await
    }

    async fn run(&self, target: RouteId) -> NavigationOutcome {
        let generation = self.state().navigation.begin();
        self.handle_route(target, generation).await
    }

    async fn handle_route(&self, requested: RouteId, generation: u64) -> NavigationOutcome {
        let fallback = RouteId::new(&self.inner.config.fallback_route);
        let mut target = requested;
        let mut redirected_from: Option<RouteId> = None;

        loop {
            if self.is_stale(generation) {
                return NavigationOutcome::Superseded(target);
            }

            let route = self.state().routes.get(&target).cloned();
            let Some(route) = route else {
                let error = RouterError::RouteNotFound(target.to_string());
                warn!("Route not found: {}", target);
                self.record_error(&target, &error, 0);

                if target == fallback {
                    self.fail_in_place(&target, &error, generation);
                    return NavigationOutcome::Failed(error);
                }
                redirected_from.get_or_insert_with(|| target.clone());
                target = self.redirect(&fallback);
                continue;
            };

            let error = match self.transition(&route, generation).await {
                Ok(()) => {
                    return NavigationOutcome::Ready {
                        route: target,
                        redirected_from,
                    }
                }
                Err(RouterError::Superseded(_)) => return NavigationOutcome::Superseded(target),
                Err(error) => error,
            };

            match self.after_failure(&target, &error, generation) {
                FailureAction::Retry(delay) => {
                    info!(
                        "Retrying {} in {}ms",
                        target,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                }
                FailureAction::Superseded => return NavigationOutcome::Superseded(target),
                FailureAction::Fail if target != fallback => {
                    warn!("Giving up on {}, redirecting to {}", target, fallback);
                    redirected_from.get_or_insert_with(|| target.clone());
                    target = self.redirect(&fallback);
                }
                FailureAction::Fail => {
                    self.fail_in_place(&target, &error, generation);
                    return NavigationOutcome::Failed(error);
                }
            }
        }
    }

    /// One pass through the transition state machine for `route`
    async fn transition(
        &self,
        route: &Route,
        generation: u64,
    ) -> std::result::Result<(), RouterError> {
        let path = route.id.clone();
        let started = Instant::now();

        {
            let mut state = self.state();
            if !state.navigation.is_current(generation) {
                return Err(RouterError::Superseded(path.to_string()));
            }
            state.metrics.record_navigation();
            state.navigation.target = Some(path.clone());
            state.navigation.phase = TransitionPhase::Loading;
        }

        let loading = DeferredLoading::arm(
            self.inner.services.loading.clone(),
            self.inner.config.loading_delay(),
            format!("Loading {}...", display_title(route)),
        );

        // Tear down the current page before building the next one
        let previous = {
            let mut state = self.state();
            if !state.navigation.is_current(generation) {
                return Err(RouterError::Superseded(path.to_string()));
            }
            state.navigation.detach_current()
        };
        if let Some((previous_route, page)) = previous {
            let previous_route = previous_route.unwrap_or_else(|| path.clone());
            self.destroy_page(&previous_route, &page).await;
        }

        let (page, cache_hit) = self.resolve_page(route, generation)?;
        loading.progress(30, "Preparing page");

        let result = self.mount(route, &page, cache_hit, generation, &loading).await;
        if let Err(error) = result {
            if !matches!(error, RouterError::Superseded(_)) {
                self.evict_failed(&path, &page).await;
            }
            return Err(error);
        }

        let load_time = started.elapsed();
        let adopted = {
            let mut state = self.state();
            if state.navigation.is_current(generation) {
                state.navigation.current_route = Some(path.clone());
                state.navigation.current_page = Some(page.clone());
                state.navigation.phase = TransitionPhase::Ready;
                if let Some(route) = state.routes.get_mut(&path) {
                    route.retry.reset();
                }
                self.inner.services.viewport.set_active_route(path.as_str());
                true
            } else {
                false
            }
        };
        if !adopted {
            self.discard_stale(&path, &page).await;
            return Err(RouterError::Superseded(path.to_string()));
        }
        loading.progress(100, "Ready");

        self.emit(RouterEvent::RouteChanged {
            route: path.clone(),
            page: page.clone(),
        });

        self.state().metrics.record_load(path.as_str(), load_time);
        if load_time.as_millis() > u128::from(self.inner.config.slow_load_warn_ms) {
            warn!(
                "Slow page load detected: {} took {:.2}ms",
                path,
                load_time.as_secs_f64() * 1000.0
            );
        } else {
            debug!(
                "Page {} loaded in {:.2}ms",
                path,
                load_time.as_secs_f64() * 1000.0
            );
        }

        self.emit(RouterEvent::RouteLoaded {
            route: path,
            page,
            load_time,
        });

        Ok(())
    }

    /// Fetch the cached instance or construct a fresh one
    fn resolve_page(
        &self,
        route: &Route,
        generation: u64,
    ) -> std::result::Result<(PageHandle, bool), RouterError> {
        let path = &route.id;
        let cached = if route.options.cache {
            let mut state = self.state();
            let fresh = state.preloaded.remove(path);
            state.cache.get(path).cloned().map(|page| (page, fresh))
        } else {
            None
        };

        // A preloaded instance has never been initialized, so it is not a reuse
        let resolved = match cached {
            Some((page, fresh)) => (page, !fresh),
            None => {
                let instance =
                    route
                        .factory
                        .create()
                        .map_err(|e| RouterError::PageConstruction {
                            route: path.to_string(),
                            message: e.to_string(),
                        })?;
                let page = PageHandle::new(instance);
                if route.options.cache {
                    let mut state = self.state();
                    if !state.navigation.is_current(generation) {
                        return Err(RouterError::Superseded(path.to_string()));
                    }
                    state.cache.insert(path.clone(), page.clone());
                }
                (page, false)
            }
        };

        self.state().metrics.record_resolution(resolved.1);
        Ok(resolved)
    }

    /// Render, install and initialize a resolved page
    async fn mount(
        &self,
        route: &Route,
        page: &PageHandle,
        cache_hit: bool,
        generation: u64,
        loading: &DeferredLoading,
    ) -> std::result::Result<(), RouterError> {
        let path = &route.id;

        let fade = self.inner.config.transition_delay();
        if !fade.is_zero() {
            tokio::time::sleep(fade).await;
        }

        let content = {
            let page = page.lock().await;
            page.render()
        }
        .map_err(|e| lifecycle_error(path, LifecycleStage::Render, e))?;

        {
            let mut state = self.state();
            if !state.navigation.is_current(generation) {
                return Err(RouterError::Superseded(path.to_string()));
            }
            state.navigation.phase = TransitionPhase::Rendering;
            let viewport = &self.inner.services.viewport;
            viewport.install(&content);
            if !route.title.is_empty() {
                viewport.set_title(&format!("{} - {}", self.inner.config.app_title, route.title));
            }
        }
        loading.progress(60, "Initializing page");

        let stage = if cache_hit {
            LifecycleStage::Reinit
        } else {
            LifecycleStage::Init
        };
        let result = {
            let mut page = page.lock().await;
            if cache_hit {
                page.reinit().await
            } else {
                page.init().await
            }
        };
        result.map_err(|e| lifecycle_error(path, stage, e))
    }

    /// Call `destroy` on a page, logging and swallowing failures
    async fn destroy_page(&self, route: &RouteId, page: &PageHandle) {
        let result = page.lock().await.destroy().await;
        if let Err(e) = result {
            let error = RouterError::Destroy {
                route: route.to_string(),
                message: e.to_string(),
            };
            warn!("{}", error);
            self.state().metrics.record_error(&error, 0);
        }
    }

    /// Drop a page whose mount failed from the cache and release it
    async fn evict_failed(&self, route: &RouteId, page: &PageHandle) {
        {
            let mut state = self.state();
            if state.cache.get(route).is_some_and(|cached| cached.ptr_eq(page)) {
                state.cache.remove(route);
                state.preloaded.remove(route);
            }
        }
        self.destroy_page(route, page).await;
    }

    /// Release a page prepared by a navigation that lost to a newer one
    async fn discard_stale(&self, route: &RouteId, page: &PageHandle) {
        let is_current = self
            .state()
            .navigation
            .current_page
            .as_ref()
            .is_some_and(|current| current.ptr_eq(page));
        if !is_current {
            debug!("Discarding stale page for {}", route);
            self.destroy_page(route, page).await;
        }
    }

    fn record_error(&self, route: &RouteId, error: &RouterError, attempt: u32) {
        self.state().metrics.record_error(error, attempt);
        self.emit(RouterEvent::NavigationFailed {
            route: route.clone(),
            error: error.clone(),
        });
    }

    /// Decide between retrying and failing after a failed attempt
    fn after_failure(&self, target: &RouteId, error: &RouterError, generation: u64) -> FailureAction {
        let signal_online = self.inner.services.connectivity.is_online();
        let max_retries = self.inner.config.max_retries;

        let (action, attempt, online, went_offline) = {
            let mut guard = self.state();
            let state = &mut *guard;
            if !state.navigation.is_current(generation) {
                return FailureAction::Superseded;
            }

            // Going offline is observed immediately; coming back online is left
            // to the connectivity check so the retry sweep runs.
            let went_offline = state.online && !signal_online;
            if went_offline {
                state.online = false;
            }
            let online = state.online;

            let Some(route) = state.routes.get_mut(target) else {
                return FailureAction::Fail;
            };
            let attempt = route.retry.count + 1;

            let action = if route.retry.can_retry(max_retries) {
                let delay = self.inner.config.retry_delay(attempt);
                route.retry.record_failure(delay);
                if online {
                    state.metrics.record_retry();
                    state.navigation.phase = TransitionPhase::Retrying;
                    FailureAction::Retry(delay)
                } else {
                    FailureAction::Fail
                }
            } else {
                FailureAction::Fail
            };
            (action, attempt, online, went_offline)
        };

        if went_offline {
            warn!("Connection lost");
            self.emit(RouterEvent::ConnectivityChanged { online: false });
        }

        error!("Error loading page {} (attempt {}): {}", target, attempt, error);
        if online {
            self.record_error(target, error, attempt);
        } else {
            info!("{} queued for retry when connectivity returns", target);
            self.record_error(target, &RouterError::Offline(target.to_string()), attempt);
        }

        action
    }

    /// Point history at the fallback route and return it as the new target
    fn redirect(&self, fallback: &RouteId) -> RouteId {
        self.state().history.replace(fallback.clone());
        fallback.clone()
    }

    /// Terminal failure: render the inline error panel
    fn fail_in_place(&self, target: &RouteId, error: &RouterError, generation: u64) {
        let mut state = self.state();
        if !state.navigation.is_current(generation) {
            return;
        }
        state.navigation.phase = TransitionPhase::Failed;
        error!("Navigation to {} failed: {}", target, error);
        self.inner.services.viewport.show_error(&ErrorPanel {
            route: target.to_string(),
            message: error.to_string(),
            retry_route: target.to_string(),
        });
    }
}

fn display_title(route: &Route) -> &str {
    if route.title.is_empty() {
        route.id.as_str()
    } else {
        &route.title
    }
}

fn lifecycle_error(route: &RouteId, stage: LifecycleStage, error: PageError) -> RouterError {
    RouterError::PageLifecycle {
        route: route.to_string(),
        stage,
        message: error.to_string(),
    }
}

/// Builder for creating a router with its routes
pub struct RouterBuilder {
    config: RouterConfig,
    routes: Vec<(RouteId, Arc<dyn PageFactory>, String, RouteOptions)>,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new(config: RouterConfig) -> Self {
        Self {
            config,
            routes: Vec::new(),
        }
    }

    /// Add a cached route
    pub fn route(
        self,
        path: impl Into<RouteId>,
        title: impl Into<String>,
        factory: Arc<dyn PageFactory>,
    ) -> Self {
        self.route_with(path, title, factory, RouteOptions::default())
    }

    /// Add a route with explicit options
    pub fn route_with(
        mut self,
        path: impl Into<RouteId>,
        title: impl Into<String>,
        factory: Arc<dyn PageFactory>,
        options: RouteOptions,
    ) -> Self {
        self.routes
            .push((path.into(), factory, title.into(), options));
        self
    }

    /// Build the router
    pub fn build(self, services: RouterServices) -> Result<Router> {
        let router = Router::new(self.config, services)?;
        for (path, factory, title, options) in self.routes {
            router.register(path, factory, title, options);
        }
        Ok(router)
    }
}
