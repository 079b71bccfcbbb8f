//! Navigation state tracked by the router

use super::route::RouteId;
use crate::page::PageHandle;

/// Phase of the route transition state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
    #[default]
    Idle,
    Loading,
    Rendering,
    Ready,
    Retrying,
    Failed,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::Idle => "idle",
            TransitionPhase::Loading => "loading",
            TransitionPhase::Rendering => "rendering",
            TransitionPhase::Ready => "ready",
            TransitionPhase::Retrying => "retrying",
            TransitionPhase::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TransitionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current route, current page and the navigation generation token
#[derive(Debug, Default)]
pub struct NavigationState {
    /// Route of the adopted page
    pub current_route: Option<RouteId>,
    /// Adopted page instance
    pub current_page: Option<PageHandle>,
    /// Route the latest transition attempted, adopted or not
    pub target: Option<RouteId>,
    /// Incremented by every navigation request
    pub generation: u64,
    /// Phase of the latest navigation
    pub phase: TransitionPhase,
}

impl NavigationState {
    /// Start a new navigation, invalidating any in-flight one
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Whether `generation` still identifies the latest navigation
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Whether `route` is displayed and fully loaded
    pub fn is_ready_at(&self, route: &RouteId) -> bool {
        self.phase == TransitionPhase::Ready && self.current_route.as_ref() == Some(route)
    }

    /// Forget the current page; the next navigation builds a new one
    pub fn detach_current(&mut self) -> Option<(Option<RouteId>, PageHandle)> {
        let route = self.current_route.take();
        if self.phase == TransitionPhase::Ready {
            self.phase = TransitionPhase::Idle;
        }
        self.current_page.take().map(|page| (route, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_supersedes() {
        let mut state = NavigationState::default();
        let first = state.begin();
        let second = state.begin();
        assert!(!state.is_current(first));
        assert!(state.is_current(second));
    }

    #[test]
    fn test_ready_at() {
        let mut state = NavigationState::default();
        let route = RouteId::from("/scanner");
        assert!(!state.is_ready_at(&route));

        state.current_route = Some(route.clone());
        state.phase = TransitionPhase::Loading;
        assert!(!state.is_ready_at(&route));

        state.phase = TransitionPhase::Ready;
        assert!(state.is_ready_at(&route));
    }

    #[test]
    fn test_detach_current_leaves_idle_state() {
        let mut state = NavigationState::default();
        let route = RouteId::from("/scanner");
        assert!(state.detach_current().is_none());

        state.current_route = Some(route.clone());
        state.phase = TransitionPhase::Ready;
        state.detach_current();
        assert_eq!(state.phase, TransitionPhase::Idle);
        assert!(state.current_route.is_none());
        assert!(!state.is_ready_at(&route));
    }
}
