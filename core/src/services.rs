//! Environment services consumed by the router
//!
//! The host application supplies these: a page container, a loading
//! indicator and a connectivity signal. In-memory implementations are
//! provided for headless hosts and tests.

use crate::page::PageContent;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Inline error block shown when a navigation fails terminally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorPanel {
    /// Route that failed
    pub route: String,
    /// Human-readable failure description
    pub message: String,
    /// Route restarted by the panel's manual "Retry" action
    pub retry_route: String,
}

/// The single page-content container plus the chrome around it
pub trait Viewport: Send + Sync {
    /// Replace the container's content entirely
    fn install(&self, content: &PageContent);

    /// Update the document title
    fn set_title(&self, title: &str);

    /// Highlight the active entry in the navigation bar
    fn set_active_route(&self, route: &str);

    /// Render a static error block with a manual retry control
    fn show_error(&self, panel: &ErrorPanel);
}

/// Global loading indicator service
pub trait LoadingIndicator: Send + Sync {
    fn show(&self, text: &str, with_progress: bool);

    /// Update progress, 0-100
    fn update_progress(&self, percent: u8, text: &str);

    fn hide(&self);
}

/// Online/offline signal of the host
pub trait ConnectivitySignal: Send + Sync {
    fn is_online(&self) -> bool;
}

/// Connectivity signal switched by hand
#[derive(Debug)]
pub struct ManualConnectivity {
    online: AtomicBool,
}

impl ManualConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }
}

impl Default for ManualConnectivity {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConnectivitySignal for ManualConnectivity {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}

/// Loading indicator that does nothing
#[derive(Debug, Default)]
pub struct NoopLoadingIndicator;

impl LoadingIndicator for NoopLoadingIndicator {
    fn show(&self, _text: &str, _with_progress: bool) {}

    fn update_progress(&self, _percent: u8, _text: &str) {}

    fn hide(&self) {}
}

/// Calls recorded by [`RecordingLoadingIndicator`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadingCall {
    Show { text: String, with_progress: bool },
    Progress { percent: u8, text: String },
    Hide,
}

/// Loading indicator that records every call
#[derive(Debug, Default)]
pub struct RecordingLoadingIndicator {
    calls: Mutex<Vec<LoadingCall>>,
}

impl RecordingLoadingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<LoadingCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn push(&self, call: LoadingCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl LoadingIndicator for RecordingLoadingIndicator {
    fn show(&self, text: &str, with_progress: bool) {
        self.push(LoadingCall::Show {
            text: text.to_string(),
            with_progress,
        });
    }

    fn update_progress(&self, percent: u8, text: &str) {
        self.push(LoadingCall::Progress {
            percent,
            text: text.to_string(),
        });
    }

    fn hide(&self) {
        self.push(LoadingCall::Hide);
    }
}

#[derive(Debug, Default)]
struct MemoryViewportState {
    content: Option<PageContent>,
    title: Option<String>,
    active_route: Option<String>,
    error: Option<ErrorPanel>,
    installs: usize,
}

/// Viewport that keeps the installed content in memory
#[derive(Debug, Default)]
pub struct MemoryViewport {
    state: Mutex<MemoryViewportState>,
}

impl MemoryViewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently installed content
    pub fn content(&self) -> Option<PageContent> {
        self.state.lock().ok().and_then(|s| s.content.clone())
    }

    pub fn title(&self) -> Option<String> {
        self.state.lock().ok().and_then(|s| s.title.clone())
    }

    pub fn active_route(&self) -> Option<String> {
        self.state.lock().ok().and_then(|s| s.active_route.clone())
    }

    /// Error panel currently shown, if any
    pub fn error(&self) -> Option<ErrorPanel> {
        self.state.lock().ok().and_then(|s| s.error.clone())
    }

    /// Number of times content was installed
    pub fn install_count(&self) -> usize {
        self.state.lock().map(|s| s.installs).unwrap_or_default()
    }
}

impl Viewport for MemoryViewport {
    fn install(&self, content: &PageContent) {
        if let Ok(mut state) = self.state.lock() {
            state.content = Some(content.clone());
            state.error = None;
            state.installs += 1;
        }
    }

    fn set_title(&self, title: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.title = Some(title.to_string());
        }
    }

    fn set_active_route(&self, route: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.active_route = Some(route.to_string());
        }
    }

    fn show_error(&self, panel: &ErrorPanel) {
        if let Ok(mut state) = self.state.lock() {
            state.content = None;
            state.error = Some(panel.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_connectivity() {
        let signal = ManualConnectivity::default();
        assert!(signal.is_online());
        signal.set_online(false);
        assert!(!signal.is_online());
    }

    #[test]
    fn test_memory_viewport_error_replaces_content() {
        let viewport = MemoryViewport::new();
        viewport.install(&PageContent::from("<p>alerts</p>"));
        assert_eq!(viewport.install_count(), 1);

        viewport.show_error(&ErrorPanel {
            route: "/alerts".to_string(),
            message: "boom".to_string(),
            retry_route: "/alerts".to_string(),
        });
        assert!(viewport.content().is_none());
        assert_eq!(viewport.error().unwrap().retry_route, "/alerts");

        viewport.install(&PageContent::from("<p>alerts</p>"));
        assert!(viewport.error().is_none());
    }

    #[test]
    fn test_recording_loading_indicator() {
        let indicator = RecordingLoadingIndicator::new();
        indicator.show("Loading...", true);
        indicator.update_progress(50, "Rendering");
        indicator.hide();
        assert_eq!(
            indicator.calls(),
            vec![
                LoadingCall::Show {
                    text: "Loading...".to_string(),
                    with_progress: true
                },
                LoadingCall::Progress {
                    percent: 50,
                    text: "Rendering".to_string()
                },
                LoadingCall::Hide,
            ]
        );
    }
}
