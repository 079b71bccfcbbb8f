//! Deferred loading indicator
//!
//! The indicator is only shown when a transition outlives the configured
//! delay, so fast transitions never flicker.

use crate::services::LoadingIndicator;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndicatorState {
    Armed,
    Shown,
    Released,
}

/// Guard arming the loading indicator for one transition attempt.
///
/// Dropping the guard cancels a pending show and hides a visible indicator.
pub(crate) struct DeferredLoading {
    indicator: Arc<dyn LoadingIndicator>,
    state: Arc<Mutex<IndicatorState>>,
    timer: JoinHandle<()>,
}

impl DeferredLoading {
    pub(crate) fn arm(indicator: Arc<dyn LoadingIndicator>, delay: Duration, text: String) -> Self {
        let state = Arc::new(Mutex::new(IndicatorState::Armed));
        let timer = tokio::spawn({
            let indicator = indicator.clone();
            let state = state.clone();
            async move {
                tokio::time::sleep(delay).await;
                if let Ok(mut state) = state.lock() {
                    if *state == IndicatorState::Armed {
                        *state = IndicatorState::Shown;
                        indicator.show(&text, true);
                    }
                }
            }
        });

        Self {
            indicator,
            state,
            timer,
        }
    }

    /// Forward progress to the indicator if it is visible
    pub(crate) fn progress(&self, percent: u8, text: &str) {
        if let Ok(state) = self.state.lock() {
            if *state == IndicatorState::Shown {
                self.indicator.update_progress(percent, text);
            }
        }
    }
}

impl Drop for DeferredLoading {
    fn drop(&mut self) {
        self.timer.abort();
        if let Ok(mut state) = self.state.lock() {
            if *state == IndicatorState::Shown {
                self.indicator.hide();
            }
            *state = IndicatorState::Released;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{LoadingCall, RecordingLoadingIndicator};

    #[tokio::test(start_paused = true)]
    async fn test_fast_transition_never_shows() {
        let indicator = Arc::new(RecordingLoadingIndicator::new());
        let guard = DeferredLoading::arm(
            indicator.clone(),
            Duration::from_millis(100),
            "Loading Scanner...".to_string(),
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(guard);
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert!(indicator.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_transition_shows_and_hides() {
        let indicator = Arc::new(RecordingLoadingIndicator::new());
        let guard = DeferredLoading::arm(
            indicator.clone(),
            Duration::from_millis(100),
            "Loading Scanner...".to_string(),
        );
        tokio::time::sleep(Duration::from_millis(150)).await;
        guard.progress(60, "Rendering");
        drop(guard);

        assert_eq!(
            indicator.calls(),
            vec![
                LoadingCall::Show {
                    text: "Loading Scanner...".to_string(),
                    with_progress: true
                },
                LoadingCall::Progress {
                    percent: 60,
                    text: "Rendering".to_string()
                },
                LoadingCall::Hide,
            ]
        );
    }
}
