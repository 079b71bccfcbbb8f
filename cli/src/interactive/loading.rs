//! Terminal loading indicator backed by an indicatif progress bar

use goldradar_core::LoadingIndicator;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(80);

/// Loading indicator drawn on stderr while a transition is slow
pub struct ProgressLoadingIndicator {
    bar: Mutex<Option<ProgressBar>>,
    draw_to_terminal: bool,
}

impl ProgressLoadingIndicator {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
            draw_to_terminal: true,
        }
    }

    /// An indicator that tracks state but never draws
    pub fn hidden() -> Self {
        Self {
            bar: Mutex::new(None),
            draw_to_terminal: false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.lock().is_some()
    }

    /// Current progress position and message, if visible
    pub fn progress(&self) -> Option<(u64, String)> {
        self.lock()
            .as_ref()
            .map(|bar| (bar.position(), bar.message()))
    }

    /// Run `f` with the bar cleared so other output does not interleave with it
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        match self.lock().as_ref() {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.bar.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn style(with_progress: bool) -> ProgressStyle {
        let template = if with_progress {
            "{spinner:.yellow} {msg} [{bar:30.yellow/white}] {pos:>3}%"
        } else {
            "{spinner:.yellow} {msg}"
        };
        ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .progress_chars("=> ")
    }
}

impl Default for ProgressLoadingIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadingIndicator for ProgressLoadingIndicator {
    fn show(&self, text: &str, with_progress: bool) {
        let target = if self.draw_to_terminal {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        let bar = ProgressBar::with_draw_target(Some(100), target)
            .with_style(Self::style(with_progress))
            .with_message(text.to_string());
        if self.draw_to_terminal {
            bar.enable_steady_tick(TICK);
        }

        if let Some(previous) = self.lock().replace(bar) {
            previous.finish_and_clear();
        }
    }

    fn update_progress(&self, percent: u8, text: &str) {
        if let Some(bar) = self.lock().as_ref() {
            bar.set_position(u64::from(percent.min(100)));
            bar.set_message(text.to_string());
        }
    }

    fn hide(&self) {
        if let Some(bar) = self.lock().take() {
            bar.finish_and_clear();
        }
    }
}
