//! Status line shown under each frame
//!
//! Summarizes connectivity, the transition phase and router telemetry.

use crate::interactive::terminal_output::{apply_color, AnsiColor};
use goldradar_core::{PerformanceMetrics, TransitionPhase};

/// Inputs of the status line
#[derive(Debug, Clone)]
pub struct StatusLineContext {
    pub online: bool,
    pub phase: TransitionPhase,
    pub metrics: PerformanceMetrics,
}

pub fn render_status_line(context: &StatusLineContext, colors: bool) -> String {
    let connectivity = if context.online {
        ("● online", AnsiColor::Green)
    } else {
        ("● offline", AnsiColor::Red)
    };
    let connectivity = if colors {
        apply_color(connectivity.0, connectivity.1)
    } else {
        connectivity.0.to_string()
    };

    let summary = format!(
        "{} | {} navigations | avg load {:.0}ms | cache hits {:.0}%",
        context.phase.as_str(),
        context.metrics.navigation_count,
        context.metrics.average_load_time,
        context.metrics.cache_hit_rate
    );
    let summary = if colors {
        apply_color(&summary, AnsiColor::Gray)
    } else {
        summary
    };

    format!("{}  {}", connectivity, summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_line_summary() {
        let context = StatusLineContext {
            online: false,
            phase: TransitionPhase::Ready,
            metrics: PerformanceMetrics {
                navigation_count: 4,
                average_load_time: 12.4,
                cache_hit_rate: 50.0,
                ..Default::default()
            },
        };
        let line = render_status_line(&context, false);
        assert!(line.starts_with("● offline"));
        assert!(line.contains("4 navigations"));
        assert!(line.contains("avg load 12ms"));
        assert!(line.contains("cache hits 50%"));
    }
}
