//! Line-based command loop of the interactive dashboard

use super::app::App;
use super::terminal_output::{apply_color, AnsiColor, OutputHandle};
use super::text_utils::pad_to_width;
use anyhow::Result;
use goldradar_core::{NavigationOutcome, RouterError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

const PROMPT: &str = "goldradar> ";

const HELP: &[(&str, &str)] = &[
    ("go <route>", "navigate to a route, e.g. `go scanner`"),
    ("back, forward", "move through history"),
    ("refresh", "reload the current page"),
    ("retry [route]", "retry a failed route"),
    ("online, offline", "switch the simulated network"),
    ("metrics", "show router performance metrics"),
    ("errors", "show recent navigation errors"),
    ("routes", "list registered routes"),
    ("clear", "destroy cached pages and reload"),
    ("help", "show this help"),
    ("quit", "leave GoldRadar"),
];

/// A parsed REPL line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Go(String),
    Back,
    Forward,
    Refresh,
    Retry(Option<String>),
    Online,
    Offline,
    Metrics,
    Errors,
    Routes,
    ClearCache,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return ReplCommand::Empty;
        };
        let argument = words.next().map(normalize_route);

        match (command.to_lowercase().as_str(), argument) {
            ("go" | "open", Some(route)) => ReplCommand::Go(route),
            (path, None) if path.starts_with('/') => ReplCommand::Go(path.to_string()),
            ("back" | "b", None) => ReplCommand::Back,
            ("forward" | "f", None) => ReplCommand::Forward,
            ("refresh" | "r", None) => ReplCommand::Refresh,
            ("retry", route) => ReplCommand::Retry(route),
            ("online", None) => ReplCommand::Online,
            ("offline", None) => ReplCommand::Offline,
            ("metrics", None) => ReplCommand::Metrics,
            ("errors", None) => ReplCommand::Errors,
            ("routes", None) => ReplCommand::Routes,
            ("clear", None) => ReplCommand::ClearCache,
            ("help" | "?", None) => ReplCommand::Help,
            ("quit" | "exit" | "q", None) => ReplCommand::Quit,
            _ => ReplCommand::Unknown(line.trim().to_string()),
        }
    }
}

fn normalize_route(route: &str) -> String {
    if route.starts_with('/') {
        route.to_string()
    } else {
        format!("/{}", route)
    }
}

enum Flow {
    Continue,
    Quit,
}

/// Read commands from `input` until `quit`, end of input or Ctrl+C
pub async fn run_repl<O, R>(app: &App<O>, input: R) -> Result<()>
where
    O: OutputHandle + 'static,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        app.viewport().output().print(PROMPT);
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                app.viewport().output().println("");
                break;
            }
        };
        let Some(line) = line else {
            debug!("Input closed");
            break;
        };

        if let Flow::Quit = execute(app, ReplCommand::parse(&line)).await {
            break;
        }
    }
    Ok(())
}

async fn execute<O: OutputHandle + 'static>(app: &App<O>, command: ReplCommand) -> Flow {
    let out = app.viewport().output();
    let colors = app.viewport().colors();
    let note = |text: &str| {
        if colors {
            out.println(apply_color(text, AnsiColor::Gray));
        } else {
            out.println(text);
        }
    };

    match command {
        ReplCommand::Go(route) => {
            let outcome = app
                .run_command(|router| async move { router.navigate(route).await })
                .await;
            report_outcome(&outcome, &note);
        }
        ReplCommand::Back | ReplCommand::Forward => {
            let back = command == ReplCommand::Back;
            let result = app
                .run_command(|router| async move {
                    if back {
                        router.go_back().await
                    } else {
                        router.go_forward().await
                    }
                })
                .await;
            match result {
                Ok(outcome) => report_outcome(&outcome, &note),
                Err(RouterError::NoHistory) => note("No history entry in that direction"),
                Err(e) => note(&e.to_string()),
            }
        }
        ReplCommand::Refresh => {
            let outcome = app
                .run_command(|router| async move { router.refresh().await })
                .await;
            report_outcome(&outcome, &note);
        }
        ReplCommand::Retry(route) => {
            let target = route
                .or_else(|| app.viewport().last_error().map(|panel| panel.retry_route))
                .or_else(|| app.router().current_route().map(|route| route.to_string()));
            match target {
                Some(target) => {
                    let outcome = app
                        .run_command(|router| async move { router.retry(target).await })
                        .await;
                    report_outcome(&outcome, &note);
                }
                None => note("Nothing to retry"),
            }
        }
        ReplCommand::Online | ReplCommand::Offline => {
            let online = command == ReplCommand::Online;
            match app.set_online(online) {
                Some(true) => note("Network online"),
                Some(false) => note("Network offline"),
                None => note("Network state unchanged"),
            }
        }
        ReplCommand::Metrics => {
            let metrics = app.router().performance_metrics();
            out.println(format!("Navigations      {}", metrics.navigation_count));
            out.println(format!("Errors           {}", metrics.error_count));
            out.println(format!("Retries          {}", metrics.retry_count));
            out.println(format!(
                "Avg load time    {:.1}ms",
                metrics.average_load_time
            ));
            out.println(format!("Cache hit rate   {:.1}%", metrics.cache_hit_rate));
        }
        ReplCommand::Errors => {
            let errors = app.router().error_history();
            if errors.is_empty() {
                note("No navigation errors");
            }
            for record in errors {
                out.println(format!(
                    "{} {} [{}] attempt {}: {}",
                    record.timestamp.format("%H:%M:%S"),
                    record.route,
                    record.kind,
                    record.attempt,
                    record.message
                ));
            }
        }
        ReplCommand::Routes => {
            let router = app.router();
            for route in router.routes() {
                let cached = if router.is_cached(route.id.clone()) {
                    "cached"
                } else {
                    ""
                };
                out.println(format!(
                    "{}{}{}",
                    pad_to_width(route.id.as_str(), 14),
                    pad_to_width(&route.title, 20),
                    cached
                ));
            }
        }
        ReplCommand::ClearCache => {
            let outcome = app
                .run_command(|router| async move {
                    router.clear_cache().await;
                    router.refresh().await
                })
                .await;
            note("Page cache cleared");
            report_outcome(&outcome, &note);
        }
        ReplCommand::Help => {
            for (usage, summary) in HELP {
                out.println(format!("  {}{}", pad_to_width(usage, 18), summary));
            }
        }
        ReplCommand::Quit => return Flow::Quit,
        ReplCommand::Empty => {}
        ReplCommand::Unknown(line) => {
            note(&format!("Unknown command '{}'. Type `help` for commands.", line))
        }
    }
    Flow::Continue
}

fn report_outcome(outcome: &NavigationOutcome, note: &impl Fn(&str)) {
    match outcome {
        NavigationOutcome::Ready {
            route,
            redirected_from: Some(from),
        } => note(&format!("{} is unavailable, showing {}", from, route)),
        NavigationOutcome::Unchanged(route) => note(&format!("Already on {}", route)),
        NavigationOutcome::Superseded(route) => {
            debug!("Navigation to {} was superseded", route)
        }
        NavigationOutcome::Ready { .. } | NavigationOutcome::Failed(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactive::loading::ProgressLoadingIndicator;
    use crate::interactive::terminal_output::{BufferHandle, TerminalViewport};
    use goldradar_core::RouterConfig;
    use std::sync::Arc;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReplCommand::parse("go scanner"), ReplCommand::Go("/scanner".into()));
        assert_eq!(ReplCommand::parse("  /alerts "), ReplCommand::Go("/alerts".into()));
        assert_eq!(ReplCommand::parse("BACK"), ReplCommand::Back);
        assert_eq!(ReplCommand::parse("retry"), ReplCommand::Retry(None));
        assert_eq!(
            ReplCommand::parse("retry /backtest"),
            ReplCommand::Retry(Some("/backtest".into()))
        );
        assert_eq!(ReplCommand::parse(""), ReplCommand::Empty);
        assert_eq!(ReplCommand::parse("exit"), ReplCommand::Quit);
        assert_eq!(
            ReplCommand::parse("go"),
            ReplCommand::Unknown("go".into())
        );
        assert_eq!(
            ReplCommand::parse("refresh now"),
            ReplCommand::Unknown("refresh now".into())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_script_drives_router() {
        let out = BufferHandle::default();
        let viewport = TerminalViewport::new(out.clone())
            .with_colors(false)
            .with_width(60);
        let config = RouterConfig::default().with_transition_delay_ms(0);
        let mut app =
            App::new(config, viewport, Arc::new(ProgressLoadingIndicator::hidden())).unwrap();
        app.start().await;

        let script = "go about\ngo /nowhere\nback\nmetrics\nbogus\nquit\ngo alerts\n";
        run_repl(&app, script.as_bytes()).await.unwrap();

        let text = out.contents();
        assert!(text.contains("About GoldRadar"));
        assert!(text.contains("/nowhere is unavailable, showing /dashboard"));
        assert!(text.contains("Navigations"));
        assert!(text.contains("Unknown command 'bogus'"));
        // Nothing after `quit` runs
        assert!(!app.router().is_cached("/alerts"));
        assert_eq!(app.router().current_route().unwrap().as_str(), "/about");
        app.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_reloads_current_page() {
        let out = BufferHandle::default();
        let viewport = TerminalViewport::new(out.clone())
            .with_colors(false)
            .with_width(60);
        let config = RouterConfig::default().with_transition_delay_ms(0);
        let mut app =
            App::new(config, viewport, Arc::new(ProgressLoadingIndicator::hidden())).unwrap();
        app.start().await;

        run_repl(&app, "go about\nclear\n".as_bytes()).await.unwrap();

        assert!(out.contents().contains("Page cache cleared"));
        assert_eq!(app.router().current_route().unwrap().as_str(), "/about");
        assert!(app.router().current_page().is_some());
        assert!(app.router().is_cached("/about"));
        assert!(!app.router().is_cached("/dashboard"));
        app.shutdown().await.unwrap();
    }
}
