//! Interactive mode command

use crate::config::CliConfigLoader;
use crate::interactive::app::App;
use crate::interactive::components::output_logo_to_terminal;
use crate::interactive::loading::ProgressLoadingIndicator;
use crate::interactive::repl::run_repl;
use crate::interactive::terminal_output::{OutputHandle, StdoutHandle, TerminalViewport};
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::debug;

/// Start the interactive dashboard
pub async fn interactive_command(
    config_loader: CliConfigLoader,
    analytics_file: Option<PathBuf>,
) -> Result<()> {
    let loaded = config_loader.load().await?;
    match &loaded.source {
        Some(path) => debug!("Using configuration from {}", path.display()),
        None => debug!("Using default configuration"),
    }
    if let Some(path) = &analytics_file {
        debug!("Analytics file: {}", path.display());
    }

    let loading = Arc::new(ProgressLoadingIndicator::new());
    let viewport = TerminalViewport::new(StdoutHandle::new()).with_loading(loading.clone());
    output_logo_to_terminal(viewport.output(), viewport.colors());

    let mut app = App::new(loaded.config, viewport, loading)?.with_analytics_file(analytics_file);
    app.start().await;
    app.viewport()
        .output()
        .println("Type `help` for commands, `quit` to exit.");

    let result = run_repl(&app, BufReader::new(tokio::io::stdin())).await;
    app.shutdown().await?;
    result
}
