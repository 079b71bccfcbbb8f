//! Terminal output abstraction and the page viewport
//!
//! [`TerminalViewport`] is the router's page container for the terminal. The
//! router installs content, title and active route into it; the frame is drawn
//! by [`TerminalViewport::present`]. Error panels are printed as soon as they
//! are shown.

use super::components::{render_nav_bar, render_status_line, StatusLineContext};
use super::loading::ProgressLoadingIndicator;
use super::text_utils::{get_terminal_width, text_width, wrap_text, MIN_WIDTH};
use console::Term;
use goldradar_core::{ContentNode, ErrorPanel, PageContent, Viewport};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Trait to abstract over output destinations
pub trait OutputHandle: Send + Sync {
    fn println<S: ToString>(&self, msg: S);
    fn print<S: ToString>(&self, msg: S);
}

/// Output handle writing to the process stdout
pub struct StdoutHandle {
    term: Term,
}

impl StdoutHandle {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }
}

impl Default for StdoutHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputHandle for StdoutHandle {
    fn println<S: ToString>(&self, msg: S) {
        if let Err(e) = self.term.write_line(&msg.to_string()) {
            debug!("Failed to write to stdout: {}", e);
        }
    }

    fn print<S: ToString>(&self, msg: S) {
        if let Err(e) = self.term.write_str(&msg.to_string()) {
            debug!("Failed to write to stdout: {}", e);
        }
    }
}

/// Apply ANSI color formatting to text
pub fn apply_color(text: &str, color: AnsiColor) -> String {
    match color {
        AnsiColor::Gray => format!("\x1b[90m{}\x1b[0m", text),
        AnsiColor::Green => format!("\x1b[32m{}\x1b[0m", text),
        AnsiColor::Yellow => format!("\x1b[33m{}\x1b[0m", text),
        AnsiColor::Red => format!("\x1b[31m{}\x1b[0m", text),
        AnsiColor::Cyan => format!("\x1b[36m{}\x1b[0m", text),
    }
}

/// ANSI color codes for terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnsiColor {
    Gray,
    Green,
    Yellow,
    Red,
    Cyan,
}

/// Apply RGB color formatting to text
pub fn apply_rgb_color(text: &str, r: u8, g: u8, b: u8) -> String {
    format!("\x1b[38;2;{};{};{}m{}\x1b[0m", r, g, b, text)
}

pub fn apply_bold(text: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", text)
}

const GOLD: (u8, u8, u8) = (255, 215, 0);

/// Color of a content class, if it has one
fn class_color(class: &str) -> Option<AnsiColor> {
    match class {
        "up" => Some(AnsiColor::Green),
        "down" => Some(AnsiColor::Red),
        "muted" => Some(AnsiColor::Gray),
        "warn" => Some(AnsiColor::Yellow),
        _ => None,
    }
}

fn style_line(line: &str, tag: &str, classes: &[&str], colors: bool) -> String {
    if !colors {
        return line.to_string();
    }
    if let Some(color) = classes.iter().find_map(|class| class_color(class)) {
        return apply_color(line, color);
    }
    match tag {
        "h1" => apply_bold(&apply_rgb_color(line, GOLD.0, GOLD.1, GOLD.2)),
        "h2" => apply_bold(line),
        _ => line.to_string(),
    }
}

fn render_node(node: &ContentNode, width: usize, colors: bool, out: &mut Vec<String>) {
    let classes: Vec<&str> = node
        .class
        .as_deref()
        .map(|class| class.split_whitespace().collect())
        .unwrap_or_default();

    if let Some(text) = &node.text {
        let prefix = match node.tag.as_str() {
            "li" => "  • ",
            "div" if classes.contains(&"stat") => "  ",
            _ => "",
        };
        if node.tag == "h2" && !out.is_empty() {
            out.push(String::new());
        }

        let indent = " ".repeat(text_width(prefix));
        let available = width.saturating_sub(text_width(prefix)).max(MIN_WIDTH / 2);
        for (i, line) in wrap_text(text, available).into_iter().enumerate() {
            let lead = if i == 0 { prefix } else { indent.as_str() };
            out.push(format!(
                "{}{}",
                lead,
                style_line(&line, &node.tag, &classes, colors)
            ));
        }
    }

    for child in &node.children {
        render_node(child, width, colors, out);
    }
}

/// Lay out page content as terminal lines
pub fn render_content(content: &PageContent, width: usize, colors: bool) -> Vec<String> {
    match content {
        PageContent::Element(node) => {
            let mut lines = Vec::new();
            render_node(node, width, colors, &mut lines);
            lines
        }
        PageContent::Markup(_) => wrap_text(&content.text(), width),
    }
}

/// Lines of the inline error block
pub fn error_panel_lines(panel: &ErrorPanel, colors: bool) -> Vec<String> {
    let header = format!("✖ Failed to load {}", panel.route);
    let header = if colors {
        apply_bold(&apply_color(&header, AnsiColor::Red))
    } else {
        header
    };
    let hint = format!("Type `retry` to load {} again.", panel.retry_route);
    let hint = if colors {
        apply_color(&hint, AnsiColor::Cyan)
    } else {
        hint
    };
    vec![
        String::new(),
        header,
        format!("  {}", panel.message),
        format!("  {}", hint),
        String::new(),
    ]
}

#[derive(Debug, Default)]
struct Frame {
    routes: Vec<(String, String)>,
    content: Option<PageContent>,
    title: String,
    active: Option<String>,
    error: Option<ErrorPanel>,
}

/// The terminal page container
pub struct TerminalViewport<O: OutputHandle> {
    out: O,
    loading: Option<Arc<ProgressLoadingIndicator>>,
    colors: bool,
    width: usize,
    frame: Mutex<Frame>,
}

impl<O: OutputHandle> TerminalViewport<O> {
    pub fn new(out: O) -> Self {
        Self {
            out,
            loading: None,
            colors: console::colors_enabled(),
            width: get_terminal_width(),
            frame: Mutex::new(Frame::default()),
        }
    }

    /// Clear the loading bar while printing
    pub fn with_loading(mut self, loading: Arc<ProgressLoadingIndicator>) -> Self {
        self.loading = Some(loading);
        self
    }

    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(MIN_WIDTH);
        self
    }

    pub fn colors(&self) -> bool {
        self.colors
    }

    pub fn output(&self) -> &O {
        &self.out
    }

    /// Set the `(path, title)` entries of the navigation bar
    pub fn set_routes(&self, routes: Vec<(String, String)>) {
        self.frame().routes = routes;
    }

    /// Error panel currently displayed, if any
    pub fn last_error(&self) -> Option<ErrorPanel> {
        self.frame().error.clone()
    }

    /// Lines of the current frame
    pub fn frame_lines(&self, status: Option<&StatusLineContext>) -> Vec<String> {
        let frame = self.frame();
        let rule = "─".repeat(self.width);

        let mut lines = vec![
            render_nav_bar(&frame.routes, frame.active.as_deref(), self.colors),
            rule.clone(),
        ];
        if !frame.title.is_empty() {
            lines.push(if self.colors {
                apply_bold(&frame.title)
            } else {
                frame.title.clone()
            });
            lines.push(String::new());
        }

        match (&frame.error, &frame.content) {
            (Some(panel), _) => lines.extend(error_panel_lines(panel, self.colors)),
            (None, Some(content)) => {
                lines.extend(render_content(content, self.width, self.colors))
            }
            (None, None) => lines.push("Nothing to show yet".to_string()),
        }

        lines.push(rule);
        if let Some(status) = status {
            lines.push(render_status_line(status, self.colors));
        }
        lines
    }

    /// Draw the current frame
    pub fn present(&self, status: Option<&StatusLineContext>) {
        let lines = self.frame_lines(status);
        self.emit(&lines);
    }

    fn emit(&self, lines: &[String]) {
        let print = || {
            for line in lines {
                self.out.println(line);
            }
        };
        match &self.loading {
            Some(loading) => loading.suspend(print),
            None => print(),
        }
    }

    fn frame(&self) -> MutexGuard<'_, Frame> {
        self.frame.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<O: OutputHandle> Viewport for TerminalViewport<O> {
    fn install(&self, content: &PageContent) {
        let mut frame = self.frame();
        frame.content = Some(content.clone());
        frame.error = None;
    }

    fn set_title(&self, title: &str) {
        self.frame().title = title.to_string();
    }

    fn set_active_route(&self, route: &str) {
        self.frame().active = Some(route.to_string());
    }

    fn show_error(&self, panel: &ErrorPanel) {
        self.frame().error = Some(panel.clone());
        self.emit(&error_panel_lines(panel, self.colors));
    }
}

/// Output handle capturing lines in memory
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct BufferHandle {
    lines: Arc<Mutex<Vec<String>>>,
}

#[cfg(test)]
impl BufferHandle {
    pub(crate) fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub(crate) fn contents(&self) -> String {
        self.lines().join("\n")
    }
}

#[cfg(test)]
impl OutputHandle for BufferHandle {
    fn println<S: ToString>(&self, msg: S) {
        self.lines.lock().unwrap().push(msg.to_string());
    }

    fn print<S: ToString>(&self, msg: S) {
        self.lines.lock().unwrap().push(msg.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_page() -> PageContent {
        ContentNode::new("div")
            .child(ContentNode::new("h1").with_text("Dashboard"))
            .child(ContentNode::new("h2").with_text("Market"))
            .child(
                ContentNode::new("div")
                    .with_class("stat up")
                    .with_text("Change: +4.20"),
            )
            .child(
                ContentNode::new("ul").child(ContentNode::new("li").with_text("Bullish at 2361.10")),
            )
            .into()
    }

    #[test]
    fn test_render_plain_element_tree() {
        let lines = render_content(&sample_page(), 60, false);
        assert_eq!(
            lines,
            vec![
                "Dashboard",
                "",
                "Market",
                "  Change: +4.20",
                "  • Bullish at 2361.10"
            ]
        );
    }

    #[test]
    fn test_render_colored_classes() {
        let lines = render_content(&sample_page(), 60, true);
        assert!(lines[0].contains("\x1b[38;2;255;215;0m"));
        assert_eq!(lines[3], format!("  {}", apply_color("Change: +4.20", AnsiColor::Green)));
    }

    #[test]
    fn test_render_markup_strips_tags() {
        let content = PageContent::Markup("<p>Spot <b>2350.00</b></p>".to_string());
        assert_eq!(render_content(&content, 60, false), vec!["Spot 2350.00"]);
    }

    #[test]
    fn test_viewport_presents_installed_page() {
        let out = BufferHandle::default();
        let viewport = TerminalViewport::new(out.clone())
            .with_colors(false)
            .with_width(40);
        viewport.set_routes(vec![
            ("/dashboard".to_string(), "Dashboard".to_string()),
            ("/about".to_string(), "About".to_string()),
        ]);

        viewport.install(&sample_page());
        viewport.set_title("GoldRadar - Dashboard");
        viewport.set_active_route("/dashboard");
        assert!(out.lines().is_empty());

        viewport.present(None);
        let text = out.contents();
        assert!(text.contains("[Dashboard]"));
        assert!(text.contains("GoldRadar - Dashboard"));
        assert!(text.contains("• Bullish at 2361.10"));
    }

    #[test]
    fn test_error_panel_prints_immediately_and_clears_on_install() {
        let out = BufferHandle::default();
        let viewport = TerminalViewport::new(out.clone()).with_colors(false);
        let panel = ErrorPanel {
            route: "/scanner".to_string(),
            message: "feed offline".to_string(),
            retry_route: "/scanner".to_string(),
        };

        viewport.show_error(&panel);
        assert!(out.contents().contains("✖ Failed to load /scanner"));
        assert_eq!(viewport.last_error(), Some(panel));
        assert!(viewport
            .frame_lines(None)
            .iter()
            .any(|line| line.contains("Type `retry`")));

        viewport.install(&sample_page());
        assert_eq!(viewport.last_error(), None);
    }
}
