//! Interactive terminal dashboard
//!
//! Hosts the router in a terminal: pages render into [`TerminalViewport`],
//! slow transitions show a progress bar and a line-based REPL drives
//! navigation.
//!
//! [`TerminalViewport`]: terminal_output::TerminalViewport

pub mod app;
pub mod components;
pub mod loading;
pub mod pages;
pub mod repl;
pub mod terminal_output;
pub mod text_utils;
