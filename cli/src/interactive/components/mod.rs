//! Reusable terminal components for the dashboard
//!
//! Each component renders to plain lines so the viewport can compose them.

pub mod logo;
pub mod nav_bar;
pub mod status_line;

pub use logo::output_logo_to_terminal;
pub use nav_bar::render_nav_bar;
pub use status_line::{render_status_line, StatusLineContext};
