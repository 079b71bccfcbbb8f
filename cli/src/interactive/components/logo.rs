//! GoldRadar banner
//!
//! Block letters drawn with a gold gradient.

use crate::interactive::terminal_output::{apply_rgb_color, OutputHandle};

pub const GOLDRADAR_LOGO_LINES: &[&str] = &[
    " ██████   ██████  ██      ██████  ██████   █████  ██████   █████  ██████ ",
    "██       ██    ██ ██      ██   ██ ██   ██ ██   ██ ██   ██ ██   ██ ██   ██",
    "██   ███ ██    ██ ██      ██   ██ ██████  ███████ ██   ██ ███████ ██████ ",
    "██    ██ ██    ██ ██      ██   ██ ██   ██ ██   ██ ██   ██ ██   ██ ██   ██",
    " ██████   ██████  ███████ ██████  ██   ██ ██   ██ ██████  ██   ██ ██   ██",
];

// Bright gold down to antique gold
pub const LOGO_COLORS: &[(u8, u8, u8)] = &[
    (255, 223, 0),
    (255, 208, 0),
    (245, 190, 20),
    (230, 170, 35),
    (212, 150, 45),
];

const TAGLINE: &str = "XAU/USD breakout radar";

/// Banner lines with colors applied, one per logo row
pub fn logo_lines(colors: bool) -> Vec<String> {
    GOLDRADAR_LOGO_LINES
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if colors {
                let (r, g, b) = LOGO_COLORS.get(i).copied().unwrap_or((184, 134, 11));
                apply_rgb_color(line, r, g, b)
            } else {
                line.to_string()
            }
        })
        .collect()
}

/// Output the banner and tagline to the terminal
pub fn output_logo_to_terminal<T: OutputHandle>(stdout: &T, colors: bool) {
    for line in logo_lines(colors) {
        stdout.println(line);
    }
    stdout.println(format!("{} v{}", TAGLINE, env!("CARGO_PKG_VERSION")));
    stdout.println("");
}
