//! Text processing utilities for the terminal dashboard
//!
//! Unicode-aware wrapping and width calculation used when laying out pages.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Minimum width pages are laid out at
pub const MIN_WIDTH: usize = 30;

/// Width used when the terminal size is unknown
const FALLBACK_WIDTH: usize = 76;

/// Wrap text to fit within `max_width`, breaking at word boundaries.
///
/// Words wider than the limit are split by character.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines: Vec<String> = Vec::new();

    for line in text.lines() {
        if UnicodeWidthStr::width(line) <= max_width {
            lines.push(line.to_string());
            continue;
        }

        let mut current_line = String::new();
        let mut current_width = 0;

        for word in line.split_whitespace() {
            let word_width = UnicodeWidthStr::width(word);

            if word_width > max_width {
                if !current_line.is_empty() {
                    lines.push(std::mem::take(&mut current_line));
                    current_width = 0;
                }

                for ch in word.chars() {
                    let ch_width = char_width(ch);
                    if current_width + ch_width > max_width && !current_line.is_empty() {
                        lines.push(std::mem::take(&mut current_line));
                        current_width = 0;
                    }
                    current_line.push(ch);
                    current_width += ch_width;
                }
            } else if current_width > 0 && current_width + 1 + word_width > max_width {
                lines.push(std::mem::replace(&mut current_line, word.to_string()));
                current_width = word_width;
            } else {
                if current_width > 0 {
                    current_line.push(' ');
                    current_width += 1;
                }
                current_line.push_str(word);
                current_width += word_width;
            }
        }

        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Usable terminal width, leaving room for indentation
pub fn get_terminal_width() -> usize {
    match console::Term::stdout().size_checked() {
        Some((_, cols)) => (cols as usize).saturating_sub(4).max(MIN_WIDTH),
        None => FALLBACK_WIDTH,
    }
}

/// Display width of text considering Unicode characters
pub fn text_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Display width of a single character
pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// Pad `text` with spaces to `width` display columns
pub fn pad_to_width(text: &str, width: usize) -> String {
    let padding = width.saturating_sub(text_width(text));
    format!("{}{}", text, " ".repeat(padding))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_simple() {
        let wrapped = wrap_text("XAU/USD 2350.40", 20);
        assert_eq!(wrapped, vec!["XAU/USD 2350.40"]);
    }

    #[test]
    fn test_wrap_text_long_line() {
        let text = "Price is consolidating inside the zone between support and resistance";
        let wrapped = wrap_text(text, 20);
        assert!(wrapped.len() > 1);
        for line in &wrapped {
            assert!(text_width(line) <= 20);
        }
    }

    #[test]
    fn test_wrap_text_long_word() {
        let wrapped = wrap_text("abcdefghijklmnopqrstuvwxyz", 10);
        assert_eq!(wrapped, vec!["abcdefghij", "klmnopqrst", "uvwxyz"]);
    }

    #[test]
    fn test_wrap_text_unicode() {
        let text = "黄金突破扫描器正在运行中请稍候";
        for line in wrap_text(text, 10) {
            assert!(text_width(&line) <= 10);
        }
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("ab", 4), "ab  ");
        assert_eq!(pad_to_width("abcdef", 4), "abcdef");
    }

    #[test]
    fn test_terminal_width() {
        assert!(get_terminal_width() >= MIN_WIDTH);
    }
}
