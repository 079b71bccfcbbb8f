//! Navigation bar listing every route, with the active one highlighted

use crate::interactive::terminal_output::{apply_color, AnsiColor};

/// Render `routes` as `(path, title)` tabs on a single line
pub fn render_nav_bar(routes: &[(String, String)], active: Option<&str>, colors: bool) -> String {
    routes
        .iter()
        .map(|(path, title)| {
            if Some(path.as_str()) == active {
                let tab = format!("[{}]", title);
                if colors {
                    apply_color(&tab, AnsiColor::Yellow)
                } else {
                    tab
                }
            } else {
                format!(" {} ", title)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes() -> Vec<(String, String)> {
        vec![
            ("/dashboard".to_string(), "Dashboard".to_string()),
            ("/scanner".to_string(), "Scanner".to_string()),
        ]
    }

    #[test]
    fn test_active_tab_is_bracketed() {
        let bar = render_nav_bar(&routes(), Some("/scanner"), false);
        assert_eq!(bar, " Dashboard  [Scanner]");
    }

    #[test]
    fn test_no_active_route() {
        let bar = render_nav_bar(&routes(), None, false);
        assert!(!bar.contains('['));
    }
}
