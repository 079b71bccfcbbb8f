//! About page

use super::{heading, item, paragraph, section, stat};
use async_trait::async_trait;
use goldradar_core::{ContentNode, Page, PageContent, PageResult};

const FEATURES: &[(&str, &str)] = &[
    ("Dashboard", "live XAU/USD quote with the current breakout zone"),
    ("Scanner", "continuous breakout detection over the latest candles"),
    ("Alerts", "price rules with their recent trigger history"),
    ("Backtest", "replay of the breakout strategy over the last 90 days"),
];

const SHORTCUTS: &[(&str, &str)] = &[
    ("go <route>", "open a page"),
    ("back / forward", "move through history"),
    ("refresh", "reload the current page"),
    ("retry", "retry the last failed page"),
];

#[derive(Debug, Default)]
pub struct AboutPage {
    version: &'static str,
}

impl AboutPage {
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[async_trait]
impl Page for AboutPage {
    fn render(&self) -> PageResult<PageContent> {
        let page = ContentNode::new("div")
            .with_class("about-page")
            .child(heading("About GoldRadar"))
            .child(paragraph(
                "Gold trading analysis and breakout detection for XAU/USD",
            ))
            .child(stat("Version", self.version))
            .child(stat("Router core", goldradar_core::VERSION))
            .child(section("Features"))
            .child(
                ContentNode::new("ul").children(
                    FEATURES
                        .iter()
                        .map(|(name, summary)| item(format!("{}: {}", name, summary))),
                ),
            )
            .child(section("Commands"))
            .child(
                ContentNode::new("ul").children(
                    SHORTCUTS
                        .iter()
                        .map(|(keys, action)| item(format!("{:<16}{}", keys, action))),
                ),
            )
            .child(
                paragraph("Market data is simulated. Not investment advice.").with_class("muted"),
            );
        Ok(page.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_features() {
        let text = AboutPage::new().render().unwrap().text();
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
        for (name, _) in FEATURES {
            assert!(text.contains(name));
        }
    }
}
