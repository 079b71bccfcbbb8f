//! Dashboard page: live quote, breakout zone and the latest signal

use super::market::{
    detect_breakout, zone_of, Breakout, BreakoutZone, Direction, MarketFeed, Quote,
};
use super::{heading, paragraph, section, stat, trend_class};
use async_trait::async_trait;
use goldradar_core::{ContentNode, Page, PageContent, PageResult};
use std::sync::Arc;
use tracing::debug;

const ZONE_LOOKBACK: usize = 20;

pub struct DashboardPage {
    feed: Arc<MarketFeed>,
    quote: Option<Quote>,
    zone: Option<BreakoutZone>,
    signal: Option<Breakout>,
    refreshes: u32,
}

impl DashboardPage {
    pub fn new(feed: Arc<MarketFeed>) -> Self {
        Self {
            feed,
            quote: None,
            zone: None,
            signal: None,
            refreshes: 0,
        }
    }

    fn quote_section(&self) -> Vec<ContentNode> {
        let Some(quote) = &self.quote else {
            return vec![paragraph("Waiting for market data...").with_class("muted")];
        };
        vec![
            stat("XAU/USD", format!("{:.2}", quote.price)),
            stat(
                "Change",
                format!("{:+.2} ({:+.2}%)", quote.change, quote.change_percent),
            )
            .with_class(format!("stat {}", trend_class(quote.change))),
            stat("Spread", format!("{:.1}", quote.spread)),
            stat("Volume", quote.volume),
        ]
    }

    fn zone_section(&self) -> Vec<ContentNode> {
        let Some(zone) = &self.zone else {
            return Vec::new();
        };
        let mut nodes = vec![
            stat("Resistance", format!("{:.2}", zone.resistance)),
            stat("Support", format!("{:.2}", zone.support)),
            stat("Zone width", format!("{:.2}", zone.width())),
        ];
        nodes.push(match &self.signal {
            Some(signal) => paragraph(format!(
                "{} breakout at {:.2}",
                signal.direction.as_str().to_uppercase(),
                signal.price
            ))
            .with_class(match signal.direction {
                Direction::Bullish => "up",
                Direction::Bearish => "down",
            }),
            None => paragraph("Price is consolidating inside the zone").with_class("muted"),
        });
        nodes
    }

    fn refresh(&mut self) -> PageResult<()> {
        let quote = self.feed.quote()?;
        let candles = self.feed.candles(ZONE_LOOKBACK + 1)?;
        self.zone = zone_of(&candles[..ZONE_LOOKBACK]);
        self.signal = detect_breakout(&candles, ZONE_LOOKBACK);
        self.quote = Some(quote);
        self.refreshes += 1;
        debug!("Dashboard refreshed ({} times)", self.refreshes);
        Ok(())
    }
}

#[async_trait]
impl Page for DashboardPage {
    fn render(&self) -> PageResult<PageContent> {
        let page = ContentNode::new("div")
            .with_class("dashboard-page")
            .child(heading("Gold Breakout Dashboard"))
            .child(section("Market"))
            .children(self.quote_section())
            .child(section(format!("Breakout zone ({} candles)", ZONE_LOOKBACK)))
            .children(self.zone_section());
        Ok(page.into())
    }

    async fn init(&mut self) -> PageResult<()> {
        self.refresh()
    }
}
