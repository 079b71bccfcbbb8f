//! Backtest page
//!
//! Replays the breakout strategy over simulated history. The page is
//! registered uncached, so every visit runs a new backtest.

use super::market::MarketFeed;
use super::{heading, paragraph, section, stat, trend_class};
use async_trait::async_trait;
use goldradar_core::{ContentNode, Page, PageContent, PageResult};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

const BACKTEST_DAYS: u32 = 90;
const TRADE_PROBABILITY: f64 = 0.1;
const WIN_RATE: f64 = 0.6;
/// Simulated compute time of a run
const RUN_TIME: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub day: u32,
    pub entry: f64,
    pub pnl: f64,
    pub duration_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BacktestReport {
    pub days: u32,
    pub trades: Vec<Trade>,
    pub net_pnl: f64,
    pub max_drawdown: f64,
}

impl BacktestReport {
    pub fn wins(&self) -> usize {
        self.trades.iter().filter(|trade| trade.pnl > 0.0).count()
    }

    pub fn win_rate(&self) -> f64 {
        if self.trades.is_empty() {
            0.0
        } else {
            self.wins() as f64 / self.trades.len() as f64 * 100.0
        }
    }

    pub fn best_trade(&self) -> Option<&Trade> {
        self.trades.iter().max_by(|a, b| a.pnl.total_cmp(&b.pnl))
    }
}

/// Simulate `days` of trading: a breakout entry on roughly one day in ten
pub fn simulate<R: Rng>(rng: &mut R, days: u32) -> BacktestReport {
    let mut trades = Vec::new();
    let mut equity = 0.0_f64;
    let mut peak = 0.0_f64;
    let mut max_drawdown = 0.0_f64;

    for day in 0..days {
        if !rng.gen_bool(TRADE_PROBABILITY) {
            continue;
        }
        let pnl = if rng.gen_bool(WIN_RATE) {
            rng.gen_range(5.0..25.0)
        } else {
            -rng.gen_range(5.0..15.0)
        };
        equity += pnl;
        peak = peak.max(equity);
        max_drawdown = max_drawdown.max(peak - equity);

        trades.push(Trade {
            day,
            entry: 2000.0 + rng.gen_range(0.0..100.0),
            pnl,
            duration_hours: rng.gen_range(1..=24),
        });
    }

    BacktestReport {
        days,
        trades,
        net_pnl: equity,
        max_drawdown,
    }
}

pub struct BacktestPage {
    feed: Arc<MarketFeed>,
    report: Option<BacktestReport>,
    run_time: Duration,
}

impl BacktestPage {
    pub fn new(feed: Arc<MarketFeed>) -> Self {
        Self {
            feed,
            report: None,
            run_time: RUN_TIME,
        }
    }

    pub fn report(&self) -> Option<&BacktestReport> {
        self.report.as_ref()
    }
}

#[async_trait]
impl Page for BacktestPage {
    fn render(&self) -> PageResult<PageContent> {
        let mut page = ContentNode::new("div")
            .with_class("backtest-page")
            .child(heading("Strategy Backtest"));

        let Some(report) = &self.report else {
            return Ok(page
                .child(paragraph("Running backtest...").with_class("muted"))
                .into());
        };

        page = page
            .child(section(format!("Last {} days", report.days)))
            .child(stat("Trades", report.trades.len()))
            .child(stat("Win rate", format!("{:.1}%", report.win_rate())))
            .child(
                stat("Net P&L", format!("{:+.2} USD/oz", report.net_pnl))
                    .with_class(format!("stat {}", trend_class(report.net_pnl))),
            )
            .child(stat("Max drawdown", format!("{:.2}", report.max_drawdown)));

        if let Some(best) = report.best_trade() {
            page = page.child(paragraph(format!(
                "Best trade: day {} entry {:.2}, {:+.2} over {}h",
                best.day + 1,
                best.entry,
                best.pnl,
                best.duration_hours
            )));
        }
        Ok(page.into())
    }

    async fn init(&mut self) -> PageResult<()> {
        // Price history comes from the feed
        self.feed.candles(1)?;
        tokio::time::sleep(self.run_time).await;
        self.report = Some(simulate(&mut rand::thread_rng(), BACKTEST_DAYS));
        Ok(())
    }
}
