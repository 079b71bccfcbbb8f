//! Breakout scanner page
//!
//! While the page is mounted a background task advances the market on a fixed
//! interval and records every breakout it sees. `destroy` stops the task.

use super::market::{detect_breakout, Breakout, FeedError, MarketFeed};
use super::{heading, item, paragraph, section, stat};
use async_trait::async_trait;
use goldradar_core::{ContentNode, Page, PageContent, PageResult};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

const SCAN_INTERVAL: Duration = Duration::from_secs(2);
const LOOKBACK: usize = 12;
const RECENT_LIMIT: usize = 5;

/// Counters shared with the scan task
#[derive(Debug, Default, Clone)]
pub struct ScanStats {
    pub scans: u64,
    pub breakouts: u64,
    pub feed_errors: u64,
    pub recent: VecDeque<Breakout>,
}

impl ScanStats {
    /// Share of scans that found a breakout, in percent
    pub fn hit_rate(&self) -> f64 {
        if self.scans == 0 {
            0.0
        } else {
            self.breakouts as f64 / self.scans as f64 * 100.0
        }
    }

    fn record(&mut self, breakout: Option<Breakout>) {
        self.scans += 1;
        if let Some(breakout) = breakout {
            self.breakouts += 1;
            if self.recent.len() == RECENT_LIMIT {
                self.recent.pop_back();
            }
            self.recent.push_front(breakout);
        }
    }
}

pub struct ScannerPage {
    feed: Arc<MarketFeed>,
    stats: Arc<Mutex<ScanStats>>,
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl ScannerPage {
    pub fn new(feed: Arc<MarketFeed>) -> Self {
        Self::with_interval(feed, SCAN_INTERVAL)
    }

    pub fn with_interval(feed: Arc<MarketFeed>, interval: Duration) -> Self {
        Self {
            feed,
            stats: Arc::new(Mutex::new(ScanStats::default())),
            interval,
            task: None,
        }
    }

    pub fn stats(&self) -> ScanStats {
        lock(&self.stats).clone()
    }

    pub fn is_scanning(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Scanner stopped");
        }
    }
}

/// Run one scan against the feed
fn scan(feed: &MarketFeed) -> Result<Option<Breakout>, FeedError> {
    feed.tick()?;
    let candles = feed.candles(LOOKBACK + 1)?;
    Ok(detect_breakout(&candles, LOOKBACK))
}

fn lock(stats: &Mutex<ScanStats>) -> MutexGuard<'_, ScanStats> {
    stats.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl Page for ScannerPage {
    fn render(&self) -> PageResult<PageContent> {
        let stats = self.stats();
        let status = if self.is_scanning() {
            paragraph(format!(
                "Scanning every {}s over the last {} candles",
                self.interval.as_secs(),
                LOOKBACK
            ))
        } else {
            paragraph("Scanner idle").with_class("muted")
        };

        let recent: Vec<ContentNode> = stats
            .recent
            .iter()
            .map(|breakout| {
                item(format!(
                    "{} at {:.2} (zone {:.2}-{:.2}, volume {})",
                    breakout.direction.as_str(),
                    breakout.price,
                    breakout.zone.support,
                    breakout.zone.resistance,
                    breakout.volume
                ))
            })
            .collect();

        let mut page = ContentNode::new("div")
            .with_class("scanner-page")
            .child(heading("Breakout Scanner"))
            .child(status)
            .child(section("Scan status"))
            .child(stat("Scans completed", stats.scans))
            .child(stat("Breakouts found", stats.breakouts))
            .child(stat("Hit rate", format!("{:.1}%", stats.hit_rate())))
            .child(section("Recent breakouts"));
        page = if recent.is_empty() {
            page.child(paragraph("No breakouts yet").with_class("muted"))
        } else {
            page.child(ContentNode::new("ul").children(recent))
        };
        Ok(page.into())
    }

    async fn init(&mut self) -> PageResult<()> {
        // Fail fast when the feed is down
        lock(&self.stats).record(scan(&self.feed)?);

        self.stop();
        let feed = self.feed.clone();
        let stats = self.stats.clone();
        let period = self.interval;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                match scan(&feed) {
                    Ok(found) => lock(&stats).record(found),
                    Err(e) => {
                        lock(&stats).feed_errors += 1;
                        warn!("Scan skipped: {}", e);
                    }
                }
            }
        }));
        debug!("Scanner started");
        Ok(())
    }

    async fn destroy(&mut self) -> PageResult<()> {
        self.stop();
        Ok(())
    }
}

impl Drop for ScannerPage {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goldradar_core::ManualConnectivity;

    #[tokio::test(start_paused = true)]
    async fn test_scan_task_runs_until_destroy() {
        let feed = Arc::new(MarketFeed::new(Arc::new(ManualConnectivity::default())));
        let mut page = ScannerPage::with_interval(feed, Duration::from_millis(100));

        page.init().await.unwrap();
        assert!(page.is_scanning());
        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(page.stats().scans, 4);

        page.destroy().await.unwrap();
        assert!(!page.is_scanning());
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(page.stats().scans, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reinit_keeps_a_single_task() {
        let feed = Arc::new(MarketFeed::new(Arc::new(ManualConnectivity::default())));
        let mut page = ScannerPage::with_interval(feed, Duration::from_millis(100));

        page.init().await.unwrap();
        page.reinit().await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        // Two immediate scans plus one tick of the surviving task
        assert_eq!(page.stats().scans, 3);
    }

    #[tokio::test]
    async fn test_init_fails_offline() {
        let connectivity = Arc::new(ManualConnectivity::new(false));
        let feed = Arc::new(MarketFeed::new(connectivity));
        let mut page = ScannerPage::new(feed);
        assert!(page.init().await.is_err());
        assert!(!page.is_scanning());
    }

    #[test]
    fn test_recent_breakouts_are_bounded() {
        use crate::interactive::pages::market::{BreakoutZone, Direction};

        let mut stats = ScanStats::default();
        stats.record(None);
        for i in 0..(RECENT_LIMIT + 2) {
            stats.record(Some(Breakout {
                direction: Direction::Bullish,
                price: 2360.0 + i as f64,
                zone: BreakoutZone {
                    support: 2340.0,
                    resistance: 2355.0,
                },
                volume: 2_000,
            }));
        }

        assert_eq!(stats.scans, RECENT_LIMIT as u64 + 3);
        assert_eq!(stats.recent.len(), RECENT_LIMIT);
        assert_eq!(stats.recent[0].price, 2360.0 + (RECENT_LIMIT + 1) as f64);
        assert!(stats.hit_rate() > 80.0);
    }
}
