//! Simulated gold market feed shared by the pages
//!
//! Prices follow a random walk around a base price. The feed is unreachable
//! whenever the host reports being offline, which is how pages fail their
//! lifecycle hooks while the connection is down.

use goldradar_core::ConnectivitySignal;
use rand::Rng;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

/// Starting price of the simulated XAU/USD market
pub const BASE_PRICE: f64 = 2350.0;

const MAX_CANDLES: usize = 240;
const WARMUP_CANDLES: usize = 60;

#[derive(Debug, Error, PartialEq)]
pub enum FeedError {
    #[error("Market feed unreachable while offline")]
    Offline,

    #[error("Not enough price history: need {needed} candles, have {available}")]
    InsufficientHistory { needed: usize, available: usize },
}

/// One OHLC bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Latest price summary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub spread: f64,
    pub volume: u64,
}

/// Support/resistance band of a lookback window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakoutZone {
    pub support: f64,
    pub resistance: f64,
}

impl BreakoutZone {
    pub fn width(&self) -> f64 {
        self.resistance - self.support
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Bullish,
    Bearish,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Bullish => "bullish",
            Direction::Bearish => "bearish",
        }
    }
}

/// Close outside the zone of the preceding candles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakout {
    pub direction: Direction,
    pub price: f64,
    pub zone: BreakoutZone,
    pub volume: u64,
}

/// Zone spanned by `candles`
pub fn zone_of(candles: &[Candle]) -> Option<BreakoutZone> {
    let first = candles.first()?;
    let (support, resistance) = candles
        .iter()
        .fold((first.low, first.high), |(low, high), candle| {
            (low.min(candle.low), high.max(candle.high))
        });
    Some(BreakoutZone {
        support,
        resistance,
    })
}

/// Check whether the last candle closed outside the zone of the `lookback`
/// candles before it
pub fn detect_breakout(candles: &[Candle], lookback: usize) -> Option<Breakout> {
    let (last, history) = candles.split_last()?;
    if lookback == 0 || history.len() < lookback {
        return None;
    }
    let zone = zone_of(&history[history.len() - lookback..])?;

    let direction = if last.close > zone.resistance {
        Direction::Bullish
    } else if last.close < zone.support {
        Direction::Bearish
    } else {
        return None;
    };

    Some(Breakout {
        direction,
        price: last.close,
        zone,
        volume: last.volume,
    })
}

struct FeedState {
    session_open: f64,
    candles: VecDeque<Candle>,
}

/// Random-walk market feed gated by connectivity
pub struct MarketFeed {
    connectivity: Arc<dyn ConnectivitySignal>,
    state: Mutex<FeedState>,
}

impl MarketFeed {
    pub fn new(connectivity: Arc<dyn ConnectivitySignal>) -> Self {
        let mut rng = rand::thread_rng();
        let mut candles = VecDeque::with_capacity(MAX_CANDLES);
        let mut price = BASE_PRICE;
        for _ in 0..WARMUP_CANDLES {
            let candle = next_candle(&mut rng, price);
            price = candle.close;
            candles.push_back(candle);
        }

        Self {
            connectivity,
            state: Mutex::new(FeedState {
                session_open: BASE_PRICE,
                candles,
            }),
        }
    }

    pub fn is_reachable(&self) -> bool {
        self.connectivity.is_online()
    }

    /// Advance the market by one candle
    pub fn tick(&self) -> Result<Candle, FeedError> {
        self.ensure_reachable()?;
        let mut state = self.lock();
        let price = state.candles.back().map_or(BASE_PRICE, |c| c.close);
        let candle = next_candle(&mut rand::thread_rng(), price);
        if state.candles.len() == MAX_CANDLES {
            state.candles.pop_front();
        }
        state.candles.push_back(candle);
        Ok(candle)
    }

    /// Current price summary; advances the market by one candle
    pub fn quote(&self) -> Result<Quote, FeedError> {
        let candle = self.tick()?;
        let open = self.lock().session_open;
        let change = candle.close - open;
        Ok(Quote {
            price: candle.close,
            change,
            change_percent: change / open * 100.0,
            spread: rand::thread_rng().gen_range(0.2..2.0),
            volume: candle.volume,
        })
    }

    /// The most recent `count` candles, oldest first
    pub fn candles(&self, count: usize) -> Result<Vec<Candle>, FeedError> {
        self.ensure_reachable()?;
        let state = self.lock();
        if state.candles.len() < count {
            return Err(FeedError::InsufficientHistory {
                needed: count,
                available: state.candles.len(),
            });
        }
        Ok(state
            .candles
            .iter()
            .skip(state.candles.len() - count)
            .copied()
            .collect())
    }

    fn ensure_reachable(&self) -> Result<(), FeedError> {
        if self.is_reachable() {
            Ok(())
        } else {
            Err(FeedError::Offline)
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn next_candle<R: Rng>(rng: &mut R, price: f64) -> Candle {
    let open = price + rng.gen_range(-5.0..5.0);
    let close = open + rng.gen_range(-2.5..2.5);
    Candle {
        open,
        high: open.max(close) + rng.gen_range(0.0..3.0),
        low: open.min(close) - rng.gen_range(0.0..3.0),
        close,
        volume: rng.gen_range(1_000..10_000),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goldradar_core::ManualConnectivity;

    fn candle(low: f64, high: f64, close: f64) -> Candle {
        Candle {
            open: close,
            high,
            low,
            close,
            volume: 1_500,
        }
    }

    #[test]
    fn test_detect_bullish_breakout() {
        let candles = vec![
            candle(2340.0, 2350.0, 2345.0),
            candle(2342.0, 2352.0, 2348.0),
            candle(2350.0, 2360.0, 2358.5),
        ];
        let breakout = detect_breakout(&candles, 2).unwrap();
        assert_eq!(breakout.direction, Direction::Bullish);
        assert_eq!(breakout.zone.support, 2340.0);
        assert_eq!(breakout.zone.resistance, 2352.0);
    }

    #[test]
    fn test_detect_no_breakout_inside_zone() {
        let candles = vec![
            candle(2340.0, 2350.0, 2345.0),
            candle(2338.0, 2349.0, 2341.0),
            candle(2339.0, 2348.0, 2344.0),
        ];
        assert!(detect_breakout(&candles, 2).is_none());
        assert!(detect_breakout(&candles, 5).is_none());
    }

    #[test]
    fn test_feed_offline() {
        let connectivity = Arc::new(ManualConnectivity::default());
        let feed = MarketFeed::new(connectivity.clone());
        assert!(feed.quote().is_ok());
        assert_eq!(feed.candles(20).unwrap().len(), 20);

        connectivity.set_online(false);
        assert_eq!(feed.quote(), Err(FeedError::Offline));
        assert_eq!(feed.candles(1), Err(FeedError::Offline));
    }

    #[test]
    fn test_history_is_bounded() {
        let feed = MarketFeed::new(Arc::new(ManualConnectivity::default()));
        for _ in 0..(MAX_CANDLES * 2) {
            feed.tick().unwrap();
        }
        assert!(feed.candles(MAX_CANDLES).is_ok());
        assert!(matches!(
            feed.candles(MAX_CANDLES + 1),
            Err(FeedError::InsufficientHistory { .. })
        ));
    }
}
