//! Price alerts page

use super::market::MarketFeed;
use super::{heading, item, paragraph, section, stat};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use goldradar_core::{ContentNode, Page, PageContent, PageResult};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::Arc;

const HISTORY_SIZE: usize = 8;
const HISTORY_WINDOW_HOURS: i64 = 72;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    Above(f64),
    Below(f64),
}

impl Condition {
    pub fn matches(&self, price: f64) -> bool {
        match *self {
            Condition::Above(level) => price > level,
            Condition::Below(level) => price < level,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Above(level) => write!(f, "price above {:.2}", level),
            Condition::Below(level) => write!(f, "price below {:.2}", level),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertRule {
    pub name: String,
    pub condition: Condition,
}

/// A past alert trigger
#[derive(Debug, Clone, PartialEq)]
pub struct AlertHit {
    pub rule: String,
    pub price: f64,
    pub at: DateTime<Utc>,
    /// Whether the move after the alert followed through
    pub success: bool,
}

pub struct AlertsPage {
    feed: Arc<MarketFeed>,
    rules: Vec<AlertRule>,
    history: Vec<AlertHit>,
    triggered: Vec<String>,
    last_price: Option<f64>,
}

impl AlertsPage {
    pub fn new(feed: Arc<MarketFeed>) -> Self {
        Self {
            feed,
            rules: Vec::new(),
            history: Vec::new(),
            triggered: Vec::new(),
            last_price: None,
        }
    }

    pub fn rules(&self) -> &[AlertRule] {
        &self.rules
    }

    pub fn history(&self) -> &[AlertHit] {
        &self.history
    }

    /// Evaluate every rule against the current price
    fn evaluate(&mut self) -> PageResult<()> {
        let price = self.feed.quote()?.price;
        self.triggered = self
            .rules
            .iter()
            .filter(|rule| rule.condition.matches(price))
            .map(|rule| rule.name.clone())
            .collect();
        self.last_price = Some(price);
        Ok(())
    }
}

/// Rules bracketing `price` so both sides of a breakout are covered
fn default_rules(price: f64) -> Vec<AlertRule> {
    let level = |offset: f64| (price + offset).round();
    vec![
        AlertRule {
            name: "Resistance break".to_string(),
            condition: Condition::Above(level(15.0)),
        },
        AlertRule {
            name: "Support break".to_string(),
            condition: Condition::Below(level(-15.0)),
        },
        AlertRule {
            name: "Round number".to_string(),
            condition: Condition::Above((price / 50.0).floor() * 50.0),
        },
    ]
}

/// Simulated trigger history over the last three days, newest first
fn simulated_history<R: Rng>(
    rng: &mut R,
    rules: &[AlertRule],
    now: DateTime<Utc>,
) -> Vec<AlertHit> {
    let mut history: Vec<AlertHit> = (0..HISTORY_SIZE)
        .filter_map(|_| {
            let rule = rules.choose(&mut *rng)?;
            Some(AlertHit {
                rule: rule.name.clone(),
                price: 1950.0 + rng.gen_range(0.0..100.0),
                at: now - ChronoDuration::hours(rng.gen_range(0..HISTORY_WINDOW_HOURS)),
                success: rng.gen_bool(0.7),
            })
        })
        .collect();
    history.sort_by(|a, b| b.at.cmp(&a.at));
    history
}

#[async_trait]
impl Page for AlertsPage {
    fn render(&self) -> PageResult<PageContent> {
        let mut page = ContentNode::new("div")
            .with_class("alerts-page")
            .child(heading("Price Alerts"));

        if let Some(price) = self.last_price {
            page = page.child(stat("Last price", format!("{:.2}", price)));
        }

        page = page.child(section("Active rules")).children(self.rules.iter().map(|rule| {
            let fired = self.triggered.contains(&rule.name);
            let node = item(format!(
                "{}: {}{}",
                rule.name,
                rule.condition,
                if fired { " [TRIGGERED]" } else { "" }
            ));
            if fired {
                node.with_class("warn")
            } else {
                node
            }
        }));

        let successes = self.history.iter().filter(|hit| hit.success).count();
        page = page.child(section("Recent triggers"));
        page = if self.history.is_empty() {
            page.child(paragraph("No alerts triggered yet").with_class("muted"))
        } else {
            page.child(stat(
                "Follow-through",
                format!("{}/{}", successes, self.history.len()),
            ))
            .children(self.history.iter().map(|hit| {
                item(format!(
                    "{} {} at {:.2}",
                    hit.at.format("%Y-%m-%d %H:%M"),
                    hit.rule,
                    hit.price
                ))
                .with_class(if hit.success { "up" } else { "down" })
            }))
        };

        Ok(page.into())
    }

    async fn init(&mut self) -> PageResult<()> {
        let price = self.feed.quote()?.price;
        self.rules = default_rules(price);
        self.history = simulated_history(&mut rand::thread_rng(), &self.rules, Utc::now());
        self.evaluate()
    }

    /// Keep rules and history; only re-check the rules against the market
    async fn reinit(&mut self) -> PageResult<()> {
        if self.rules.is_empty() {
            return self.init().await;
        }
        self.evaluate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goldradar_core::ManualConnectivity;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_condition_matches() {
        assert!(Condition::Above(2350.0).matches(2350.5));
        assert!(!Condition::Above(2350.0).matches(2350.0));
        assert!(Condition::Below(2300.0).matches(2299.9));
    }

    #[test]
    fn test_simulated_history_is_sorted_within_window() {
        let now = Utc::now();
        let rules = default_rules(2350.0);
        let history = simulated_history(&mut StdRng::seed_from_u64(7), &rules, now);

        assert_eq!(history.len(), HISTORY_SIZE);
        assert!(history.windows(2).all(|pair| pair[0].at >= pair[1].at));
        assert!(history
            .iter()
            .all(|hit| now - hit.at <= ChronoDuration::hours(HISTORY_WINDOW_HOURS)));
    }

    #[tokio::test]
    async fn test_reinit_keeps_rules() {
        let feed = Arc::new(MarketFeed::new(Arc::new(ManualConnectivity::default())));
        let mut page = AlertsPage::new(feed);
        page.init().await.unwrap();
        let rules = page.rules().to_vec();
        let history = page.history().to_vec();

        page.reinit().await.unwrap();
        assert_eq!(page.rules(), rules.as_slice());
        assert_eq!(page.history(), history.as_slice());
        assert!(page.render().unwrap().text().contains("Active rules"));
    }
}
