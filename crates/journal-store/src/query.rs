use core_types::Trade;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

/// Which results a history view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    All,
    Positive,
    Negative,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::All => write!(f, "all"),
            Outcome::Positive => write!(f, "positive"),
            Outcome::Negative => write!(f, "negative"),
        }
    }
}

impl FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Outcome::All),
            "positive" | "win" | "wins" => Ok(Outcome::Positive),
            "negative" | "loss" | "losses" => Ok(Outcome::Negative),
            other => Err(format!("unknown outcome '{other}' (expected all, positive or negative)")),
        }
    }
}

/// Filter for the trade history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TradeFilter {
    /// Exact asset symbol; `None` shows every asset.
    pub asset: Option<String>,
    pub outcome: Outcome,
}

impl TradeFilter {
    pub fn matches(&self, trade: &Trade) -> bool {
        let asset_ok = self
            .asset
            .as_deref()
            .is_none_or(|asset| trade.asset.eq_ignore_ascii_case(asset));
        let outcome_ok = match self.outcome {
            Outcome::All => true,
            Outcome::Positive => trade.is_win(),
            Outcome::Negative => trade.is_loss(),
        };
        asset_ok && outcome_ok
    }

    /// Matching trades, most recent execution first.
    pub fn apply(&self, trades: &[Trade]) -> Vec<Trade> {
        let mut matching: Vec<Trade> = trades.iter().filter(|t| self.matches(t)).cloned().collect();
        sort_newest_first(&mut matching);
        matching
    }
}

/// Orders by execution date and time, latest first. Stable for equal timestamps.
pub fn sort_newest_first(trades: &mut [Trade]) {
    trades.sort_by_key(|t| Reverse((t.date, t.time)));
}

/// Every asset in the journal, in first-encounter order.
pub fn distinct_assets(trades: &[Trade]) -> Vec<String> {
    let mut assets: Vec<String> = Vec::new();
    for trade in trades {
        if !assets.contains(&trade.asset) {
            assets.push(trade.asset.clone());
        }
    }
    assets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn on(mut trade: Trade, day: u32, time: &str) -> Trade {
        trade.date = NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
        trade.time = core_types::parse_time_of_day(time).unwrap();
        trade
    }

    #[test]
    fn filters_by_asset_and_outcome() {
        let trades = vec![
            sample("EURUSD", dec!(10)),
            sample("EURUSD", dec!(-10)),
            sample("EURUSD", dec!(0)),
            sample("BTCUSD", dec!(10)),
        ];

        let euro_wins = TradeFilter {
            asset: Some("eurusd".to_string()),
            outcome: Outcome::Positive,
        };
        assert_eq!(euro_wins.apply(&trades).len(), 1);

        let losses = TradeFilter {
            asset: None,
            outcome: Outcome::Negative,
        };
        assert_eq!(losses.apply(&trades).len(), 1);

        assert_eq!(TradeFilter::default().apply(&trades).len(), 4);
    }

    #[test]
    fn history_is_newest_first() {
        let mut trades = vec![
            on(sample("A", dec!(1)), 3, "09:00"),
            on(sample("B", dec!(1)), 5, "08:00"),
            on(sample("C", dec!(1)), 5, "17:30"),
        ];
        sort_newest_first(&mut trades);
        let order: Vec<&str> = trades.iter().map(|t| t.asset.as_str()).collect();
        assert_eq!(order, vec!["C", "B", "A"]);
    }

    #[test]
    fn assets_are_listed_once_in_encounter_order() {
        let trades = vec![
            sample("GBPUSD", dec!(1)),
            sample("EURUSD", dec!(1)),
            sample("GBPUSD", dec!(1)),
        ];
        assert_eq!(distinct_assets(&trades), vec!["GBPUSD", "EURUSD"]);
    }

    #[test]
    fn outcome_parses_from_cli_words() {
        assert_eq!("Positive".parse::<Outcome>(), Ok(Outcome::Positive));
        assert_eq!("losses".parse::<Outcome>(), Ok(Outcome::Negative));
        assert!("maybe".parse::<Outcome>().is_err());
    }
}
