//! Rule-based observations over the journal.
//!
//! Each rule is an independent pure function that either produces one
//! [`Insight`] or nothing. The generator evaluates them in a fixed order and
//! keeps that order for display. Rules never share intermediate state: the
//! groupings they need are recomputed from the trade snapshot.

use crate::breakdown::{Tally, asset_tallies, period_tallies, reason_tallies};
use crate::format::{AmountFormatter, PlainAmountFormatter};
use crate::report::TradeStats;
use crate::util::{fixed, mean, percentage};
use core_types::Trade;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Positive,
    Warning,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// Icon name from the UI's icon set (e.g. "zap", "clock").
    pub icon: String,
    pub severity: Severity,
    pub title: String,
    pub text: String,
}

impl Insight {
    fn new(icon: &str, severity: Severity, title: &str, text: String) -> Self {
        Self {
            icon: icon.to_string(),
            severity,
            title: title.to_string(),
            text,
        }
    }

    /// Shown when no rule has anything to say yet.
    pub fn collecting_data() -> Self {
        Self::new(
            "info",
            Severity::Neutral,
            "Collecting data...",
            "Keep logging your trades to receive personalized insights about your trading."
                .to_string(),
        )
    }
}

/// Groups smaller than this are ignored by the "best of" rules.
const MIN_GROUP_SIZE: usize = 2;
/// Journals smaller than this are not judged on consistency or profit factor.
const MIN_JUDGED_TRADES: usize = 5;
const MIN_STOP_SAMPLE: usize = 3;

const GOOD_PATTERN_RATE: Decimal = dec!(50);
const HIGH_RATE: Decimal = dec!(55);
const LOW_RATE: Decimal = dec!(40);
const GOOD_PROFIT_FACTOR: Decimal = dec!(1.5);

struct RuleInput<'a> {
    trades: &'a [Trade],
    stats: &'a TradeStats,
    amounts: &'a dyn AmountFormatter,
}

type Rule = fn(&RuleInput<'_>) -> Option<Insight>;

/// Evaluation and display order.
const RULES: [Rule; 6] = [
    best_reason,
    best_period,
    stop_distance,
    best_asset,
    consistency,
    profit_factor,
];

/// Evaluates the insight rules against a trade snapshot.
#[derive(Debug, Clone, Default)]
pub struct InsightGenerator<F = PlainAmountFormatter> {
    formatter: F,
}

impl InsightGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: AmountFormatter> InsightGenerator<F> {
    pub fn with_formatter(formatter: F) -> Self {
        Self { formatter }
    }

    /// Runs every rule in order. Never returns an empty list.
    pub fn generate(&self, trades: &[Trade], stats: &TradeStats) -> Vec<Insight> {
        let input = RuleInput {
            trades,
            stats,
            amounts: &self.formatter,
        };

        let mut insights: Vec<Insight> = RULES.iter().filter_map(|rule| rule(&input)).collect();
        tracing::debug!(fired = insights.len(), "Evaluated insight rules.");

        if insights.is_empty() {
            insights.push(Insight::collecting_data());
        }
        insights
    }
}

/// Generates insights with the default amount formatting.
pub fn generate_insights(trades: &[Trade], stats: &TradeStats) -> Vec<Insight> {
    InsightGenerator::new().generate(trades, stats)
}

/// First group with the strictly highest win rate among groups of at least
/// `MIN_GROUP_SIZE` trades.
fn best_by_win_rate<K>(groups: impl IntoIterator<Item = (K, Tally)>) -> Option<(K, Decimal)> {
    let mut best: Option<(K, Decimal)> = None;
    for (key, tally) in groups {
        if tally.count() < MIN_GROUP_SIZE {
            continue;
        }
        let rate = tally.win_rate_pct();
        if best.as_ref().is_none_or(|(_, best_rate)| rate > *best_rate) {
            best = Some((key, rate));
        }
    }
    best
}

fn best_reason(input: &RuleInput<'_>) -> Option<Insight> {
    let (reason, rate) = best_by_win_rate(reason_tallies(input.trades))?;
    (rate >= GOOD_PATTERN_RATE).then(|| {
        Insight::new(
            "zap",
            Severity::Positive,
            "Winning Pattern Identified",
            format!(
                "When you enter on \"{}\", your win rate is {}%. Keep using this criterion!",
                reason.label(),
                fixed(rate, 0)
            ),
        )
    })
}

fn best_period(input: &RuleInput<'_>) -> Option<Insight> {
    let (period, rate) = best_by_win_rate(period_tallies(input.trades))?;
    (rate >= GOOD_PATTERN_RATE).then(|| {
        Insight::new(
            "clock",
            Severity::Positive,
            "Best Trading Time",
            format!(
                "Your trades in the {} have a {}% win rate. Consider focusing on this window.",
                period.label().to_lowercase(),
                fixed(rate, 0)
            ),
        )
    })
}

/// Compares trades whose stop sits closer than average against the rest.
fn stop_distance(input: &RuleInput<'_>) -> Option<Insight> {
    let trades = input.trades;
    if trades.len() < MIN_STOP_SAMPLE {
        return None;
    }

    let distance_sum: Decimal = trades.iter().map(Trade::stop_distance).sum();
    let average = mean(distance_sum, trades.len());

    let tight: Vec<&Trade> = trades
        .iter()
        .filter(|t| t.stop_distance() < average)
        .collect();
    if tight.len() < MIN_GROUP_SIZE {
        return None;
    }

    let wins = tight.iter().filter(|t| t.is_win()).count();
    let rate = percentage(wins, tight.len());
    tracing::debug!(%average, tight = tight.len(), %rate, "Stop distance rule.");

    if rate >= HIGH_RATE {
        Some(Insight::new(
            "shield",
            Severity::Positive,
            "Tight Stops Work",
            format!(
                "Trades with a stop loss below your average have a {}% win rate. Tighter stops seem to work well for you.",
                fixed(rate, 0)
            ),
        ))
    } else if rate < LOW_RATE {
        Some(Insight::new(
            "alert-triangle",
            Severity::Warning,
            "Watch Your Stops",
            format!(
                "Trades with very tight stops only win {}% of the time. Consider giving your trades more room.",
                fixed(rate, 0)
            ),
        ))
    } else {
        None
    }
}

fn best_asset(input: &RuleInput<'_>) -> Option<Insight> {
    let mut best: Option<(&str, Tally)> = None;
    for (asset, tally) in asset_tallies(input.trades) {
        if tally.count() < MIN_GROUP_SIZE {
            continue;
        }
        if best.is_none_or(|(_, leader)| tally.total > leader.total) {
            best = Some((asset, tally));
        }
    }

    let (asset, tally) = best?;
    (tally.total > Decimal::ZERO).then(|| {
        Insight::new(
            "trophy",
            Severity::Positive,
            "Your Best Asset",
            format!(
                "{asset} is your most profitable asset with {} across {} trades.",
                input.amounts.format_amount(tally.total),
                tally.count()
            ),
        )
    })
}

fn consistency(input: &RuleInput<'_>) -> Option<Insight> {
    let stats = input.stats;
    if stats.win_rate_pct >= HIGH_RATE {
        Some(Insight::new(
            "trending-up",
            Severity::Positive,
            "Great Consistency!",
            format!(
                "With a {}% win rate you are above average. Keep following your plan!",
                fixed(stats.win_rate_pct, 1)
            ),
        ))
    } else if stats.win_rate_pct < LOW_RATE && stats.total_trades >= MIN_JUDGED_TRADES {
        Some(Insight::new(
            "alert-circle",
            Severity::Warning,
            "Review Your Strategy",
            format!(
                "A {}% win rate is below target. Consider reviewing your entry criteria.",
                fixed(stats.win_rate_pct, 1)
            ),
        ))
    } else {
        None
    }
}

fn profit_factor(input: &RuleInput<'_>) -> Option<Insight> {
    let stats = input.stats;
    let fires = stats.profit_factor.at_least(GOOD_PROFIT_FACTOR)
        && stats.total_trades >= MIN_JUDGED_TRADES;
    fires.then(|| {
        Insight::new(
            "star",
            Severity::Positive,
            "Excellent Risk Management",
            format!(
                "A profit factor of {} shows your gains comfortably outweigh your losses. Great work!",
                stats.profit_factor
            ),
        )
    })
}
