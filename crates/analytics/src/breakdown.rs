//! Grouped views of the journal: by asset, by entry reason and by time of day.
//!
//! All three share one grouping routine ([`tally_by`]) fed with `(key, trade)`
//! pairs. Reason grouping is a fan-out: a trade tagged with N reasons yields N
//! pairs, so it is a multi-membership grouping rather than a partition.

use crate::util::{percentage, round_half_up};
use core_types::{EntryReason, Trade};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use std::ops::Range;

/// Win/loss tally for one group of trades.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Tally {
    pub wins: usize,
    pub losses: usize,
    pub breakeven: usize,
    pub total: Decimal,
}

impl Tally {
    fn record(&mut self, trade: &Trade) {
        if trade.is_breakeven() {
            self.breakeven += 1;
        } else if trade.is_win() {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
        self.total += trade.result;
    }

    /// Number of trades in the group, breakeven included.
    pub fn count(&self) -> usize {
        self.wins + self.losses + self.breakeven
    }

    pub fn win_rate_pct(&self) -> Decimal {
        percentage(self.wins, self.count())
    }
}

/// Tallies `(key, trade)` pairs, keeping keys in first-encounter order.
pub(crate) fn tally_by<'a, K, I>(pairs: I) -> IndexMap<K, Tally>
where
    K: Hash + Eq,
    I: IntoIterator<Item = (K, &'a Trade)>,
{
    let mut groups: IndexMap<K, Tally> = IndexMap::new();
    for (key, trade) in pairs {
        groups.entry(key).or_default().record(trade);
    }
    groups
}

/// One `(reason, trade)` pair per distinct tag on each trade.
pub(crate) fn reason_memberships(
    trades: &[Trade],
) -> impl Iterator<Item = (&EntryReason, &Trade)> {
    trades.iter().flat_map(|trade| {
        trade
            .reasons
            .iter()
            .enumerate()
            .filter(move |(i, reason)| !trade.reasons[..*i].contains(*reason))
            .map(move |(_, reason)| (reason, trade))
    })
}

pub(crate) fn asset_tallies(trades: &[Trade]) -> IndexMap<&str, Tally> {
    tally_by(trades.iter().map(|t| (t.asset.as_str(), t)))
}

pub(crate) fn reason_tallies(trades: &[Trade]) -> IndexMap<&EntryReason, Tally> {
    tally_by(reason_memberships(trades))
}

/// Tallies for the four periods, always in `TimeOfDay::ALL` order.
pub(crate) fn period_tallies(trades: &[Trade]) -> [(TimeOfDay, Tally); 4] {
    let mut periods = TimeOfDay::ALL.map(|period| (period, Tally::default()));
    for trade in trades {
        let period = TimeOfDay::from_hour(trade.hour());
        periods[period.index()].1.record(trade);
    }
    periods
}

/// The four fixed execution windows of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// 00:00 to 05:59
    Dawn,
    /// 06:00 to 11:59
    Morning,
    /// 12:00 to 17:59
    Afternoon,
    /// 18:00 to 23:59
    Evening,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Dawn,
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
    ];

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..6 => TimeOfDay::Dawn,
            6..12 => TimeOfDay::Morning,
            12..18 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }

    /// Half-open hour range covered by the period.
    pub fn hours(&self) -> Range<u32> {
        match self {
            TimeOfDay::Dawn => 0..6,
            TimeOfDay::Morning => 6..12,
            TimeOfDay::Afternoon => 12..18,
            TimeOfDay::Evening => 18..24,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeOfDay::Dawn => "Dawn",
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetPerformance {
    pub asset: String,
    pub total: Decimal,
    pub count: usize,
    /// |total| relative to the largest |total| in the breakdown, for bar widths.
    pub share_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonPerformance {
    pub reason: EntryReason,
    pub label: String,
    pub wins: usize,
    pub losses: usize,
    pub breakeven: usize,
    pub count: usize,
    pub total: Decimal,
    pub win_rate_pct: Decimal,
}

impl ReasonPerformance {
    pub fn win_rate_display(&self) -> Decimal {
        round_half_up(self.win_rate_pct, 1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodPerformance {
    pub period: TimeOfDay,
    pub wins: usize,
    pub losses: usize,
    pub breakeven: usize,
    pub count: usize,
    pub total: Decimal,
    pub win_rate_pct: Decimal,
    pub is_best: bool,
}

impl PeriodPerformance {
    /// Time blocks show whole percentages.
    pub fn win_rate_display(&self) -> Decimal {
        round_half_up(self.win_rate_pct, 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeOfDayBreakdown {
    /// Always four entries, Dawn to Evening.
    pub periods: Vec<PeriodPerformance>,
    /// Highest win rate among periods with at least one trade.
    pub best_period: Option<TimeOfDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakdowns {
    pub by_asset: Vec<AssetPerformance>,
    pub by_reason: Vec<ReasonPerformance>,
    pub by_time_of_day: TimeOfDayBreakdown,
}

pub fn compute_breakdowns(trades: &[Trade]) -> Breakdowns {
    Breakdowns {
        by_asset: by_asset(trades),
        by_reason: by_reason(trades),
        by_time_of_day: by_time_of_day(trades),
    }
}

/// Net result per asset, most profitable first.
pub fn by_asset(trades: &[Trade]) -> Vec<AssetPerformance> {
    let tallies = asset_tallies(trades);
    let scale = tallies
        .values()
        .map(|t| t.total.abs())
        .max()
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ONE);

    let mut rows: Vec<AssetPerformance> = tallies
        .into_iter()
        .map(|(asset, tally)| AssetPerformance {
            asset: asset.to_string(),
            total: tally.total,
            count: tally.count(),
            share_pct: tally.total.abs() * Decimal::ONE_HUNDRED / scale,
        })
        .collect();

    // Stable: equal totals keep journal order.
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows
}

/// Win rate per entry reason, best first.
pub fn by_reason(trades: &[Trade]) -> Vec<ReasonPerformance> {
    let mut rows: Vec<ReasonPerformance> = reason_tallies(trades)
        .into_iter()
        .map(|(reason, tally)| ReasonPerformance {
            reason: reason.clone(),
            label: reason.label().to_string(),
            wins: tally.wins,
            losses: tally.losses,
            breakeven: tally.breakeven,
            count: tally.count(),
            total: tally.total,
            win_rate_pct: tally.win_rate_pct(),
        })
        .collect();

    rows.sort_by(|a, b| b.win_rate_pct.cmp(&a.win_rate_pct));
    rows
}

/// Partitions the journal into the four periods and marks the best one.
pub fn by_time_of_day(trades: &[Trade]) -> TimeOfDayBreakdown {
    let tallies = period_tallies(trades);

    let mut best: Option<(TimeOfDay, Decimal)> = None;
    for (period, tally) in &tallies {
        if tally.count() == 0 {
            continue;
        }
        let rate = tally.win_rate_pct();
        if best.is_none_or(|(_, best_rate)| rate > best_rate) {
            best = Some((*period, rate));
        }
    }
    let best_period = best.map(|(period, _)| period);

    let periods = tallies
        .into_iter()
        .map(|(period, tally)| PeriodPerformance {
            period,
            wins: tally.wins,
            losses: tally.losses,
            breakeven: tally.breakeven,
            count: tally.count(),
            total: tally.total,
            win_rate_pct: tally.win_rate_pct(),
            is_best: best_period == Some(period),
        })
        .collect();

    tracing::debug!(best = ?best_period, "Computed time-of-day breakdown.");

    TimeOfDayBreakdown {
        periods,
        best_period,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::trade;
    use rust_decimal_macros::dec;

    #[test]
    fn asset_groups_are_ranked_by_total() {
        let trades = vec![
            trade("EURUSD", dec!(50), &["breakout"], "10:00"),
            trade("BTCUSD", dec!(-80), &["news"], "21:00"),
            trade("EURUSD", dec!(-20), &["breakout"], "10:00"),
            trade("GBPUSD", dec!(120), &["trend"], "15:00"),
        ];
        let rows = by_asset(&trades);

        let order: Vec<&str> = rows.iter().map(|r| r.asset.as_str()).collect();
        assert_eq!(order, vec!["GBPUSD", "EURUSD", "BTCUSD"]);
        assert_eq!(rows[1].total, dec!(30));
        assert_eq!(rows[1].count, 2);
        assert_eq!(rows[0].share_pct, dec!(100));
        assert_eq!(rows[1].share_pct, dec!(25));
    }

    #[test]
    fn asset_ties_keep_encounter_order() {
        let trades = vec![
            trade("USDJPY", dec!(10), &["trend"], "10:00"),
            trade("AUDUSD", dec!(10), &["trend"], "10:00"),
        ];
        let rows = by_asset(&trades);
        assert_eq!(rows[0].asset, "USDJPY");
        assert_eq!(rows[1].asset, "AUDUSD");
    }

    #[test]
    fn small_totals_scale_against_one() {
        let trades = vec![trade("EURUSD", dec!(0.5), &["trend"], "10:00")];
        assert_eq!(by_asset(&trades)[0].share_pct, dec!(50));
    }

    #[test]
    fn reasons_fan_out_per_tag() {
        let trades = vec![
            trade("EURUSD", dec!(50), &["breakout", "trend"], "10:00"),
            trade("EURUSD", dec!(-20), &["breakout"], "10:00"),
            trade("EURUSD", dec!(0), &["trend", "trend"], "10:00"),
        ];
        let rows = by_reason(&trades);

        let memberships: usize = rows.iter().map(|r| r.count).sum();
        assert_eq!(memberships, 4);

        let trend = rows.iter().find(|r| r.reason == EntryReason::Trend).unwrap();
        assert_eq!((trend.wins, trend.losses, trend.breakeven), (1, 0, 1));
        assert_eq!(trend.win_rate_pct, dec!(50));
        assert_eq!(trend.label, "Trend following");

        let breakout = rows.iter().find(|r| r.reason == EntryReason::Breakout).unwrap();
        assert_eq!(breakout.total, dec!(30));
    }

    #[test]
    fn reasons_are_ranked_by_win_rate_with_stable_ties() {
        let trades = vec![
            trade("EURUSD", dec!(-5), &["reversal"], "10:00"),
            trade("EURUSD", dec!(5), &["news"], "10:00"),
            trade("EURUSD", dec!(5), &["zone-touch"], "10:00"),
        ];
        let order: Vec<EntryReason> = by_reason(&trades).into_iter().map(|r| r.reason).collect();
        assert_eq!(
            order,
            vec![EntryReason::News, EntryReason::ZoneTouch, EntryReason::Reversal]
        );
    }

    #[test]
    fn unknown_and_missing_reasons_are_tolerated() {
        let mut untagged = trade("EURUSD", dec!(10), &[], "10:00");
        untagged.reasons.clear();
        let trades = vec![untagged, trade("EURUSD", dec!(10), &["gut feeling"], "10:00")];
        let rows = by_reason(&trades);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "gut feeling");
        assert_eq!(rows[0].count, 1);
    }

    #[test]
    fn hour_boundaries() {
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Dawn);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Dawn);
        assert_eq!(TimeOfDay::from_hour(6), TimeOfDay::Morning);
        assert_eq!(TimeOfDay::from_hour(12), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Afternoon);
        assert_eq!(TimeOfDay::from_hour(18), TimeOfDay::Evening);
        assert_eq!(TimeOfDay::from_hour(23), TimeOfDay::Evening);
        for period in TimeOfDay::ALL {
            for hour in period.hours() {
                assert_eq!(TimeOfDay::from_hour(hour), period);
            }
        }
    }

    #[test]
    fn periods_partition_the_journal() {
        let trades = vec![
            trade("EURUSD", dec!(10), &["trend"], "00:00"),
            trade("EURUSD", dec!(-10), &["trend"], "23:59"),
            trade("EURUSD", dec!(10), &["trend"], "11:59"),
            trade("EURUSD", dec!(0), &["trend"], "12:00"),
            trade("EURUSD", dec!(10), &["trend"], "18:00"),
        ];
        let breakdown = by_time_of_day(&trades);

        assert_eq!(breakdown.periods.len(), 4);
        let counts: Vec<usize> = breakdown.periods.iter().map(|p| p.count).collect();
        assert_eq!(counts, vec![1, 1, 1, 2]);
        assert_eq!(counts.iter().sum::<usize>(), trades.len());
        assert_eq!(breakdown.periods[3].win_rate_pct, dec!(50));

        let afternoon = &breakdown.periods[2];
        assert_eq!((afternoon.wins, afternoon.losses, afternoon.breakeven), (0, 0, 1));
        assert_eq!(afternoon.win_rate_pct, dec!(0));
    }

    #[test]
    fn best_period_prefers_the_earliest_on_ties() {
        let trades = vec![
            trade("EURUSD", dec!(10), &["trend"], "20:00"),
            trade("EURUSD", dec!(10), &["trend"], "07:00"),
            trade("EURUSD", dec!(-10), &["trend"], "13:00"),
        ];
        let breakdown = by_time_of_day(&trades);

        assert_eq!(breakdown.best_period, Some(TimeOfDay::Morning));
        let flagged: Vec<TimeOfDay> = breakdown
            .periods
            .iter()
            .filter(|p| p.is_best)
            .map(|p| p.period)
            .collect();
        assert_eq!(flagged, vec![TimeOfDay::Morning]);
    }

    #[test]
    fn a_single_losing_period_is_still_best() {
        let trades = vec![trade("EURUSD", dec!(-10), &["trend"], "03:00")];
        assert_eq!(by_time_of_day(&trades).best_period, Some(TimeOfDay::Dawn));
    }

    #[test]
    fn empty_journal_has_no_best_period() {
        let breakdown = by_time_of_day(&[]);
        assert_eq!(breakdown.best_period, None);
        assert!(breakdown.periods.iter().all(|p| p.count == 0 && !p.is_best));
        assert!(by_asset(&[]).is_empty());
        assert!(by_reason(&[]).is_empty());
    }

    #[test]
    fn period_display_rate_is_whole() {
        let trades = vec![
            trade("EURUSD", dec!(10), &["trend"], "08:00"),
            trade("EURUSD", dec!(10), &["trend"], "09:00"),
            trade("EURUSD", dec!(-10), &["trend"], "10:00"),
        ];
        let morning = &by_time_of_day(&trades).periods[1];
        assert_eq!(morning.win_rate_display(), dec!(67));
    }
}
