use crate::breakdown::{self, Breakdowns};
use crate::format::{AmountFormatter, PlainAmountFormatter};
use crate::insights::{Insight, InsightGenerator};
use crate::report::{ProfitFactor, TradeStats};
use crate::util::{mean, percentage};
use core_types::Trade;
use rust_decimal::Decimal;
use serde::Serialize;

/// Everything the analysis view shows for one snapshot of the journal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JournalAnalysis {
    pub stats: TradeStats,
    pub breakdowns: Breakdowns,
    pub insights: Vec<Insight>,
}

/// A stateless calculator for deriving performance metrics from the journal.
///
/// Every method borrows an immutable snapshot of trades, so the engine can be
/// shared freely between callers.
#[derive(Debug, Default)]
pub struct AnalyticsEngine<F = PlainAmountFormatter> {
    insights: InsightGenerator<F>,
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: AmountFormatter> AnalyticsEngine<F> {
    /// An engine whose insight text renders amounts with `formatter`.
    pub fn with_formatter(formatter: F) -> Self {
        Self {
            insights: InsightGenerator::with_formatter(formatter),
        }
    }

    /// Runs every calculation over `trades`.
    pub fn analyze(&self, trades: &[Trade]) -> JournalAnalysis {
        let stats = self.compute_stats(trades);
        let breakdowns = self.compute_breakdowns(trades);
        let insights = self.generate_insights(trades, &stats);
        JournalAnalysis {
            stats,
            breakdowns,
            insights,
        }
    }

    pub fn compute_stats(&self, trades: &[Trade]) -> TradeStats {
        compute_stats(trades)
    }

    pub fn compute_breakdowns(&self, trades: &[Trade]) -> Breakdowns {
        breakdown::compute_breakdowns(trades)
    }

    pub fn generate_insights(&self, trades: &[Trade], stats: &TradeStats) -> Vec<Insight> {
        self.insights.generate(trades, stats)
    }
}

/// Aggregates win/loss counts, averages, profit factor and net profit.
///
/// Total over any input: an empty slice yields [`TradeStats::new`].
pub fn compute_stats(trades: &[Trade]) -> TradeStats {
    let mut stats = TradeStats::new();

    if trades.is_empty() {
        return stats;
    }

    stats.total_trades = trades.len();

    for trade in trades {
        stats.total_profit += trade.result;

        if trade.is_breakeven() {
            stats.breakeven += 1;
        } else if trade.is_win() {
            stats.total_win_amount += trade.result;
            stats.wins += 1;
        } else {
            stats.total_loss_amount += trade.result.abs();
            stats.losses += 1;
        }
    }

    // --- Ratios ---
    stats.win_rate_pct = percentage(stats.wins, stats.total_trades);
    stats.average_win = mean(stats.total_win_amount, stats.wins);
    stats.average_loss = mean(stats.total_loss_amount, stats.losses);
    stats.profit_factor =
        ProfitFactor::from_totals(stats.total_win_amount, stats.total_loss_amount);

    tracing::debug!(
        total = stats.total_trades,
        wins = stats.wins,
        losses = stats.losses,
        profit_factor = %stats.profit_factor,
        "Computed journal stats."
    );

    stats
}

/// Net result of `trades`, the header figure of the journal.
pub fn total_profit(trades: &[Trade]) -> Decimal {
    trades.iter().map(|t| t.result).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::trade;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_journal_is_all_zeroes() {
        let stats = compute_stats(&[]);
        assert_eq!(stats, TradeStats::new());
        assert_eq!(stats.profit_factor, ProfitFactor::Finite(Decimal::ZERO));
    }

    #[test]
    fn breakeven_is_neither_win_nor_loss() {
        let trades = vec![
            trade("EURUSD", dec!(100), &["trend"], "09:00"),
            trade("EURUSD", dec!(-40), &["trend"], "10:00"),
            trade("GBPUSD", dec!(0), &["breakout"], "11:00"),
            trade("GBPUSD", dec!(-60), &["breakout"], "12:00"),
        ];
        let stats = compute_stats(&trades);

        assert_eq!(stats.total_trades, 4);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.losses, 2);
        assert_eq!(stats.breakeven, 1);
        assert!(stats.wins + stats.losses <= stats.total_trades);
        assert_eq!(stats.win_rate_pct, dec!(25));
        assert_eq!(stats.average_win, dec!(100));
        assert_eq!(stats.average_loss, dec!(50));
        assert_eq!(stats.total_win_amount, dec!(100));
        assert_eq!(stats.total_loss_amount, dec!(100));
        assert_eq!(stats.profit_factor, ProfitFactor::Finite(dec!(1)));
        assert_eq!(stats.total_profit, dec!(0));
        assert_eq!(total_profit(&trades), dec!(0));
    }

    #[test]
    fn only_breakeven_trades_have_zero_profit_factor() {
        let trades = vec![
            trade("EURUSD", dec!(0), &["trend"], "09:00"),
            trade("EURUSD", dec!(0), &["trend"], "10:00"),
        ];
        let stats = compute_stats(&trades);
        assert_eq!(stats.win_rate_pct, Decimal::ZERO);
        assert_eq!(stats.profit_factor, ProfitFactor::Finite(Decimal::ZERO));
    }

    #[test]
    fn win_rate_display_rounds_to_one_decimal() {
        let trades = vec![
            trade("EURUSD", dec!(10), &["trend"], "09:00"),
            trade("EURUSD", dec!(-10), &["trend"], "10:00"),
            trade("EURUSD", dec!(-10), &["trend"], "11:00"),
        ];
        let stats = compute_stats(&trades);
        assert_eq!(stats.win_rate_display(), dec!(33.3));
    }

    #[test]
    fn analyze_is_deterministic() {
        let engine = AnalyticsEngine::new();
        let trades = vec![
            trade("EURUSD", dec!(50), &["breakout", "trend"], "10:00"),
            trade("EURUSD", dec!(-20), &["breakout"], "10:30"),
            trade("BTCUSD", dec!(75), &["news"], "20:00"),
        ];
        assert_eq!(engine.analyze(&trades), engine.analyze(&trades));
    }
}
