use crate::util::{fixed, round_half_up};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gross profit divided by gross loss.
///
/// A journal with winners and no losers has an unbounded profit factor. That
/// case is kept distinct from every finite ratio instead of being clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ProfitFactor {
    Finite(Decimal),
    Unbounded,
}

impl ProfitFactor {
    /// Ratio of the two gross amounts, both given as non-negative values.
    pub fn from_totals(total_win_amount: Decimal, total_loss_amount: Decimal) -> Self {
        if total_loss_amount > Decimal::ZERO {
            ProfitFactor::Finite(total_win_amount / total_loss_amount)
        } else if total_win_amount > Decimal::ZERO {
            ProfitFactor::Unbounded
        } else {
            ProfitFactor::Finite(Decimal::ZERO)
        }
    }

    /// The finite value, or `None` when unbounded.
    pub fn value(&self) -> Option<Decimal> {
        match self {
            ProfitFactor::Finite(value) => Some(*value),
            ProfitFactor::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, ProfitFactor::Unbounded)
    }

    pub fn at_least(&self, threshold: Decimal) -> bool {
        self.value().is_none_or(|value| value >= threshold)
    }
}

impl Default for ProfitFactor {
    fn default() -> Self {
        ProfitFactor::Finite(Decimal::ZERO)
    }
}

impl fmt::Display for ProfitFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfitFactor::Finite(value) => f.write_str(&fixed(*value, 2)),
            ProfitFactor::Unbounded => f.write_str("∞"),
        }
    }
}

impl From<ProfitFactor> for String {
    fn from(pf: ProfitFactor) -> Self {
        match pf {
            ProfitFactor::Finite(value) => value.to_string(),
            ProfitFactor::Unbounded => "unbounded".to_string(),
        }
    }
}

impl TryFrom<String> for ProfitFactor {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        match raw.as_str() {
            "unbounded" | "∞" | "Infinity" => Ok(ProfitFactor::Unbounded),
            other => Decimal::from_str(other)
                .map(ProfitFactor::Finite)
                .map_err(|e| format!("invalid profit factor '{other}': {e}")),
        }
    }
}

/// Aggregate performance over a set of trades.
///
/// Breakeven trades count towards `total_trades` and `total_profit` but are
/// neither wins nor losses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeStats {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakeven: usize,
    /// Percentage of all trades that were wins, in `[0, 100]`.
    pub win_rate_pct: Decimal,
    pub average_win: Decimal,
    /// Mean absolute loss.
    pub average_loss: Decimal,
    pub total_win_amount: Decimal,
    /// Sum of absolute losses.
    pub total_loss_amount: Decimal,
    pub profit_factor: ProfitFactor,
    pub total_profit: Decimal,
}

impl TradeStats {
    /// Creates a new, zeroed-out `TradeStats`, the result for an empty journal.
    pub fn new() -> Self {
        Self {
            total_trades: 0,
            wins: 0,
            losses: 0,
            breakeven: 0,
            win_rate_pct: Decimal::ZERO,
            average_win: Decimal::ZERO,
            average_loss: Decimal::ZERO,
            total_win_amount: Decimal::ZERO,
            total_loss_amount: Decimal::ZERO,
            profit_factor: ProfitFactor::default(),
            total_profit: Decimal::ZERO,
        }
    }

    /// Win rate as shown on the stats card (one decimal).
    pub fn win_rate_display(&self) -> Decimal {
        round_half_up(self.win_rate_pct, 1)
    }
}

impl Default for TradeStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn profit_factor_edge_cases() {
        assert_eq!(ProfitFactor::from_totals(dec!(0), dec!(0)), ProfitFactor::Finite(dec!(0)));
        assert_eq!(ProfitFactor::from_totals(dec!(10), dec!(0)), ProfitFactor::Unbounded);
        assert_eq!(ProfitFactor::from_totals(dec!(0), dec!(10)), ProfitFactor::Finite(dec!(0)));
        assert_eq!(ProfitFactor::from_totals(dec!(30), dec!(20)), ProfitFactor::Finite(dec!(1.5)));
    }

    #[test]
    fn unbounded_clears_any_threshold() {
        assert!(ProfitFactor::Unbounded.at_least(dec!(1000000)));
        assert!(ProfitFactor::Finite(dec!(1.5)).at_least(dec!(1.5)));
        assert!(!ProfitFactor::Finite(dec!(1.49)).at_least(dec!(1.5)));
        assert_eq!(ProfitFactor::Unbounded.value(), None);
    }

    #[test]
    fn profit_factor_display_and_serde() {
        assert_eq!(ProfitFactor::Unbounded.to_string(), "∞");
        assert_eq!(ProfitFactor::Finite(dec!(2.005)).to_string(), "2.01");

        let json = serde_json::to_string(&ProfitFactor::Unbounded).unwrap();
        assert_eq!(json, r#""unbounded""#);
        let back: ProfitFactor = serde_json::from_str(&json).unwrap();
        assert!(back.is_unbounded());
        let finite: ProfitFactor = serde_json::from_str(r#""1.25""#).unwrap();
        assert_eq!(finite, ProfitFactor::Finite(dec!(1.25)));
    }
}
