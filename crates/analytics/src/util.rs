use rust_decimal::{Decimal, RoundingStrategy};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// `part / whole * 100`, or zero when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> Decimal {
    if whole == 0 {
        return Decimal::ZERO;
    }
    Decimal::from(part) * HUNDRED / Decimal::from(whole)
}

/// Arithmetic mean, or zero for an empty set.
pub fn mean(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    sum / Decimal::from(count)
}

/// Rounds to `dp` decimal places, halves away from zero.
pub fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Renders `value` rounded half-up with exactly `dp` decimal places.
pub fn fixed(value: Decimal, dp: u32) -> String {
    format!("{:.*}", dp as usize, round_half_up(value, dp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn percentage_guards_against_empty_sets() {
        assert_eq!(percentage(0, 0), Decimal::ZERO);
        assert_eq!(percentage(1, 2), dec!(50));
        assert_eq!(percentage(3, 3), dec!(100));
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_half_up(dec!(62.5), 0), dec!(63));
        assert_eq!(round_half_up(dec!(66.65), 1), dec!(66.7));
        assert_eq!(fixed(dec!(50), 1), "50.0");
        assert_eq!(fixed(percentage(2, 3), 0), "67");
        assert_eq!(fixed(percentage(1, 3), 1), "33.3");
    }

    #[test]
    fn mean_of_nothing_is_zero() {
        assert_eq!(mean(dec!(10), 0), Decimal::ZERO);
        assert_eq!(mean(dec!(10), 4), dec!(2.5));
    }
}
