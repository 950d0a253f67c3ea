use crate::util::fixed;
use rust_decimal::Decimal;

/// Renders a currency amount for insight text.
///
/// Presentation owns the real formatting rules (locale, symbol). The core only
/// needs something that turns a signed amount into a string.
pub trait AmountFormatter {
    fn format_amount(&self, amount: Decimal) -> String;
}

/// Signed amount with two decimals and an optional currency code,
/// e.g. `+1250.00 USD` or `-20.50`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainAmountFormatter {
    currency: Option<String>,
}

impl PlainAmountFormatter {
    pub const fn new() -> Self {
        Self { currency: None }
    }

    pub fn with_currency(currency: impl Into<String>) -> Self {
        let currency = currency.into();
        Self {
            currency: (!currency.trim().is_empty()).then(|| currency.trim().to_uppercase()),
        }
    }
}

impl AmountFormatter for PlainAmountFormatter {
    fn format_amount(&self, amount: Decimal) -> String {
        let sign = if amount >= Decimal::ZERO { '+' } else { '-' };
        let body = fixed(amount.abs(), 2);
        match &self.currency {
            Some(code) => format!("{sign}{body} {code}"),
            None => format!("{sign}{body}"),
        }
    }
}

impl<F: AmountFormatter + ?Sized> AmountFormatter for &F {
    fn format_amount(&self, amount: Decimal) -> String {
        (**self).format_amount(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amounts_are_signed() {
        let plain = PlainAmountFormatter::new();
        assert_eq!(plain.format_amount(dec!(30)), "+30.00");
        assert_eq!(plain.format_amount(dec!(-20.505)), "-20.51");
        assert_eq!(plain.format_amount(Decimal::ZERO), "+0.00");
    }

    #[test]
    fn currency_code_is_appended() {
        let brl = PlainAmountFormatter::with_currency("brl");
        assert_eq!(brl.format_amount(dec!(1250)), "+1250.00 BRL");
        assert_eq!(PlainAmountFormatter::with_currency(" "), PlainAmountFormatter::new());
    }
}
