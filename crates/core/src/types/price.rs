//! Type-safe price representation using decimal arithmetic.
//!
//! Amounts are `rust_decimal::Decimal` in the currency's standard unit
//! (dollars, not cents). Floating point never touches money.

use core::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a USD price.
    #[must_use]
    pub const fn usd(amount: Decimal) -> Self {
        Self::new(amount, CurrencyCode::USD)
    }

    /// Create a price from an amount in minor units (cents for USD).
    #[must_use]
    pub fn from_cents(cents: i64, currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::new(cents, 2), currency_code)
    }

    /// Round the amount to two decimal places, midpoint away from zero.
    #[must_use]
    pub fn rounded(self) -> Self {
        Self::new(round_cents(self.amount), self.currency_code)
    }

    /// Format for display, e.g. `$1,234.50`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = round_cents(self.amount);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let text = format!("{:.2}", rounded.abs());
        let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
        format!(
            "{sign}{}{}.{frac}",
            self.currency_code.symbol(),
            group_thousands(whole)
        )
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter ISO code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

/// Round an amount to cents, midpoint away from zero.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Whole-number percentage taken off `original` to reach `sale`.
///
/// Returns 0 when `original` is not positive or when `sale` is not lower.
#[must_use]
pub fn discount_percent(original: Decimal, sale: Decimal) -> u32 {
    if original <= Decimal::ZERO || sale >= original {
        return 0;
    }
    let percent = (original - sale) / original * Decimal::ONE_HUNDRED;
    percent
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_usd() {
        assert_eq!(Price::usd(Decimal::new(3500, 2)).display(), "$35.00");
        assert_eq!(Price::usd(Decimal::new(5, 1)).display(), "$0.50");
        assert_eq!(Price::usd(Decimal::ZERO).display(), "$0.00");
    }

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Price::usd(Decimal::new(123_450, 2)).display(), "$1,234.50");
        assert_eq!(
            Price::usd(Decimal::new(100_000_000, 2)).display(),
            "$1,000,000.00"
        );
    }

    #[test]
    fn test_display_other_currencies() {
        assert_eq!(
            Price::from_cents(999, CurrencyCode::GBP).to_string(),
            "£9.99"
        );
        assert_eq!(Price::from_cents(-250, CurrencyCode::EUR).display(), "-€2.50");
    }

    #[test]
    fn test_display_rounds_half_cent_up() {
        assert_eq!(Price::usd(Decimal::new(10_005, 3)).display(), "$10.01");
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(discount_percent(Decimal::from(100), Decimal::from(75)), 25);
        assert_eq!(discount_percent(Decimal::from(30), Decimal::from(20)), 33);
        assert_eq!(discount_percent(Decimal::from(20), Decimal::from(25)), 0);
        assert_eq!(discount_percent(Decimal::ZERO, Decimal::ZERO), 0);
    }

    #[test]
    fn test_currency_code_serde() {
        let json = serde_json::to_string(&CurrencyCode::CAD).unwrap();
        assert_eq!(json, "\"CAD\"");
        assert_eq!(CurrencyCode::default(), CurrencyCode::USD);
        assert_eq!(CurrencyCode::CAD.code(), "CAD");
    }
}
