//! Money
//!
//! Cent rounding shared by every monetary calculation in the crate.

use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};

/// Number of fractional digits kept for every monetary amount.
pub const CENT_PLACES: u32 = 2;

/// Round an amount to whole cents, with ties rounding away from zero.
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CENT_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a money value to whole cents, keeping its currency.
pub fn round_money<'a>(money: &Money<'a, Currency>) -> Money<'a, Currency> {
    Money::from_decimal(round2(*money.amount()), money.currency())
}

/// Zero in the given currency.
pub fn zero(currency: &Currency) -> Money<'_, Currency> {
    Money::from_decimal(Decimal::ZERO, currency)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::COP;

    use super::*;

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(Decimal::new(1005, 3)), Decimal::new(101, 2));
        assert_eq!(round2(Decimal::new(-1005, 3)), Decimal::new(-101, 2));
        assert_eq!(round2(Decimal::new(1004, 3)), Decimal::new(100, 2));
    }

    #[test]
    fn round2_keeps_whole_cents() {
        assert_eq!(round2(Decimal::new(9000, 0)), Decimal::new(900_000, 2));
    }

    #[test]
    fn round_money_keeps_currency() {
        let money = Money::from_decimal(Decimal::new(12_345, 3), COP);
        let rounded = round_money(&money);

        assert_eq!(rounded, Money::from_decimal(Decimal::new(1235, 2), COP));
        assert_eq!(rounded.currency(), COP);
    }

    #[test]
    fn zero_is_zero() {
        assert!(zero(COP).is_zero());
    }
}
