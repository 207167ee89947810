//! Discounts
//!
//! Candidate unit prices produced by a single promotion rule.

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::money::round2;

/// Errors specific to discount calculations.
#[derive(Debug, Error, PartialEq)]
pub enum DiscountError {
    /// The rule kind is not one this engine knows how to apply.
    #[error("unsupported discount kind: {0}")]
    Unsupported(String),

    /// Candidate calculation overflowed the decimal range.
    #[error("discount calculation overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Discount configuration for a promotion.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscountRule<'a> {
    /// Take a percentage off the unit price; `10` means 10% off.
    Percent(Decimal),

    /// Subtract a fixed amount from the unit price (e.g., "2000 off").
    Fixed(Money<'a, Currency>),

    /// A discount kind that was configured but is not understood.
    ///
    /// Kept so that it can be reported and then ignored instead of rejected.
    Unsupported(String),
}

impl<'a> DiscountRule<'a> {
    /// Short machine name of the rule kind.
    pub fn kind(&self) -> &str {
        match self {
            Self::Percent(_) => "percent",
            Self::Fixed(_) => "fixed",
            Self::Unsupported(kind) => kind,
        }
    }

    /// Calculate the candidate unit price for `base`, rounded to whole cents and floored at zero.
    ///
    /// # Errors
    ///
    /// - [`DiscountError::Unsupported`]: the rule is [`DiscountRule::Unsupported`].
    /// - [`DiscountError::Overflow`]: the arithmetic left the decimal range.
    /// - [`DiscountError::Money`]: a fixed amount is in a different currency from `base`.
    pub fn candidate_price(
        &self,
        base: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, DiscountError> {
        let base_amount = *base.amount();

        let discounted = match self {
            Self::Percent(points) => {
                let remaining = points
                    .checked_div(Decimal::ONE_HUNDRED)
                    .and_then(|fraction| Decimal::ONE.checked_sub(fraction))
                    .ok_or(DiscountError::Overflow)?;

                base_amount
                    .checked_mul(remaining)
                    .ok_or(DiscountError::Overflow)?
            }
            Self::Fixed(amount) => {
                if amount.currency() != base.currency() {
                    return Err(MoneyError::CurrencyMismatch {
                        expected: base.currency().iso_alpha_code,
                        actual: amount.currency().iso_alpha_code,
                    }
                    .into());
                }

                base_amount
                    .checked_sub(*amount.amount())
                    .ok_or(DiscountError::Overflow)?
            }
            Self::Unsupported(kind) => return Err(DiscountError::Unsupported(kind.clone())),
        };

        Ok(Money::from_decimal(
            round2(discounted.max(Decimal::ZERO)),
            base.currency(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{COP, USD};
    use testresult::TestResult;

    use super::*;

    fn cop(amount: i64) -> Money<'static, Currency> {
        Money::from_decimal(Decimal::from(amount), COP)
    }

    #[test]
    fn percent_takes_points_off_base() -> TestResult {
        let rule = DiscountRule::Percent(Decimal::from(10));

        assert_eq!(rule.candidate_price(&cop(10_000))?, cop(9_000));

        Ok(())
    }

    #[test]
    fn percent_rounds_candidate_half_up() -> TestResult {
        // 0.05 * 0.9 = 0.045
        let rule = DiscountRule::Percent(Decimal::from(10));
        let base = Money::from_decimal(Decimal::new(5, 2), COP);

        let candidate = rule.candidate_price(&base)?;

        assert_eq!(*candidate.amount(), Decimal::new(5, 2));

        Ok(())
    }

    #[test]
    fn percent_over_one_hundred_floors_at_zero() -> TestResult {
        let rule = DiscountRule::Percent(Decimal::from(150));

        assert_eq!(rule.candidate_price(&cop(4_000))?, cop(0));

        Ok(())
    }

    #[test]
    fn fixed_subtracts_amount() -> TestResult {
        let rule = DiscountRule::Fixed(cop(2_000));

        assert_eq!(rule.candidate_price(&cop(5_000))?, cop(3_000));

        Ok(())
    }

    #[test]
    fn fixed_floors_at_zero() -> TestResult {
        let rule = DiscountRule::Fixed(cop(7_000));

        assert_eq!(rule.candidate_price(&cop(5_000))?, cop(0));

        Ok(())
    }

    #[test]
    fn fixed_in_other_currency_is_rejected() {
        let rule = DiscountRule::Fixed(Money::from_decimal(Decimal::ONE, USD));

        assert_eq!(
            rule.candidate_price(&cop(5_000)),
            Err(DiscountError::Money(MoneyError::CurrencyMismatch {
                expected: COP.iso_alpha_code,
                actual: USD.iso_alpha_code,
            }))
        );
    }

    #[test]
    fn unsupported_rule_is_reported() {
        let rule = DiscountRule::Unsupported("bogo".to_string());

        assert_eq!(rule.kind(), "bogo");
        assert_eq!(
            rule.candidate_price(&cop(5_000)),
            Err(DiscountError::Unsupported("bogo".to_string()))
        );
    }

    #[test]
    fn percent_overflow_is_reported() {
        let rule = DiscountRule::Percent(Decimal::MIN);

        assert_eq!(
            rule.candidate_price(&Money::from_decimal(Decimal::MAX, COP)),
            Err(DiscountError::Overflow)
        );
    }
}
