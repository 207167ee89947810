//! Orders
//!
//! Frozen order records. Once an order is placed its lines keep the unit prices charged at
//! sale time, independent of later catalog or promotion changes.

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    money::{round2, round_money, zero},
    pricing::{OrderTotals, PricedCart, PricedLine},
    products::{Product, ProductKey},
    promotions::PromotionKey,
};

/// Payment method recorded when the caller does not pick one.
pub const DEFAULT_PAYMENT_METHOD: &str = "Cash";

/// Errors raised while building or totalling an order.
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    /// A line amount overflowed the decimal range.
    #[error("line amount for {0} overflowed")]
    Overflow(String),

    /// A line is priced in a different currency from the order.
    #[error("line has currency {0}, but order has currency {1}")]
    CurrencyMismatch(&'static str, &'static str),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// One frozen order line.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine<'a> {
    /// Product key at the time of sale
    pub product: ProductKey,

    /// Product name at the time of sale
    pub product_name: String,

    /// Number of units
    pub quantity: u32,

    /// Unit price charged
    pub unit_price: Money<'a, Currency>,

    /// Undiscounted line amount
    pub line_subtotal: Money<'a, Currency>,

    /// Amount saved on the line
    pub line_discount: Money<'a, Currency>,

    /// Amount charged for the line
    pub line_total: Money<'a, Currency>,

    /// Promotion that set the unit price, if any
    pub promotion: Option<PromotionKey>,
}

impl<'a> OrderLine<'a> {
    /// Freeze a line at the product's base price, with no discount.
    ///
    /// Used when a line is recorded without going through the pricing engine.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Overflow`] if `base price * quantity` leaves the decimal range.
    pub fn at_base_price(product: &Product<'a>, quantity: u32) -> Result<Self, OrderError> {
        let unit_price = round_money(&product.price);
        let currency = unit_price.currency();

        let line_subtotal = unit_price
            .amount()
            .checked_mul(Decimal::from(quantity))
            .map(|amount| Money::from_decimal(round2(amount), currency))
            .ok_or_else(|| OrderError::Overflow(product.slug.clone()))?;

        Ok(Self {
            product: product.key,
            product_name: product.name.clone(),
            quantity,
            unit_price,
            line_subtotal,
            line_discount: zero(currency),
            line_total: line_subtotal,
            promotion: None,
        })
    }
}

impl<'a> From<&PricedLine<'_, 'a>> for OrderLine<'a> {
    fn from(line: &PricedLine<'_, 'a>) -> Self {
        Self {
            product: line.product.key,
            product_name: line.product.name.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_subtotal: line.line_subtotal,
            line_discount: line.line_discount,
            line_total: line.line_total,
            promotion: line.promotion,
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order<'a> {
    /// When the order was priced
    pub placed_at: Timestamp,

    /// How the customer paid
    pub payment_method: String,

    /// Order currency
    pub currency: &'a Currency,

    /// Frozen lines, in checkout order
    pub lines: SmallVec<[OrderLine<'a>; 8]>,

    /// Order totals
    pub totals: OrderTotals<'a>,
}

impl<'a> Order<'a> {
    /// Create an empty order.
    pub fn new(
        currency: &'a Currency,
        payment_method: impl Into<String>,
        placed_at: Timestamp,
    ) -> Self {
        Self {
            placed_at,
            payment_method: payment_method.into(),
            currency,
            lines: SmallVec::new(),
            totals: OrderTotals {
                subtotal: zero(currency),
                discount_total: zero(currency),
                total: zero(currency),
            },
        }
    }

    /// Freeze a priced cart into an order, keeping its totals.
    pub fn from_priced_cart(
        priced: &PricedCart<'_, 'a>,
        payment_method: impl Into<String>,
        placed_at: Timestamp,
    ) -> Self {
        Self {
            placed_at,
            payment_method: payment_method.into(),
            currency: priced.totals.total.currency(),
            lines: priced.lines.iter().map(OrderLine::from).collect(),
            totals: priced.totals,
        }
    }

    /// Append a line and refresh the totals.
    ///
    /// # Errors
    ///
    /// - [`OrderError::CurrencyMismatch`]: the line is priced in another currency.
    /// - [`OrderError::Money`]: money arithmetic failed.
    pub fn push_line(&mut self, line: OrderLine<'a>) -> Result<(), OrderError> {
        let line_currency = line.line_total.currency();

        if line_currency != self.currency {
            return Err(OrderError::CurrencyMismatch(
                line_currency.iso_alpha_code,
                self.currency.iso_alpha_code,
            ));
        }

        self.lines.push(line);

        self.recalculate_totals()
    }

    /// Rebuild the totals from the frozen lines.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Money`] if a line is in another currency.
    pub fn recalculate_totals(&mut self) -> Result<(), OrderError> {
        let (subtotal, discount_total, total) = self.lines.iter().try_fold(
            (zero(self.currency), zero(self.currency), zero(self.currency)),
            |(subtotal, discount, total), line| -> Result<_, MoneyError> {
                Ok((
                    subtotal.add(line.line_subtotal)?,
                    discount.add(line.line_discount)?,
                    total.add(line.line_total)?,
                ))
            },
        )?;

        self.totals = OrderTotals {
            subtotal: round_money(&subtotal),
            discount_total: round_money(&discount_total),
            total: round_money(&total),
        };

        Ok(())
    }

    /// Whether the totals agree with each other and with the lines.
    pub fn is_reconciled(&self) -> bool {
        let mut recalculated = self.clone();

        recalculated.recalculate_totals().is_ok()
            && recalculated.totals == self.totals
            && self
                .totals
                .subtotal
                .sub(self.totals.discount_total)
                .is_ok_and(|total| total == self.totals.total)
    }

    /// Amount saved across the order.
    pub fn savings(&self) -> Money<'a, Currency> {
        self.totals.discount_total
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{COP, USD};
    use testresult::TestResult;

    use crate::{
        cart::{Cart, CartLine},
        discounts::DiscountRule,
        pricing::price_cart,
        promotions::{Promotion, scope::Scope},
    };

    use super::*;

    fn at() -> Result<Timestamp, jiff::Error> {
        "2026-10-19T08:30:00Z".parse()
    }

    fn product(slug: &str, price: Money<'static, Currency>) -> Product<'static> {
        Product {
            key: ProductKey::default(),
            name: slug.to_uppercase(),
            slug: slug.to_string(),
            category: None,
            price,
            available: true,
        }
    }

    fn cop(amount: i64) -> Money<'static, Currency> {
        Money::from_decimal(Decimal::from(amount), COP)
    }

    #[test]
    fn at_base_price_freezes_undiscounted_line() -> TestResult {
        let bread = product("pan", Money::from_decimal(Decimal::new(12_345, 3), COP));

        let line = OrderLine::at_base_price(&bread, 3)?;

        // round2(12.345) = 12.35
        assert_eq!(line.unit_price, Money::from_decimal(Decimal::new(1235, 2), COP));
        assert_eq!(line.line_subtotal, Money::from_decimal(Decimal::new(3705, 2), COP));
        assert_eq!(line.line_total, line.line_subtotal);
        assert!(line.line_discount.is_zero());
        assert_eq!(line.promotion, None);

        Ok(())
    }

    #[test]
    fn push_line_refreshes_totals() -> TestResult {
        let bread = product("pan", cop(2_000));
        let cake = product("torta", cop(15_000));
        let mut order = Order::new(COP, DEFAULT_PAYMENT_METHOD, at()?);

        order.push_line(OrderLine::at_base_price(&bread, 2)?)?;
        order.push_line(OrderLine::at_base_price(&cake, 1)?)?;

        assert_eq!(order.totals.subtotal, cop(19_000));
        assert_eq!(order.totals.total, cop(19_000));
        assert!(order.totals.discount_total.is_zero());
        assert!(order.is_reconciled());

        Ok(())
    }

    #[test]
    fn push_line_rejects_other_currency() -> TestResult {
        let muffin = product("muffin", Money::from_decimal(Decimal::from(3), USD));
        let mut order = Order::new(COP, DEFAULT_PAYMENT_METHOD, at()?);

        let result = order.push_line(OrderLine::at_base_price(&muffin, 1)?);

        assert_eq!(result, Err(OrderError::CurrencyMismatch("USD", "COP")));
        assert!(order.lines.is_empty());

        Ok(())
    }

    #[test]
    fn recalculated_totals_match_priced_totals() -> TestResult {
        let roll = product("roll", Money::from_decimal(Decimal::new(3704, 2), COP));
        let promotions = [Promotion::new(
            PromotionKey::default(),
            "Ten off",
            DiscountRule::Percent(Decimal::from(10)),
            Scope::AllProducts,
        )];
        let cart = Cart::with_lines([CartLine::new(&roll, 3), CartLine::new(&roll, 1)], COP)?;
        let priced = price_cart(&promotions, &cart, at()?)?;

        let mut order = Order::from_priced_cart(&priced, "Card", at()?);
        let frozen = order.totals;

        order.recalculate_totals()?;

        assert_eq!(order.totals, frozen);
        assert_eq!(order.savings(), priced.totals.discount_total);
        assert!(order.is_reconciled());

        Ok(())
    }

    #[test]
    fn tampered_totals_are_not_reconciled() -> TestResult {
        let bread = product("pan", cop(2_000));
        let mut order = Order::new(COP, DEFAULT_PAYMENT_METHOD, at()?);
        order.push_line(OrderLine::at_base_price(&bread, 1)?)?;

        order.totals.total = cop(1_000);

        assert!(!order.is_reconciled());

        Ok(())
    }
}
