//! Pricing
//!
//! Best-price resolution per product and itemised cart totals.
//!
//! Every promotion that is active at the pricing instant and whose scope covers a product
//! produces a candidate unit price, rounded to whole cents. The lowest candidate wins;
//! promotions never stack. Cart lines are rounded individually and then summed exactly, so
//! order totals always reconcile with the per-line amounts.

use jiff::Timestamp;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    cart::{Cart, CartLine},
    money::{round2, round_money, zero},
    products::Product,
    promotions::{Promotion, PromotionKey},
};

/// Errors raised by the pricing engine.
///
/// These are caller contract violations; misconfigured promotions never surface here.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A unit price was requested for zero units.
    #[error("quantity must be a positive integer")]
    ZeroQuantity,

    /// A cart line has a quantity of zero.
    #[error("cart line {0} has a zero quantity")]
    LineQuantity(usize),

    /// A product has a negative base price.
    #[error("product {0} has a negative base price")]
    NegativePrice(String),

    /// A line amount overflowed the decimal range.
    #[error("cart line {0} amount overflowed")]
    Overflow(usize),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Best unit price for a product at the pricing instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitPrice<'a> {
    /// Base price rounded to whole cents
    pub base_price: Money<'a, Currency>,

    /// Price to charge per unit
    pub final_price: Money<'a, Currency>,

    /// `base_price - final_price`
    pub discount: Money<'a, Currency>,

    /// Discount as whole percent points of the base price
    pub discount_percent: u32,

    /// Promotion that produced `final_price`, if any.
    ///
    /// When several promotions tie on the best price, which one is reported is not significant.
    pub promotion: Option<PromotionKey>,
}

impl UnitPrice<'_> {
    /// Whether a promotion lowered the price.
    pub fn is_discounted(&self) -> bool {
        self.promotion.is_some()
    }
}

/// A cart line with its frozen pricing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedLine<'c, 'a> {
    /// Priced product
    pub product: &'c Product<'a>,

    /// Number of units
    pub quantity: u32,

    /// Unit price charged
    pub unit_price: Money<'a, Currency>,

    /// `round2(base price * quantity)`
    pub line_subtotal: Money<'a, Currency>,

    /// `line_subtotal - line_total`
    pub line_discount: Money<'a, Currency>,

    /// `round2(unit price * quantity)`
    pub line_total: Money<'a, Currency>,

    /// Promotion that set the unit price, if any
    pub promotion: Option<PromotionKey>,
}

/// Order-level totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals<'a> {
    /// Sum of undiscounted line subtotals
    pub subtotal: Money<'a, Currency>,

    /// Sum of line discounts plus any order-level discount
    pub discount_total: Money<'a, Currency>,

    /// `subtotal - discount_total`
    pub total: Money<'a, Currency>,
}

/// Result of pricing a whole cart.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedCart<'c, 'a> {
    /// Priced lines, in cart order
    pub lines: Vec<PricedLine<'c, 'a>>,

    /// Order-level discount. There are no order-level rules yet, so this is always zero.
    pub order_discount: Money<'a, Currency>,

    /// Order totals
    pub totals: OrderTotals<'a>,
}

/// Prices products and carts against a set of promotions at a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct PricingEngine<'p, 'a> {
    promotions: &'p [Promotion<'a>],
    at: Timestamp,
}

impl<'p, 'a> PricingEngine<'p, 'a> {
    /// Create an engine evaluating promotion activity at `at`.
    pub fn new(promotions: &'p [Promotion<'a>], at: Timestamp) -> Self {
        Self { promotions, at }
    }

    /// The instant promotion activity is evaluated at.
    pub fn at(&self) -> Timestamp {
        self.at
    }

    /// Promotions that are active at the pricing instant and cover `product`.
    pub fn applicable_promotions<'e>(
        &self,
        product: &'e Product<'a>,
    ) -> impl Iterator<Item = &'p Promotion<'a>> + 'e
    where
        'p: 'e,
    {
        let at = self.at;

        self.promotions
            .iter()
            .filter(move |promotion| promotion.applies_to(product, at))
    }

    /// Resolve the best unit price for `quantity` units of `product`.
    ///
    /// Quantity does not change the unit price; it is validated and recorded for context only.
    ///
    /// # Errors
    ///
    /// - [`PricingError::ZeroQuantity`]: `quantity` is zero.
    /// - [`PricingError::NegativePrice`]: the product's base price is negative.
    /// - [`PricingError::Money`]: money arithmetic failed.
    pub fn resolve_best_unit_price(
        &self,
        product: &Product<'a>,
        quantity: u32,
    ) -> Result<UnitPrice<'a>, PricingError> {
        if quantity == 0 {
            return Err(PricingError::ZeroQuantity);
        }

        if product.price.is_negative() {
            return Err(PricingError::NegativePrice(product.slug.clone()));
        }

        let base = round_money(&product.price);
        let mut best = base;
        let mut winner = None;

        for promotion in self.applicable_promotions(product) {
            let candidate = match promotion.rule.candidate_price(&base) {
                Ok(candidate) => candidate,
                Err(error) => {
                    warn!(
                        promotion = %promotion.name,
                        product = %product.slug,
                        %error,
                        "ignoring promotion that cannot be applied"
                    );
                    continue;
                }
            };

            if candidate.amount() < best.amount() {
                best = candidate;
                winner = Some(promotion.key);
            }
        }

        let discount = base.sub(best)?;
        let discount_percent = discount_percent(base.amount(), discount.amount());

        if let Some(key) = winner {
            debug!(
                product = %product.slug,
                quantity,
                ?key,
                %best,
                discount_percent,
                "resolved promotional unit price"
            );
        }

        Ok(UnitPrice {
            base_price: base,
            final_price: best,
            discount,
            discount_percent,
            promotion: winner,
        })
    }

    /// Price every line of `cart` and total the order.
    ///
    /// # Errors
    ///
    /// - [`PricingError::LineQuantity`]: a line has a zero quantity.
    /// - [`PricingError::NegativePrice`]: a product's base price is negative.
    /// - [`PricingError::Overflow`]: a line amount left the decimal range.
    /// - [`PricingError::Money`]: money arithmetic or currency mismatch error.
    pub fn price_cart<'c>(
        &self,
        cart: &Cart<'c, 'a>,
    ) -> Result<PricedCart<'c, 'a>, PricingError> {
        let currency = cart.currency();

        let lines = cart
            .lines()
            .iter()
            .enumerate()
            .map(|(index, line)| self.price_line(index, line))
            .collect::<Result<Vec<_>, _>>()?;

        let (subtotal, line_discounts) = lines.iter().try_fold(
            (zero(currency), zero(currency)),
            |(subtotal, discounts), line| -> Result<_, MoneyError> {
                Ok((
                    subtotal.add(line.line_subtotal)?,
                    discounts.add(line.line_discount)?,
                ))
            },
        )?;

        let order_discount = zero(currency);
        let discount_total = round_money(&line_discounts.add(order_discount)?);
        let subtotal = round_money(&subtotal);
        let total = subtotal.sub(discount_total)?;

        debug!(
            lines = lines.len(),
            %subtotal,
            %discount_total,
            %total,
            "priced cart"
        );

        Ok(PricedCart {
            lines,
            order_discount,
            totals: OrderTotals {
                subtotal,
                discount_total,
                total,
            },
        })
    }

    fn price_line<'c>(
        &self,
        index: usize,
        line: &CartLine<'c, 'a>,
    ) -> Result<PricedLine<'c, 'a>, PricingError> {
        if line.quantity == 0 {
            return Err(PricingError::LineQuantity(index));
        }

        let unit = self.resolve_best_unit_price(line.product, line.quantity)?;
        let quantity = Decimal::from(line.quantity);
        let currency = unit.base_price.currency();

        let extend = |unit_amount: &Decimal| {
            unit_amount
                .checked_mul(quantity)
                .map(|amount| Money::from_decimal(round2(amount), currency))
                .ok_or(PricingError::Overflow(index))
        };

        let line_subtotal = extend(unit.base_price.amount())?;
        let line_total = extend(unit.final_price.amount())?;
        let line_discount = round_money(&line_subtotal.sub(line_total)?);

        Ok(PricedLine {
            product: line.product,
            quantity: line.quantity,
            unit_price: unit.final_price,
            line_subtotal,
            line_discount,
            line_total,
            promotion: unit.promotion,
        })
    }
}

/// Resolve the best unit price for `product` against `promotions` at `at`.
///
/// # Errors
///
/// See [`PricingEngine::resolve_best_unit_price`].
pub fn resolve_best_unit_price<'a>(
    promotions: &[Promotion<'a>],
    product: &Product<'a>,
    quantity: u32,
    at: Timestamp,
) -> Result<UnitPrice<'a>, PricingError> {
    PricingEngine::new(promotions, at).resolve_best_unit_price(product, quantity)
}

/// Price `cart` against `promotions` at `at`.
///
/// # Errors
///
/// See [`PricingEngine::price_cart`].
pub fn price_cart<'c, 'a>(
    promotions: &[Promotion<'a>],
    cart: &Cart<'c, 'a>,
    at: Timestamp,
) -> Result<PricedCart<'c, 'a>, PricingError> {
    PricingEngine::new(promotions, at).price_cart(cart)
}

/// Whole percent points of `base` that `discount` represents, ties to even.
fn discount_percent(base: &Decimal, discount: &Decimal) -> u32 {
    if base.is_zero() {
        return 0;
    }

    discount
        .checked_div(*base)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|points| points.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven))
        .and_then(|points| points.to_u32())
        .unwrap_or(0)
}
