//! Cart

use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::{
    money::{round2, zero},
    products::Product,
};

/// Errors related to cart construction or totals.
#[derive(Debug, Error, PartialEq)]
pub enum CartError {
    /// A product's currency differs from the cart currency (index, product currency, cart currency).
    #[error("Line {0} has currency {1}, but cart has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// A line amount overflowed the decimal range.
    #[error("line {0} amount overflowed")]
    Overflow(usize),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// One product and how many units of it are being bought.
#[derive(Debug, Clone, Copy)]
pub struct CartLine<'c, 'a> {
    /// Resolved product
    pub product: &'c Product<'a>,

    /// Number of units
    pub quantity: u32,
}

impl<'c, 'a> CartLine<'c, 'a> {
    /// Create a new cart line.
    pub fn new(product: &'c Product<'a>, quantity: u32) -> Self {
        Self { product, quantity }
    }
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart<'c, 'a> {
    lines: Vec<CartLine<'c, 'a>>,
    currency: &'a Currency,
}

impl<'c, 'a> Cart<'c, 'a> {
    /// Create an empty cart in the given currency.
    pub fn new(currency: &'a Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    /// Create a new cart with the given lines.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if any product is priced in another currency.
    pub fn with_lines(
        lines: impl Into<Vec<CartLine<'c, 'a>>>,
        currency: &'a Currency,
    ) -> Result<Self, CartError> {
        let lines = lines.into();

        lines
            .iter()
            .enumerate()
            .try_for_each(|(i, line)| check_currency(i, line, currency))?;

        Ok(Cart { lines, currency })
    }

    /// Append a line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CurrencyMismatch`] if the product is priced in another currency.
    pub fn push(&mut self, line: CartLine<'c, 'a>) -> Result<(), CartError> {
        check_currency(self.lines.len(), &line, self.currency)?;

        self.lines.push(line);

        Ok(())
    }

    /// Sum of the undiscounted line subtotals, each rounded to whole cents.
    ///
    /// # Errors
    ///
    /// - [`CartError::Overflow`]: a line amount left the decimal range.
    /// - [`CartError::Money`]: money arithmetic failed.
    pub fn base_subtotal(&self) -> Result<Money<'a, Currency>, CartError> {
        self.lines
            .iter()
            .enumerate()
            .try_fold(zero(self.currency), |acc, (i, line)| {
                let amount = round2(*line.product.price.amount())
                    .checked_mul(Decimal::from(line.quantity))
                    .ok_or(CartError::Overflow(i))?;

                Ok(acc.add(Money::from_decimal(round2(amount), self.currency))?)
            })
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine<'c, 'a>] {
        &self.lines
    }

    /// Get the number of lines in the cart.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }
}

fn check_currency(
    index: usize,
    line: &CartLine<'_, '_>,
    currency: &Currency,
) -> Result<(), CartError> {
    let line_currency = line.product.currency();

    if line_currency == currency {
        Ok(())
    } else {
        Err(CartError::CurrencyMismatch(
            index,
            line_currency.iso_alpha_code,
            currency.iso_alpha_code,
        ))
    }
}
