//! Product Fixtures

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::{COP, Currency, EUR, GBP, USD};
use serde::Deserialize;

use crate::fixtures::FixtureError;

/// Wrapper for categories and products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of category slug -> category fixture
    #[serde(default)]
    pub categories: FxHashMap<String, CategoryFixture>,

    /// Map of product slug -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Category Fixture
#[derive(Debug, Deserialize)]
pub struct CategoryFixture {
    /// Category name
    pub name: String,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Category slug
    #[serde(default)]
    pub category: Option<String>,

    /// Product price (e.g., "3500 COP")
    pub price: String,

    /// Whether the product is offered for sale
    #[serde(default = "available_by_default")]
    pub available: bool,
}

fn available_by_default() -> bool {
    true
}

/// Parse price string (e.g., "2.99 GBP") into an exact amount and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount is not a decimal number, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(currency_code), None) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    Ok((amount, parse_currency(currency_code)?))
}

/// Look up a supported ISO currency code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for any code other than COP, USD, EUR or GBP.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code {
        "COP" => Ok(COP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        "GBP" => Ok(GBP),
        other => Err(FixtureError::UnknownCurrency(other.to_string())),
    }
}
