//! Promotion Fixtures

use jiff::Timestamp;
use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;

use crate::{
    catalog::Catalog,
    discounts::DiscountRule,
    fixtures::{FixtureError, products::parse_price},
    promotions::{Promotion, PromotionKey, scope::Scope, window::ActivityWindow},
};

/// Wrapper for promotions in YAML
#[derive(Debug, Deserialize)]
pub struct PromotionsFixture {
    /// Map of promotion slug -> promotion fixture
    pub promotions: FxHashMap<String, PromotionFixture>,
}

/// Discount value as written in YAML: a bare integer or a quoted decimal.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ValueFixture {
    /// Whole number, e.g. `15`
    Integer(i64),

    /// Decimal or price text, e.g. `"12.5"` or `"2000 COP"`
    Text(String),
}

/// Promotion fixture from YAML
#[derive(Debug, Deserialize)]
pub struct PromotionFixture {
    /// Promotion name
    pub name: String,

    /// `percent`, `fixed`, or any other kind (kept and ignored at pricing time)
    pub discount_type: String,

    /// Percent points or amount off
    pub value: ValueFixture,

    /// Administrative on/off switch
    #[serde(default = "active_by_default")]
    pub is_active: bool,

    /// First instant the promotion applies
    #[serde(default)]
    pub starts_at: Option<Timestamp>,

    /// Last instant the promotion applies
    #[serde(default)]
    pub ends_at: Option<Timestamp>,

    /// Apply to every product
    #[serde(default)]
    pub applies_to_all: bool,

    /// Product slugs
    #[serde(default)]
    pub products: Vec<String>,

    /// Category slugs
    #[serde(default)]
    pub categories: Vec<String>,
}

fn active_by_default() -> bool {
    true
}

impl PromotionFixture {
    /// Resolve slugs against `catalog` and build the promotion.
    ///
    /// Fixed amounts without a currency are taken to be in `currency`.
    ///
    /// # Errors
    ///
    /// - [`FixtureError::InvalidValue`]: the value is malformed, negative, or a percentage above 100.
    /// - [`FixtureError::InvalidPromotionData`]: the window ends before it starts.
    /// - [`FixtureError::ProductNotFound`] / [`FixtureError::CategoryNotFound`]: unknown slug.
    pub fn try_into_promotion<'a>(
        self,
        key: PromotionKey,
        catalog: &Catalog<'a>,
        currency: &'a Currency,
    ) -> Result<Promotion<'a>, FixtureError> {
        let rule = self.rule(currency)?;
        let window = self.window()?;
        let scope = self.scope(catalog)?;

        Ok(Promotion::new(key, self.name, rule, scope)
            .with_window(window)
            .with_active(self.is_active))
    }

    fn rule<'a>(&self, currency: &'a Currency) -> Result<DiscountRule<'a>, FixtureError> {
        match self.discount_type.as_str() {
            "percent" => {
                let points = self.decimal_value()?;

                if points.is_sign_negative() || points > Decimal::ONE_HUNDRED {
                    return Err(FixtureError::InvalidValue(format!(
                        "{}: percentage must be between 0 and 100, got {points}",
                        self.name
                    )));
                }

                Ok(DiscountRule::Percent(points))
            }
            "fixed" => {
                let amount = match &self.value {
                    ValueFixture::Text(text) if text.contains(char::is_whitespace) => {
                        let (amount, currency) = parse_price(text)?;
                        Money::from_decimal(amount, currency)
                    }
                    _ => Money::from_decimal(self.decimal_value()?, currency),
                };

                if amount.is_negative() {
                    return Err(FixtureError::InvalidValue(format!(
                        "{}: fixed amount must not be negative",
                        self.name
                    )));
                }

                Ok(DiscountRule::Fixed(amount))
            }
            other => Ok(DiscountRule::Unsupported(other.to_string())),
        }
    }

    fn decimal_value(&self) -> Result<Decimal, FixtureError> {
        match &self.value {
            ValueFixture::Integer(value) => Ok(Decimal::from(*value)),
            ValueFixture::Text(text) => text
                .trim()
                .parse::<Decimal>()
                .map_err(|_err| FixtureError::InvalidValue(text.clone())),
        }
    }

    fn window(&self) -> Result<ActivityWindow, FixtureError> {
        if let (Some(starts_at), Some(ends_at)) = (self.starts_at, self.ends_at) {
            if ends_at < starts_at {
                return Err(FixtureError::InvalidPromotionData(format!(
                    "{}: ends_at {ends_at} is before starts_at {starts_at}",
                    self.name
                )));
            }
        }

        Ok(ActivityWindow {
            starts_at: self.starts_at,
            ends_at: self.ends_at,
        })
    }

    fn scope(&self, catalog: &Catalog<'_>) -> Result<Scope, FixtureError> {
        if self.applies_to_all {
            return Ok(Scope::AllProducts);
        }

        let products = self
            .products
            .iter()
            .map(|slug| {
                catalog
                    .product_key(slug)
                    .ok_or_else(|| FixtureError::ProductNotFound(slug.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let categories = self
            .categories
            .iter()
            .map(|slug| {
                catalog
                    .category_key(slug)
                    .ok_or_else(|| FixtureError::CategoryNotFound(slug.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(match (products.is_empty(), categories.is_empty()) {
            (false, false) => Scope::selection(products, categories),
            (true, false) => Scope::categories(categories),
            _ => Scope::products(products),
        })
    }
}
