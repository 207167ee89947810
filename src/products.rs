//! Products

use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

new_key_type! {
    /// Category Key
    pub struct CategoryKey;
}

/// Product category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Category name
    pub name: String,

    /// Unique slug
    pub slug: String,
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Catalog key
    pub key: ProductKey,

    /// Product name
    pub name: String,

    /// Unique slug used by checkout requests and fixtures
    pub slug: String,

    /// Category, if the product has been filed under one
    pub category: Option<CategoryKey>,

    /// Base unit price, before any promotion
    pub price: Money<'a, Currency>,

    /// Whether the product is currently offered for sale
    pub available: bool,
}

impl<'a> Product<'a> {
    /// Currency of the base price.
    pub fn currency(&self) -> &'a Currency {
        self.price.currency()
    }
}
