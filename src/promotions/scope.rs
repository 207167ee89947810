//! Promotion Scope
//!
//! Which products a promotion applies to, resolved once when the promotion is loaded.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::products::{CategoryKey, Product, ProductKey};

/// Products targeted by a promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Every product.
    AllProducts,

    /// Only the listed products. An empty set matches nothing.
    Products(FxHashSet<ProductKey>),

    /// Only products filed under one of the listed categories.
    Categories(FxHashSet<CategoryKey>),

    /// Listed products plus every product filed under a listed category.
    Selection {
        /// Products matched directly.
        products: FxHashSet<ProductKey>,

        /// Categories whose products match.
        categories: FxHashSet<CategoryKey>,
    },
}

impl Scope {
    /// Scope covering the given products.
    #[must_use]
    pub fn products(keys: impl IntoIterator<Item = ProductKey>) -> Self {
        Self::Products(keys.into_iter().collect())
    }

    /// Scope covering the given categories.
    #[must_use]
    pub fn categories(keys: impl IntoIterator<Item = CategoryKey>) -> Self {
        Self::Categories(keys.into_iter().collect())
    }

    /// Scope covering the given products and everything in the given categories.
    #[must_use]
    pub fn selection(
        products: impl IntoIterator<Item = ProductKey>,
        categories: impl IntoIterator<Item = CategoryKey>,
    ) -> Self {
        Self::Selection {
            products: products.into_iter().collect(),
            categories: categories.into_iter().collect(),
        }
    }

    /// Whether the scope covers `product`.
    pub fn matches(&self, product: &Product<'_>) -> bool {
        match self {
            Self::AllProducts => true,
            Self::Products(keys) => keys.contains(&product.key),
            Self::Categories(keys) => in_category(keys, product),
            Self::Selection {
                products,
                categories,
            } => products.contains(&product.key) || in_category(categories, product),
        }
    }

    /// Whether the scope can never match a product.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::AllProducts => false,
            Self::Products(keys) => keys.is_empty(),
            Self::Categories(keys) => keys.is_empty(),
            Self::Selection {
                products,
                categories,
            } => products.is_empty() && categories.is_empty(),
        }
    }
}

fn in_category(keys: &FxHashSet<CategoryKey>, product: &Product<'_>) -> bool {
    product
        .category
        .is_some_and(|category| keys.contains(&category))
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            _ if self.is_empty() => "None",
            Self::AllProducts => "All products",
            Self::Products(_) => "Products",
            Self::Categories(_) => "Categories",
            Self::Selection { .. } => "Products and categories",
        };

        f.write_str(label)
    }
}
