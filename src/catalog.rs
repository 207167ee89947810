//! Catalog
//!
//! Owning store for the products and categories a checkout can reference.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use slotmap::SlotMap;
use thiserror::Error;

use crate::products::{Category, CategoryKey, Product, ProductKey};

/// Errors raised while populating a catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A product or category with this slug already exists.
    #[error("duplicate slug: {0}")]
    DuplicateSlug(String),

    /// The product refers to a category that is not in the catalog.
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

/// New product data, before a key is assigned.
#[derive(Debug, Clone)]
pub struct NewProduct<'a> {
    /// Product name
    pub name: String,

    /// Unique slug
    pub slug: String,

    /// Category slug, if any
    pub category: Option<String>,

    /// Base unit price
    pub price: Money<'a, Currency>,

    /// Whether the product is offered for sale
    pub available: bool,
}

/// Products and categories, addressable by key or slug.
#[derive(Debug, Default)]
pub struct Catalog<'a> {
    products: SlotMap<ProductKey, Product<'a>>,
    categories: SlotMap<CategoryKey, Category>,
    product_keys: FxHashMap<String, ProductKey>,
    category_keys: FxHashMap<String, CategoryKey>,
}

impl<'a> Catalog<'a> {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a category.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateSlug`] if the slug is already taken.
    pub fn insert_category(
        &mut self,
        slug: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<CategoryKey, CatalogError> {
        let slug = slug.into();

        if self.category_keys.contains_key(&slug) {
            return Err(CatalogError::DuplicateSlug(slug));
        }

        let key = self.categories.insert(Category {
            name: name.into(),
            slug: slug.clone(),
        });

        self.category_keys.insert(slug, key);

        Ok(key)
    }

    /// Add a product.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::DuplicateSlug`]: the slug is already taken.
    /// - [`CatalogError::UnknownCategory`]: the category slug is not in the catalog.
    pub fn insert_product(&mut self, product: NewProduct<'a>) -> Result<ProductKey, CatalogError> {
        if self.product_keys.contains_key(&product.slug) {
            return Err(CatalogError::DuplicateSlug(product.slug));
        }

        let category = product
            .category
            .map(|slug| {
                self.category_keys
                    .get(&slug)
                    .copied()
                    .ok_or(CatalogError::UnknownCategory(slug))
            })
            .transpose()?;

        let slug = product.slug;
        let key = self.products.insert_with_key(|key| Product {
            key,
            name: product.name,
            slug: slug.clone(),
            category,
            price: product.price,
            available: product.available,
        });

        self.product_keys.insert(slug, key);

        Ok(key)
    }

    /// Look up a product by key.
    pub fn product(&self, key: ProductKey) -> Option<&Product<'a>> {
        self.products.get(key)
    }

    /// Look up a product by slug.
    pub fn product_by_slug(&self, slug: &str) -> Option<&Product<'a>> {
        self.product_keys
            .get(slug)
            .and_then(|key| self.products.get(*key))
    }

    /// Key for a product slug.
    pub fn product_key(&self, slug: &str) -> Option<ProductKey> {
        self.product_keys.get(slug).copied()
    }

    /// Look up a category by key.
    pub fn category(&self, key: CategoryKey) -> Option<&Category> {
        self.categories.get(key)
    }

    /// Key for a category slug.
    pub fn category_key(&self, slug: &str) -> Option<CategoryKey> {
        self.category_keys.get(slug).copied()
    }

    /// Iterate over all products.
    pub fn products(&self) -> impl Iterator<Item = &Product<'a>> {
        self.products.values()
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
