//! Fixtures
//!
//! YAML catalog, promotion and cart sets for demos and tests.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use serde::de::DeserializeOwned;
use slotmap::SlotMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    catalog::{Catalog, CatalogError, NewProduct},
    checkout::{Checkout, CheckoutRequest},
    fixtures::{carts::CartFixture, products::ProductsFixture, promotions::PromotionsFixture},
    products::{Product, ProductKey},
    promotions::{Promotion, PromotionKey},
};

pub mod carts;
pub mod products;
pub mod promotions;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid discount value
    #[error("Invalid discount value: {0}")]
    InvalidValue(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Category not found
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Promotion not found
    #[error("Promotion not found: {0}")]
    PromotionNotFound(String),

    /// Invalid promotion data
    #[error("Invalid promotion data: {0}")]
    InvalidPromotionData(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// No cart loaded
    #[error("No cart loaded")]
    NoCart,

    /// Catalog insertion error
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded products and categories
    catalog: Catalog<'a>,

    /// Key generator and slug lookup for promotions
    promotion_slugs: SlotMap<PromotionKey, String>,
    promotion_keys: FxHashMap<String, PromotionKey>,

    /// Loaded promotions, in slug order
    promotions: Vec<Promotion<'a>>,

    /// Loaded cart, if any
    cart: Option<CheckoutRequest>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: Catalog::new(),
            promotion_slugs: SlotMap::with_key(),
            promotion_keys: FxHashMap::default(),
            promotions: Vec::new(),
            cart: None,
            currency: None,
        }
    }

    /// Load categories and products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if a price is malformed, or if
    /// products are priced in more than one currency.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ProductsFixture = self.read("products", name)?;

        for (slug, category) in sorted(fixture.categories) {
            self.catalog.insert_category(slug, category.name)?;
        }

        for (slug, product) in sorted(fixture.products) {
            let (amount, currency) = products::parse_price(&product.price)?;

            // Validate currency consistency
            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            self.catalog.insert_product(NewProduct {
                name: product.name,
                slug,
                category: product.category,
                price: Money::from_decimal(amount, currency),
                available: product.available,
            })?;
        }

        debug!(set = name, products = self.catalog.len(), "loaded product fixtures");

        Ok(self)
    }

    /// Load promotions from a YAML fixture file
    ///
    /// Products must be loaded first; promotion scopes are resolved against them. A promotion
    /// that cannot be built (bad value, backwards window, unknown product or category) is skipped
    /// with a warning and the rest of the set still loads.
    ///
    /// # Errors
    ///
    /// Returns an error if no products are loaded or the file cannot be read or parsed.
    pub fn load_promotions(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let currency = self.currency.ok_or(FixtureError::NoCurrency)?;
        let fixture: PromotionsFixture = self.read("promotions", name)?;

        for (slug, promotion_fixture) in sorted(fixture.promotions) {
            let key = self.promotion_slugs.insert(slug.clone());

            match promotion_fixture.try_into_promotion(key, &self.catalog, currency) {
                Ok(promotion) => {
                    self.promotions.push(promotion);
                    self.promotion_keys.insert(slug, key);
                }
                Err(error) => {
                    self.promotion_slugs.remove(key);

                    warn!(%slug, %error, "skipping invalid promotion");
                }
            }
        }

        debug!(set = name, promotions = self.promotions.len(), "loaded promotion fixtures");

        Ok(self)
    }

    /// Load a cart from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: CartFixture = self.read("carts", name)?;

        self.cart = Some(fixture.into());

        Ok(self)
    }

    /// Load a complete fixture set (products, promotions and cart with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_products(name)?
            .load_promotions(name)?
            .load_cart(name)?;

        Ok(fixture)
    }

    /// Get a product by its slug
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, slug: &str) -> Result<&Product<'a>, FixtureError> {
        self.catalog
            .product_by_slug(slug)
            .ok_or_else(|| FixtureError::ProductNotFound(slug.to_string()))
    }

    /// Get a product key by its slug
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product_key(&self, slug: &str) -> Result<ProductKey, FixtureError> {
        self.catalog
            .product_key(slug)
            .ok_or_else(|| FixtureError::ProductNotFound(slug.to_string()))
    }

    /// Get a promotion by its slug
    ///
    /// # Errors
    ///
    /// Returns an error if the promotion is not found.
    pub fn promotion(&self, slug: &str) -> Result<&Promotion<'a>, FixtureError> {
        let key = self
            .promotion_keys
            .get(slug)
            .ok_or_else(|| FixtureError::PromotionNotFound(slug.to_string()))?;

        self.promotions
            .iter()
            .find(|promotion| promotion.key == *key)
            .ok_or_else(|| FixtureError::PromotionNotFound(slug.to_string()))
    }

    /// Get the slug a promotion was loaded under
    pub fn promotion_slug(&self, key: PromotionKey) -> Option<&str> {
        self.promotion_slugs.get(key).map(String::as_str)
    }

    /// Get the loaded catalog
    pub fn catalog(&self) -> &Catalog<'a> {
        &self.catalog
    }

    /// Get all promotions
    pub fn promotions(&self) -> &[Promotion<'a>] {
        &self.promotions
    }

    /// Currency of the loaded products
    pub fn currency(&self) -> Option<&'static Currency> {
        self.currency
    }

    /// Get the loaded cart
    ///
    /// # Errors
    ///
    /// Returns an error if no cart has been loaded.
    pub fn cart(&self) -> Result<&CheckoutRequest, FixtureError> {
        self.cart.as_ref().ok_or(FixtureError::NoCart)
    }

    /// Checkout over the loaded catalog and promotions
    pub fn checkout(&self) -> Checkout<'_, '_, 'a> {
        Checkout::new(&self.catalog, &self.promotions)
    }

    fn read<T: DeserializeOwned>(&self, kind: &str, name: &str) -> Result<T, FixtureError> {
        let file_path = self.base_path.join(kind).join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Ok(serde_norway::from_str(&contents)?)
    }
}

/// Map entries ordered by slug, so loading does not depend on hash order.
fn sorted<V>(map: FxHashMap<String, V>) -> Vec<(String, V)> {
    let mut entries: Vec<_> = map.into_iter().collect();

    entries.sort_by(|(left, _), (right, _)| left.cmp(right));

    entries
}
