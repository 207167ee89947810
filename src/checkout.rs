//! Checkout
//!
//! The single path from raw checkout input to a priced, frozen order. Both the POS scanner
//! flow and the web cart flow build a [`CheckoutRequest`] and go through [`Checkout`], so
//! every order is priced by the same engine.

use std::collections::hash_map::Entry;

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::{
    cart::{Cart, CartError, CartLine},
    catalog::Catalog,
    orders::{DEFAULT_PAYMENT_METHOD, Order},
    pricing::{PricingEngine, PricingError},
    promotions::Promotion,
};

/// Errors raised while turning a checkout request into an order.
#[derive(Debug, Error, PartialEq)]
pub enum CheckoutError {
    /// The request references a product slug that is not in the catalog.
    #[error("unknown product: {0}")]
    UnknownProduct(String),

    /// The request has no lines.
    #[error("checkout request has no lines")]
    Empty,

    /// Wrapped cart construction error.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Wrapped pricing error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// A checkout line as received from the storefront, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawLine {
    /// Product slug
    pub product: String,

    /// Requested quantity, if one was sent
    #[serde(default)]
    pub quantity: Option<i64>,
}

impl RawLine {
    /// Create a raw line.
    pub fn new(product: impl Into<String>, quantity: Option<i64>) -> Self {
        Self {
            product: product.into(),
            quantity,
        }
    }
}

/// Validated checkout input: product slugs with positive quantities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    lines: Vec<(String, u32)>,
    payment_method: String,
}

impl CheckoutRequest {
    /// Build a request from storefront lines.
    ///
    /// Missing, zero or negative quantities count as one unit.
    pub fn from_lines(lines: impl IntoIterator<Item = RawLine>) -> Self {
        let lines = lines
            .into_iter()
            .map(|line| (line.product, normalise_quantity(line.quantity)))
            .collect();

        Self {
            lines,
            payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
        }
    }

    /// Build a request from POS scans, one unit per scan.
    ///
    /// Repeated scans of the same product are merged into one line, kept at the position of
    /// the first scan.
    pub fn from_scans<S: AsRef<str>>(scans: impl IntoIterator<Item = S>) -> Self {
        let mut positions = FxHashMap::<String, usize>::default();
        let mut lines: Vec<(String, u32)> = Vec::new();

        for scan in scans {
            let slug = scan.as_ref();

            match positions.entry(slug.to_string()) {
                Entry::Occupied(entry) => {
                    if let Some((_, quantity)) = lines.get_mut(*entry.get()) {
                        *quantity = quantity.saturating_add(1);
                    }
                }
                Entry::Vacant(entry) => {
                    entry.insert(lines.len());
                    lines.push((slug.to_string(), 1));
                }
            }
        }

        Self {
            lines,
            payment_method: DEFAULT_PAYMENT_METHOD.to_string(),
        }
    }

    /// Set the payment method recorded on the order.
    #[must_use]
    pub fn with_payment_method(mut self, payment_method: impl Into<String>) -> Self {
        self.payment_method = payment_method.into();
        self
    }

    /// Product slugs and quantities, in request order.
    pub fn lines(&self) -> &[(String, u32)] {
        &self.lines
    }

    /// Payment method recorded on the order.
    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }
}

/// Checkout against a catalog and the current promotion set.
#[derive(Debug, Clone, Copy)]
pub struct Checkout<'k, 'p, 'a> {
    catalog: &'k Catalog<'a>,
    promotions: &'p [Promotion<'a>],
}

impl<'k, 'p, 'a> Checkout<'k, 'p, 'a> {
    /// Create a checkout.
    pub fn new(catalog: &'k Catalog<'a>, promotions: &'p [Promotion<'a>]) -> Self {
        Self {
            catalog,
            promotions,
        }
    }

    /// Resolve a request into a cart.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::Empty`]: the request has no lines.
    /// - [`CheckoutError::UnknownProduct`]: a slug is not in the catalog.
    /// - [`CheckoutError::Cart`]: products are priced in different currencies.
    pub fn cart(&self, request: &CheckoutRequest) -> Result<Cart<'k, 'a>, CheckoutError> {
        let mut products = request.lines.iter().map(|(slug, quantity)| {
            self.catalog
                .product_by_slug(slug)
                .map(|product| CartLine::new(product, *quantity))
                .ok_or_else(|| CheckoutError::UnknownProduct(slug.clone()))
        });

        let Some(first) = products.next().transpose()? else {
            return Err(CheckoutError::Empty);
        };

        let mut cart = Cart::new(first.product.currency());
        cart.push(first)?;

        for line in products {
            cart.push(line?)?;
        }

        Ok(cart)
    }

    /// Price a request at `at` and freeze the result into an order.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] if the cart cannot be built or priced.
    pub fn place_order(
        &self,
        request: &CheckoutRequest,
        at: Timestamp,
    ) -> Result<Order<'a>, CheckoutError> {
        let cart = self.cart(request)?;
        let priced = PricingEngine::new(self.promotions, at).price_cart(&cart)?;
        let order = Order::from_priced_cart(&priced, request.payment_method(), at);

        info!(
            lines = order.lines.len(),
            total = %order.totals.total,
            payment_method = %order.payment_method,
            "placed order"
        );

        Ok(order)
    }
}

fn normalise_quantity(quantity: Option<i64>) -> u32 {
    quantity
        .and_then(|quantity| u32::try_from(quantity).ok())
        .filter(|quantity| *quantity > 0)
        .unwrap_or(1)
}
