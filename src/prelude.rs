//! Banetón prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine},
    catalog::{Catalog, CatalogError, NewProduct},
    checkout::{Checkout, CheckoutError, CheckoutRequest, RawLine},
    discounts::{DiscountError, DiscountRule},
    fixtures::{Fixture, FixtureError},
    money::round2,
    orders::{DEFAULT_PAYMENT_METHOD, Order, OrderError, OrderLine},
    pricing::{
        OrderTotals, PricedCart, PricedLine, PricingEngine, PricingError, UnitPrice, price_cart,
        resolve_best_unit_price,
    },
    products::{Category, CategoryKey, Product, ProductKey},
    promotions::{Promotion, PromotionKey, scope::Scope, window::ActivityWindow},
    receipt::{ReceiptError, write_receipt},
};
