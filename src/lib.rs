//! Banetón
//!
//! Promotion-aware order pricing for a bakery checkout. Every checkout path prices carts
//! through one engine: each product gets the single best active promotion, unit prices are
//! frozen at sale time, and order totals reconcile with the per-line amounts to the cent.

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod discounts;
pub mod fixtures;
pub mod money;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod receipt;
