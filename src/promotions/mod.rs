//! Promotions

use jiff::Timestamp;
use slotmap::new_key_type;

use crate::{
    discounts::DiscountRule,
    products::Product,
    promotions::{scope::Scope, window::ActivityWindow},
};

pub mod scope;
pub mod window;

new_key_type! {
    /// Promotion Key
    pub struct PromotionKey;
}

/// A price promotion, as configured by the shop administrators.
#[derive(Debug, Clone, PartialEq)]
pub struct Promotion<'a> {
    /// Promotion key
    pub key: PromotionKey,

    /// Promotion name
    pub name: String,

    /// How the unit price is reduced
    pub rule: DiscountRule<'a>,

    /// Administrative on/off switch
    pub is_active: bool,

    /// When the promotion may apply
    pub window: ActivityWindow,

    /// Which products the promotion applies to
    pub scope: Scope,
}

impl<'a> Promotion<'a> {
    /// Create an active, unbounded promotion.
    pub fn new(
        key: PromotionKey,
        name: impl Into<String>,
        rule: DiscountRule<'a>,
        scope: Scope,
    ) -> Self {
        Self {
            key,
            name: name.into(),
            rule,
            is_active: true,
            window: ActivityWindow::unbounded(),
            scope,
        }
    }

    /// Set the activity window.
    #[must_use]
    pub fn with_window(mut self, window: ActivityWindow) -> Self {
        self.window = window;
        self
    }

    /// Set the administrative active flag.
    #[must_use]
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Whether the promotion is switched on and `at` falls inside its window.
    pub fn is_currently_active(&self, at: Timestamp) -> bool {
        self.is_active && self.window.contains(at)
    }

    /// Whether the promotion is currently active and its scope covers `product`.
    pub fn applies_to(&self, product: &Product<'_>, at: Timestamp) -> bool {
        self.is_currently_active(at) && self.scope.matches(product)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rusty_money::{Money, iso::COP};
    use testresult::TestResult;

    use crate::products::ProductKey;

    use super::*;

    fn promotion() -> Promotion<'static> {
        Promotion::new(
            PromotionKey::default(),
            "Ten off",
            DiscountRule::Percent(Decimal::from(10)),
            Scope::AllProducts,
        )
    }

    fn product() -> Product<'static> {
        Product {
            key: ProductKey::default(),
            name: "Pan tajado".to_string(),
            slug: "pan-tajado".to_string(),
            category: None,
            price: Money::from_decimal(Decimal::from(6_000), COP),
            available: true,
        }
    }

    #[test]
    fn new_promotion_is_active_and_unbounded() -> TestResult {
        let promo = promotion();

        assert!(promo.is_active);
        assert_eq!(promo.window, ActivityWindow::unbounded());
        assert!(promo.is_currently_active("2026-10-19T12:00:00Z".parse()?));

        Ok(())
    }

    #[test]
    fn inactive_flag_wins_over_window() -> TestResult {
        let promo = promotion().with_active(false);

        assert!(!promo.is_currently_active("2026-10-19T12:00:00Z".parse()?));

        Ok(())
    }

    #[test]
    fn future_start_is_not_active_yet() -> TestResult {
        let promo =
            promotion().with_window(ActivityWindow::starting("2026-12-01T00:00:00Z".parse()?));

        assert!(!promo.is_currently_active("2026-10-19T12:00:00Z".parse()?));
        assert!(promo.is_currently_active("2026-12-01T00:00:00Z".parse()?));

        Ok(())
    }

    #[test]
    fn applies_to_requires_scope_match() -> TestResult {
        let at = "2026-10-19T12:00:00Z".parse()?;
        let everything = promotion();
        let nothing = Promotion {
            scope: Scope::products([]),
            ..promotion()
        };

        assert!(everything.applies_to(&product(), at));
        assert!(!nothing.applies_to(&product(), at));

        Ok(())
    }
}
