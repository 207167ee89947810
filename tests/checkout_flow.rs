//! Integration tests for the bakery fixture set, priced end to end through checkout.
//!
//! On 2026-10-19 these promotions are live:
//!
//! - Pan del día: 10% off the bakery category
//! - Croissant a 3.500: 2000 off croissants
//! - Octubre pastelero: 20% off pastries, October 2026 only
//! - Café madrugador: 12.5% off coffee
//!
//! Navidad 2025 has expired, Lanzamiento is switched off and Dos por uno is a kind the engine
//! does not apply. The cart prices as:
//!
//! | Product               | Qty | Unit    | Subtotal | Total   |
//! |-----------------------|-----|---------|----------|---------|
//! | Pan francés           | 6   | 540     | 3600     | 3240    |
//! | Croissant             | 2   | 3500    | 11000    | 7000    |
//! | Milhoja               | 1   | 5200    | 6500     | 5200    |
//! | Café con leche        | 2   | 3062.50 | 7000     | 6125    |
//! | Chocolate santafereño | 1   | 4800    | 4800     | 4800    |
//! | Mogolla integral      | 1   | 1080    | 1200     | 1080    |
//!
//! Subtotal 34100, discount 6655, total 27445.

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{COP, Currency},
};
use testresult::TestResult;

use baneton::{
    checkout::{CheckoutError, CheckoutRequest, RawLine},
    fixtures::Fixture,
    pricing::PricingEngine,
    receipt::write_receipt,
};

fn cop(amount: Decimal) -> Money<'static, Currency> {
    Money::from_decimal(amount, COP)
}

fn pesos(amount: i64) -> Money<'static, Currency> {
    cop(Decimal::from(amount))
}

fn october() -> Result<Timestamp, jiff::Error> {
    "2026-10-19T12:00:00Z".parse()
}

#[test]
fn bakery_cart_prices_with_best_promotion_per_line() -> TestResult {
    let fixture = Fixture::from_set("bakery")?;

    let order = fixture.checkout().place_order(fixture.cart()?, october()?)?;

    let totals: Vec<_> = order
        .lines
        .iter()
        .map(|line| (line.product_name.as_str(), line.quantity, line.line_total))
        .collect();

    assert_eq!(
        totals,
        [
            ("Pan francés", 6, pesos(3_240)),
            ("Croissant de mantequilla", 2, pesos(7_000)),
            ("Milhoja de arequipe", 1, pesos(5_200)),
            ("Café con leche", 2, pesos(6_125)),
            ("Chocolate santafereño", 1, pesos(4_800)),
            ("Mogolla integral", 1, pesos(1_080)),
        ]
    );

    assert_eq!(order.totals.subtotal, pesos(34_100));
    assert_eq!(order.totals.discount_total, pesos(6_655));
    assert_eq!(order.totals.total, pesos(27_445));
    assert_eq!(order.payment_method, "Cash");
    assert!(order.is_reconciled());

    Ok(())
}

#[test]
fn pastry_promotion_lapses_after_october() -> TestResult {
    let fixture = Fixture::from_set("bakery")?;

    let order = fixture
        .checkout()
        .place_order(fixture.cart()?, "2026-11-05T09:00:00Z".parse()?)?;

    // Milhoja back to full price; croissant keeps the fixed discount.
    assert_eq!(order.totals.discount_total, pesos(5_355));
    assert_eq!(order.totals.total, pesos(28_745));

    Ok(())
}

#[test]
fn winning_promotion_is_reported_per_product() -> TestResult {
    let fixture = Fixture::from_set("bakery")?;
    let engine = PricingEngine::new(fixture.promotions(), october()?);

    let croissant = engine.resolve_best_unit_price(fixture.product("croissant")?, 1)?;
    let coffee = engine.resolve_best_unit_price(fixture.product("cafe-con-leche")?, 2)?;
    let chocolate = engine.resolve_best_unit_price(fixture.product("chocolate-santafereno")?, 1)?;

    assert_eq!(croissant.promotion, Some(fixture.promotion("croissant-fijo")?.key));
    assert_eq!(croissant.discount_percent, 36);

    assert_eq!(coffee.final_price, cop(Decimal::new(306_250, 2)));
    assert_eq!(coffee.promotion, Some(fixture.promotion("cafe-madrugador")?.key));
    // 12.5 rounds to even
    assert_eq!(coffee.discount_percent, 12);

    assert_eq!(chocolate.promotion, None);

    Ok(())
}

#[test]
fn scanned_and_listed_requests_price_identically() -> TestResult {
    let fixture = Fixture::from_set("bakery")?;
    let checkout = fixture.checkout();

    let scanned = CheckoutRequest::from_scans(["tinto", "almojabana", "tinto", "tinto"]);
    let listed = CheckoutRequest::from_lines([
        RawLine::new("tinto", Some(3)),
        RawLine::new("almojabana", None),
    ]);

    let from_scans = checkout.place_order(&scanned, october()?)?;
    let from_lines = checkout.place_order(&listed, october()?)?;

    assert_eq!(from_scans.lines, from_lines.lines);
    assert_eq!(from_scans.totals, from_lines.totals);

    // 3 tintos at 1750, 1 almojábana at 2250
    assert_eq!(from_scans.totals.total, pesos(7_500));

    Ok(())
}

#[test]
fn unknown_product_fails_checkout() -> TestResult {
    let fixture = Fixture::from_set("bakery")?;

    let result = fixture
        .checkout()
        .place_order(&CheckoutRequest::from_scans(["brownie"]), october()?);

    assert!(matches!(result, Err(CheckoutError::UnknownProduct(slug)) if slug == "brownie"));

    Ok(())
}

#[test]
fn receipt_renders_priced_order() -> TestResult {
    let fixture = Fixture::from_set("bakery")?;
    let order = fixture.checkout().place_order(fixture.cart()?, october()?)?;

    let mut out = Vec::new();
    write_receipt(&mut out, &order)?;

    let output = String::from_utf8(out)?;

    assert!(output.contains("Milhoja de arequipe"));
    assert!(output.contains("Subtotal:"));
    // 6655 / 34100
    assert!(output.contains("(19.52%)"));

    Ok(())
}
