//! Receipt

use std::io;

use rust_decimal::Decimal;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::orders::{Order, OrderLine};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// IO error
    #[error("IO error")]
    IO,
}

/// Write an itemised receipt for `order` followed by its totals.
///
/// # Errors
///
/// Returns [`ReceiptError::IO`] if writing to `out` fails.
pub fn write_receipt(mut out: impl io::Write, order: &Order<'_>) -> Result<(), ReceiptError> {
    let mut builder = Builder::default();

    builder.push_record(["Item", "Qty", "Unit Price", "Subtotal", "Discount", "Total"]);

    for line in &order.lines {
        builder.push_record(line_cells(line));
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(1..), Alignment::right());
    table.modify(Rows::first(), Alignment::center());

    writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

    write_summary(&mut out, order)
}

fn line_cells(line: &OrderLine<'_>) -> [String; 6] {
    let discount = if line.line_discount.is_zero() {
        String::new()
    } else {
        format!("-{}", line.line_discount)
    };

    [
        line.product_name.clone(),
        line.quantity.to_string(),
        line.unit_price.to_string(),
        line.line_subtotal.to_string(),
        discount,
        line.line_total.to_string(),
    ]
}

fn write_summary(out: &mut impl io::Write, order: &Order<'_>) -> Result<(), ReceiptError> {
    let totals = &order.totals;
    let percent = savings_percent(totals.subtotal.amount(), totals.discount_total.amount());

    let rows = [
        ("Subtotal:", totals.subtotal.to_string()),
        ("Discount:", format!("({percent}%) -{}", totals.discount_total)),
        ("Total:", totals.total.to_string()),
        ("Paid by:", order.payment_method.clone()),
    ];

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in rows {
        writeln!(out, " {label:>label_width$}  {value:>value_width$}")
            .map_err(|_err| ReceiptError::IO)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Percent of `subtotal` saved, to two decimal places.
fn savings_percent(subtotal: &Decimal, discount: &Decimal) -> Decimal {
    if subtotal.is_zero() {
        return Decimal::ZERO;
    }

    discount
        .checked_div(*subtotal)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(Decimal::ZERO, |points| points.round_dp(2))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use rusty_money::{
        Money,
        iso::{COP, Currency},
    };
    use testresult::TestResult;

    use crate::{
        orders::DEFAULT_PAYMENT_METHOD,
        products::{Product, ProductKey},
    };

    use super::*;

    fn product(name: &str, price: i64) -> Product<'static> {
        Product {
            key: ProductKey::default(),
            name: name.to_string(),
            slug: name.to_lowercase(),
            category: None,
            price: Money::from_decimal(Decimal::from(price), COP),
            available: true,
        }
    }

    fn cop(amount: i64) -> Money<'static, Currency> {
        Money::from_decimal(Decimal::from(amount), COP)
    }

    #[test]
    fn write_receipt_lists_lines_and_totals() -> TestResult {
        let at: Timestamp = "2026-10-19T07:00:00Z".parse()?;
        let mut order = Order::new(COP, DEFAULT_PAYMENT_METHOD, at);

        order.push_line(OrderLine::at_base_price(&product("Roscón", 9_000), 1)?)?;

        let mut discounted = OrderLine::at_base_price(&product("Croissant", 4_000), 2)?;
        discounted.unit_price = cop(3_000);
        discounted.line_discount = cop(2_000);
        discounted.line_total = cop(6_000);
        order.push_line(discounted)?;

        let mut out = Vec::new();
        write_receipt(&mut out, &order)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Roscón"));
        assert!(output.contains("Croissant"));
        assert!(output.contains("Subtotal:"));
        assert!(output.contains("Total:"));
        assert!(output.contains("(11.76%)"));
        assert!(output.contains("Cash"));

        Ok(())
    }

    #[test]
    fn write_receipt_of_empty_order_has_zero_savings() -> TestResult {
        let order = Order::new(COP, "Card", "2026-10-19T07:00:00Z".parse()?);

        let mut out = Vec::new();
        write_receipt(&mut out, &order)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("(0%)"));
        assert!(output.contains("Card"));

        Ok(())
    }

    #[test]
    fn savings_percent_handles_zero_subtotal() {
        assert_eq!(savings_percent(&Decimal::ZERO, &Decimal::ZERO), Decimal::ZERO);
        assert_eq!(
            savings_percent(&Decimal::from(200), &Decimal::from(50)),
            Decimal::from(25)
        );
    }
}
