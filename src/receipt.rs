//! Receipt

use std::io;

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{Alignment, Color, Style, object::{Columns, Rows}},
};
use thiserror::Error;

use crate::{cart::LineItem, pricing::Totals};

/// Errors that can occur when rendering an order summary.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// The output sink rejected a write.
    #[error("failed to write order summary")]
    Io(#[from] io::Error),

    /// An amount is too large to express in minor units.
    #[error("amount not representable in minor units: {0}")]
    Amount(Decimal),
}

/// Order summary renderer.
///
/// This is the display boundary: every monetary value is rounded to the
/// currency minor unit here, and nowhere earlier.
#[derive(Debug)]
pub struct OrderSummary<'a> {
    lines: &'a [LineItem],
    totals: Totals,
    currency: &'static Currency,
}

impl<'a> OrderSummary<'a> {
    /// Create a summary over a set of lines and their derived totals.
    #[must_use]
    pub fn new(lines: &'a [LineItem], totals: Totals, currency: &'static Currency) -> Self {
        OrderSummary {
            lines,
            totals,
            currency,
        }
    }

    /// Format an amount for display, rounded to the minor unit.
    fn display_amount(&self, amount: Decimal) -> Result<String, ReceiptError> {
        let minor = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|value| value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|value| value.to_i64())
            .ok_or(ReceiptError::Amount(amount))?;

        Ok(Money::from_minor(minor, self.currency).to_string())
    }

    /// Render the item table and totals to the given sink.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if the sink rejects a write or an amount
    /// cannot be expressed in minor units.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Item", "Variant", "Qty", "Unit Price", "Line Total"]);

        for line in self.lines {
            let variant = line
                .variant
                .as_ref()
                .map_or_else(String::new, ToString::to_string);

            builder.push_record([
                line.name.clone(),
                variant,
                line.quantity.to_string(),
                self.display_amount(line.price)?,
                self.display_amount(line.line_total())?,
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(2..5), Alignment::right());

        writeln!(out, "{table}")?;

        self.write_summary(&mut out)
    }

    fn write_summary(&self, out: &mut impl io::Write) -> Result<(), ReceiptError> {
        let shipping = if self.totals.free_shipping() {
            "Free".to_string()
        } else {
            self.display_amount(self.totals.shipping)?
        };

        let rows = [
            ("Subtotal:", self.display_amount(self.totals.subtotal)?),
            ("Shipping:", shipping),
            ("Tax (7%):", self.display_amount(self.totals.tax)?),
            ("Total:", self.display_amount(self.totals.total)?),
        ];

        let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
        let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

        for (label, value) in &rows {
            writeln!(out, " {label:>label_width$}  {value:>value_width$}")?;
        }

        writeln!(out)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{pricing, products::ProductId};

    use super::*;

    fn lines() -> Vec<LineItem> {
        vec![
            LineItem {
                id: ProductId::from("tee"),
                name: "Logo Tee".to_string(),
                price: Decimal::new(169_915, 4),
                image: String::new(),
                quantity: 2,
                variant: Some(
                    crate::cart::VariantSelection::new()
                        .with("color", "Red")
                        .with("size", "M"),
                ),
            },
            LineItem {
                id: ProductId::from("mug"),
                name: "Coffee Mug".to_string(),
                price: Decimal::new(1250, 2),
                image: String::new(),
                quantity: 1,
                variant: None,
            },
        ]
    }

    fn render(lines: &[LineItem]) -> Result<String, Box<dyn std::error::Error>> {
        let totals = pricing::quote(lines);
        let summary = OrderSummary::new(lines, totals, USD);

        let mut out = Vec::new();
        summary.write_to(&mut out)?;

        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn summary_renders_items_variants_and_totals() -> TestResult {
        let output = render(&lines())?;

        assert!(output.contains("Logo Tee"));
        assert!(output.contains("color: Red, size: M"));
        assert!(output.contains("Coffee Mug"));

        // 16.9915 rounds to $16.99 only in display.
        assert!(output.contains("$16.99"));

        // Subtotal 46.483 -> $46.48; tax 3.25381 -> $3.25.
        assert!(output.contains("Subtotal:"));
        assert!(output.contains("$46.48"));
        assert!(output.contains("Tax (7%):"));
        assert!(output.contains("$3.25"));
        assert!(output.contains("$5.99"));

        Ok(())
    }

    #[test]
    fn free_shipping_renders_as_the_word_free() -> TestResult {
        let big_order = vec![LineItem {
            id: ProductId::from("watch"),
            name: "Watch".to_string(),
            price: Decimal::from(120),
            image: String::new(),
            quantity: 1,
            variant: None,
        }];

        let output = render(&big_order)?;

        assert!(output.contains("Free"));
        assert!(output.contains("$128.40"));

        Ok(())
    }

    #[test]
    fn midpoint_amounts_round_away_from_zero() -> TestResult {
        let totals = pricing::quote(&[]);
        let summary = OrderSummary::new(&[], totals, USD);

        assert_eq!(summary.display_amount(Decimal::new(16_995, 3))?, "$17.00");

        Ok(())
    }

    #[test]
    fn unrepresentable_amounts_error_instead_of_truncating() {
        let totals = pricing::quote(&[]);
        let summary = OrderSummary::new(&[], totals, USD);

        let result = summary.display_amount(Decimal::MAX);

        assert!(matches!(result, Err(ReceiptError::Amount(_))));
    }
}
