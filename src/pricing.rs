//! Pricing
//!
//! Pure derivations over a cart's line items. Every read site (cart
//! summary, checkout summary, confirmation) calls into here, so the three
//! can never drift apart. Nothing is cached: the line-item list is the only
//! input and the arithmetic is cheap, so recomputation beats invalidation
//! bookkeeping.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::LineItem;

/// Free-shipping threshold in major currency units.
fn free_shipping_threshold() -> Decimal {
    Decimal::from(100)
}

/// Flat shipping fee charged below the threshold.
fn flat_shipping_fee() -> Decimal {
    Decimal::new(599, 2)
}

/// Flat sales tax rate, no jurisdiction logic.
fn tax_rate() -> Decimal {
    Decimal::new(7, 2)
}

/// Derived order totals, all unrounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of line totals.
    pub subtotal: Decimal,

    /// Shipping fee after the free-shipping rule.
    pub shipping: Decimal,

    /// Flat-rate tax on the subtotal.
    pub tax: Decimal,

    /// Subtotal plus shipping plus tax.
    pub total: Decimal,
}

impl Totals {
    /// Whether the order earned free shipping (as opposed to shipping
    /// nothing at all).
    #[must_use]
    pub fn free_shipping(&self) -> bool {
        self.shipping == Decimal::ZERO && self.subtotal > Decimal::ZERO
    }
}

/// Sum of unit price times quantity across the lines.
#[must_use]
pub fn subtotal(items: &[LineItem]) -> Decimal {
    items.iter().map(LineItem::line_total).sum()
}

/// Shipping fee for a given subtotal: free for an empty order, free at or
/// above the threshold, a flat fee otherwise.
#[must_use]
pub fn shipping_fee(subtotal: Decimal) -> Decimal {
    if subtotal == Decimal::ZERO || subtotal >= free_shipping_threshold() {
        Decimal::ZERO
    } else {
        flat_shipping_fee()
    }
}

/// Flat-rate tax on a subtotal.
#[must_use]
pub fn tax(subtotal: Decimal) -> Decimal {
    subtotal * tax_rate()
}

/// Derive all totals for a set of lines in one pass.
#[must_use]
pub fn quote(items: &[LineItem]) -> Totals {
    let subtotal = subtotal(items);
    let shipping = shipping_fee(subtotal);
    let tax = tax(subtotal);

    Totals {
        subtotal,
        shipping,
        tax,
        total: subtotal + shipping + tax,
    }
}
