//! Checkout

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    cart::{Cart, LineItem},
    pricing::{self, Totals},
    storage::Store,
};

/// Mock payment descriptor shown on the confirmation; no payment is ever
/// processed.
const PAYMENT_METHOD: &str = "Credit Card";

/// The only shipping option on offer.
const SHIPPING_METHOD: &str = "Standard Shipping";

/// Errors from order placement.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// Orders cannot be placed from an empty cart.
    #[error("cannot check out an empty cart")]
    EmptyCart,
}

/// Contact and delivery details captured by the checkout form.
///
/// Field-level validation is the form layer's job; by the time this struct
/// exists the values are taken as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutDetails {
    /// Recipient first name.
    pub first_name: String,

    /// Recipient last name.
    pub last_name: String,

    /// Contact email.
    pub email: String,

    /// Street address.
    pub address: String,

    /// City.
    pub city: String,

    /// Postal code.
    pub postal_code: String,

    /// Country.
    pub country: String,
}

/// A placed order: the cart lines and their derived totals, frozen at the
/// moment of checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Display order number, `ORD-` followed by six digits.
    pub number: String,

    /// Who and where the order ships to.
    pub details: CheckoutDetails,

    /// Snapshot of the cart lines at placement.
    pub lines: Vec<LineItem>,

    /// Totals derived once, at placement.
    pub totals: Totals,

    /// Payment descriptor (mock).
    pub payment_method: String,

    /// Shipping descriptor.
    pub shipping_method: String,
}

/// Place an order from the cart's current contents.
///
/// Totals come from the pricing calculator exactly once and are frozen into
/// the order. On success the cart is cleared (which persists the empty
/// list).
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
pub fn place_order<S: Store<Vec<LineItem>>>(
    cart: &mut Cart<S>,
    details: CheckoutDetails,
) -> Result<Order, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let lines = cart.items().to_vec();
    let totals = pricing::quote(&lines);

    let order = Order {
        number: order_number(),
        details,
        lines,
        totals,
        payment_method: PAYMENT_METHOD.to_string(),
        shipping_method: SHIPPING_METHOD.to_string(),
    };

    cart.clear();

    Ok(order)
}

/// Generate a display order number in the `ORD-` six-digit form.
fn order_number() -> String {
    let digits = rand::thread_rng().gen_range(100_000..1_000_000);

    format!("ORD-{digits}")
}
