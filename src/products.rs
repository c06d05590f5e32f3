//! Products

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Stable product identifier.
///
/// Cart lines and persisted records refer to products by this id, so it must
/// survive serialization unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Creates a product id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A catalog product record.
///
/// Prices are exact decimals in major currency units; the display currency
/// belongs to the catalog, not the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Stable identifier.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Long-form description shown on the detail page.
    #[serde(default)]
    pub description: String,

    /// Undiscounted unit price.
    pub price: Decimal,

    /// Image reference.
    #[serde(default)]
    pub image: String,

    /// Category label.
    pub category: String,

    /// Average review rating.
    #[serde(default)]
    pub rating: f32,

    /// Number of reviews behind the rating.
    #[serde(default)]
    pub reviews: u32,

    /// Discount in percent points (0 to 100).
    #[serde(default)]
    pub discount: u8,

    /// Units in stock.
    #[serde(default)]
    pub stock: u32,

    /// Available colour variants.
    #[serde(default)]
    pub colors: SmallVec<[String; 5]>,

    /// Available size variants.
    #[serde(default)]
    pub sizes: SmallVec<[String; 5]>,
}

impl Product {
    /// Unit price with the product discount applied, unrounded.
    ///
    /// Cart lines freeze this value when they are created; rounding to the
    /// currency minor unit happens at display time only.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        if self.discount == 0 {
            return self.price;
        }

        // Discounts are percent points, capped at 100.
        let fraction = Percentage::from(Decimal::new(i64::from(self.discount.min(100)), 2));

        self.price - fraction * self.price
    }

    /// Whether the product carries a discount.
    #[must_use]
    pub fn on_sale(&self) -> bool {
        self.discount > 0
    }

    /// Whether any units are in stock.
    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
