//! Cart

use std::{collections::BTreeMap, fmt};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    products::{Product, ProductId},
    storage::Store,
};

/// Chosen variant attributes for a cart line, e.g. colour and size.
///
/// Attributes are held in a sorted map, so two selections compare equal
/// regardless of the order they were chosen in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariantSelection(BTreeMap<String, String>);

impl VariantSelection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute choice, replacing any previous value for it.
    #[must_use]
    pub fn with(mut self, attribute: &str, value: &str) -> Self {
        self.0.insert(attribute.to_string(), value.to_string());
        self
    }

    /// The chosen value for an attribute.
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.0.get(attribute).map(String::as_str)
    }

    /// Whether no attributes were chosen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the chosen attributes in attribute order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(attribute, value)| (attribute.as_str(), value.as_str()))
    }
}

impl fmt::Display for VariantSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;

        for (attribute, value) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }

            write!(f, "{attribute}: {value}")?;
            first = false;
        }

        Ok(())
    }
}

/// A single cart line.
///
/// The unit price is the product's discount-adjusted price frozen at the
/// moment the line was created, stored unrounded; later catalog changes do
/// not touch it. The serialized shape, `{id, name, price, image, quantity,
/// variant?}`, is the persisted cart record and carries no version field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product id this line refers to.
    pub id: ProductId,

    /// Display name captured at add time.
    pub name: String,

    /// Frozen effective unit price, unrounded.
    pub price: Decimal,

    /// Image reference captured at add time.
    #[serde(default)]
    pub image: String,

    /// Number of units; always at least 1.
    pub quantity: u32,

    /// Chosen variant attributes, if the product has any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<VariantSelection>,
}

impl LineItem {
    /// Unit price times quantity, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Two lines are the same cart entry iff product id and variant match.
    fn is_same_entry(&self, id: &ProductId, variant: Option<&VariantSelection>) -> bool {
        self.id == *id && self.variant.as_ref() == variant
    }
}

/// The cart store: sole owner of the ordered line-item list.
///
/// Every mutation passes through it and is mirrored to the backing store
/// afterwards. Mirroring is best-effort: a failed write is logged and the
/// in-memory list stays authoritative for the rest of the session.
#[derive(Debug)]
pub struct Cart<S> {
    items: Vec<LineItem>,
    storage: S,
}

impl<S> Cart<S> {
    /// The current lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of lines (not units).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<S: Store<Vec<LineItem>>> Cart<S> {
    /// Open a cart, seeding it from the backing store.
    ///
    /// Reloading happens exactly once, here. A missing or unreadable record
    /// yields an empty cart; persistence problems never surface as errors.
    pub fn open(storage: S) -> Self {
        let items = match storage.load() {
            Ok(Some(items)) => items,
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("discarding unreadable cart record: {err}");
                Vec::new()
            }
        };

        Cart { items, storage }
    }

    /// Add units of a product to the cart.
    ///
    /// If a line with the same product id and variant selection already
    /// exists, its quantity grows by `quantity`; otherwise a new line is
    /// appended with the product's current effective price frozen in.
    /// A quantity of zero is clamped to 1 (callers validate upstream; the
    /// clamp keeps the always-positive invariant regardless).
    pub fn add_item(&mut self, product: &Product, quantity: u32, variant: Option<VariantSelection>) {
        let quantity = quantity.max(1);

        match self
            .items
            .iter_mut()
            .find(|item| item.is_same_entry(&product.id, variant.as_ref()))
        {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.items.push(LineItem {
                id: product.id.clone(),
                name: product.name.clone(),
                price: product.effective_price(),
                image: product.image.clone(),
                quantity,
                variant,
            }),
        }

        debug!(id = %product.id, quantity, "added to cart");
        self.persist();
    }

    /// Remove every line for a product id, variants included.
    ///
    /// Removal is keyed by product id alone, so all variant lines of the
    /// product go together. An id with no lines is a no-op.
    pub fn remove_item(&mut self, id: &ProductId) {
        self.items.retain(|item| item.id != *id);
        self.persist();
    }

    /// Set the quantity of every line for a product id directly.
    ///
    /// No merge logic; quantities below 1 are clamped to 1, and a quantity
    /// of zero never removes the line (callers remove explicitly instead).
    /// An id with no lines is a no-op.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: u32) {
        let quantity = quantity.max(1);

        for line in self.items.iter_mut().filter(|item| item.id == *id) {
            line.quantity = quantity;
        }

        self.persist();
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.persist();
    }

    fn persist(&self) {
        if let Err(err) = self.storage.save(&self.items) {
            // The in-memory list stays authoritative for the session.
            warn!("failed to persist cart: {err}");
        }
    }
}
