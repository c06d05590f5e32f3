//! Catalog

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::iso::{self, Currency};
use slotmap::{SlotMap, new_key_type};
use thiserror::Error;

use crate::products::{Product, ProductId};

new_key_type! {
    /// Catalog storage key
    pub struct CatalogKey;
}

/// Errors from catalog mutation or lookup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A product with the same id is already in the catalog.
    #[error("Product id already in catalog: {0}")]
    DuplicateId(ProductId),

    /// No product with this id.
    #[error("Product not found: {0}")]
    NotFound(ProductId),
}

/// Search criteria; all populated fields must match.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive text query over name, description and category.
    pub query: Option<String>,

    /// Exact category match.
    pub category: Option<String>,

    /// Inclusive unit-price range.
    pub price_range: Option<(Decimal, Decimal)>,

    /// Keep only products with stock remaining.
    pub in_stock_only: bool,

    /// Keep only discounted products.
    pub on_sale_only: bool,
}

/// Sort order for search results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductSort {
    /// Catalog insertion order.
    #[default]
    Featured,

    /// Cheapest first.
    PriceLowHigh,

    /// Most expensive first.
    PriceHighLow,

    /// Highest rating first.
    Rating,
}

/// The product catalog.
///
/// The cart and checkout flows only ever read from it; the admin flow
/// mutates it through [`crate::admin::CatalogEditor`].
#[derive(Debug)]
pub struct Catalog {
    products: SlotMap<CatalogKey, Product>,

    /// Stable id -> storage key index.
    ids: FxHashMap<ProductId, CatalogKey>,

    /// Insertion order; slot iteration order is not stable across removals.
    order: Vec<CatalogKey>,

    /// Display currency for every price in the catalog.
    currency: &'static Currency,
}

impl Catalog {
    /// Create an empty catalog priced in USD.
    #[must_use]
    pub fn new() -> Self {
        Self::with_currency(iso::USD)
    }

    /// Create an empty catalog priced in the given currency.
    #[must_use]
    pub fn with_currency(currency: &'static Currency) -> Self {
        Catalog {
            products: SlotMap::with_key(),
            ids: FxHashMap::default(),
            order: Vec::new(),
            currency,
        }
    }

    /// Create a catalog from a sequence of products.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if two products share an id.
    pub fn with_products(
        products: impl IntoIterator<Item = Product>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::with_currency(currency);

        for product in products {
            catalog.insert(product)?;
        }

        Ok(catalog)
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if the id is already present.
    pub fn insert(&mut self, product: Product) -> Result<CatalogKey, CatalogError> {
        if self.ids.contains_key(&product.id) {
            return Err(CatalogError::DuplicateId(product.id));
        }

        let id = product.id.clone();
        let key = self.products.insert(product);

        self.ids.insert(id, key);
        self.order.push(key);

        Ok(key)
    }

    /// Replace a product's record, keyed by its id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the id is not in the catalog.
    pub fn update(&mut self, product: Product) -> Result<(), CatalogError> {
        let key = self
            .ids
            .get(&product.id)
            .copied()
            .ok_or_else(|| CatalogError::NotFound(product.id.clone()))?;

        if let Some(slot) = self.products.get_mut(key) {
            *slot = product;
        }

        Ok(())
    }

    /// Remove a product, returning its record.
    ///
    /// Cart lines referring to the removed id keep their frozen prices.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the id is not in the catalog.
    pub fn remove(&mut self, id: &ProductId) -> Result<Product, CatalogError> {
        let key = self
            .ids
            .remove(id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;

        self.order.retain(|entry| *entry != key);

        self.products
            .remove(key)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.ids.get(id).and_then(|key| self.products.get(*key))
    }

    /// Iterate over the products in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.order
            .iter()
            .filter_map(|key| self.products.get(*key))
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Display currency for every price in the catalog.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Unique category labels in insertion order.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();

        for product in self.iter() {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }

        categories
    }

    /// Smallest and largest unit prices, or `None` for an empty catalog.
    #[must_use]
    pub fn price_bounds(&self) -> Option<(Decimal, Decimal)> {
        let mut bounds: Option<(Decimal, Decimal)> = None;

        for product in self.iter() {
            bounds = Some(match bounds {
                None => (product.price, product.price),
                Some((min, max)) => (min.min(product.price), max.max(product.price)),
            });
        }

        bounds
    }

    /// Filter and sort the catalog for a browse view.
    ///
    /// Sorting is stable, so equally-ranked products keep catalog order.
    #[must_use]
    pub fn search(&self, filter: &ProductFilter, sort: ProductSort) -> Vec<&Product> {
        let query = filter.query.as_deref().map(str::to_lowercase);

        let mut result: Vec<&Product> = self
            .iter()
            .filter(|product| matches_filter(product, filter, query.as_deref()))
            .collect();

        match sort {
            ProductSort::Featured => {}
            ProductSort::PriceLowHigh => result.sort_by(|a, b| a.price.cmp(&b.price)),
            ProductSort::PriceHighLow => result.sort_by(|a, b| b.price.cmp(&a.price)),
            ProductSort::Rating => result.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        }

        result
    }

    /// Discounted products grouped by discount percentage, deepest first.
    #[must_use]
    pub fn deals(&self) -> Vec<(u8, Vec<&Product>)> {
        let mut groups: Vec<(u8, Vec<&Product>)> = Vec::new();

        for product in self.iter().filter(|product| product.on_sale()) {
            match groups.iter_mut().find(|(discount, _)| *discount == product.discount) {
                Some((_, list)) => list.push(product),
                None => groups.push((product.discount, vec![product])),
            }
        }

        groups.sort_by(|a, b| b.0.cmp(&a.0));

        groups
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_filter(product: &Product, filter: &ProductFilter, query: Option<&str>) -> bool {
    if let Some(query) = query {
        let hit = product.name.to_lowercase().contains(query)
            || product.description.to_lowercase().contains(query)
            || product.category.to_lowercase().contains(query);

        if !hit {
            return false;
        }
    }

    if let Some(category) = &filter.category {
        if product.category != *category {
            return false;
        }
    }

    if let Some((min, max)) = filter.price_range {
        if product.price < min || product.price > max {
            return false;
        }
    }

    if filter.in_stock_only && !product.in_stock() {
        return false;
    }

    if filter.on_sale_only && !product.on_sale() {
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    fn product(id: &str, name: &str, category: &str, price: Decimal) -> Product {
        Product {
            id: ProductId::from(id),
            name: name.to_string(),
            description: String::new(),
            price,
            image: String::new(),
            category: category.to_string(),
            rating: 0.0,
            reviews: 0,
            discount: 0,
            stock: 1,
            colors: smallvec::SmallVec::new(),
            sizes: smallvec::SmallVec::new(),
        }
    }

    fn sample() -> Result<Catalog, CatalogError> {
        Catalog::with_products(
            [
                Product {
                    rating: 4.8,
                    discount: 20,
                    ..product("lamp", "Desk Lamp", "Home", Decimal::new(4500, 2))
                },
                Product {
                    rating: 4.1,
                    ..product("mug", "Coffee Mug", "Home", Decimal::new(1250, 2))
                },
                Product {
                    rating: 4.6,
                    discount: 20,
                    stock: 0,
                    ..product("tee", "Logo Tee", "Clothing", Decimal::new(2499, 2))
                },
                Product {
                    rating: 3.9,
                    discount: 10,
                    ..product("cap", "Baseball Cap", "Clothing", Decimal::new(1800, 2))
                },
            ],
            USD,
        )
    }

    #[test]
    fn insert_rejects_duplicate_ids() -> TestResult {
        let mut catalog = sample()?;

        let result = catalog.insert(product("mug", "Another Mug", "Home", Decimal::ONE));

        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id.as_str() == "mug"));

        Ok(())
    }

    #[test]
    fn get_returns_inserted_product() -> TestResult {
        let catalog = sample()?;

        let mug = catalog
            .get(&ProductId::from("mug"))
            .ok_or("expected mug in catalog")?;

        assert_eq!(mug.name, "Coffee Mug");

        Ok(())
    }

    #[test]
    fn update_replaces_record_in_place() -> TestResult {
        let mut catalog = sample()?;

        catalog.update(product("mug", "Travel Mug", "Home", Decimal::new(1500, 2)))?;

        let mug = catalog
            .get(&ProductId::from("mug"))
            .ok_or("expected mug in catalog")?;

        assert_eq!(mug.name, "Travel Mug");
        assert_eq!(catalog.len(), 4);

        Ok(())
    }

    #[test]
    fn update_missing_product_errors() -> TestResult {
        let mut catalog = sample()?;

        let result = catalog.update(product("ghost", "Ghost", "Home", Decimal::ONE));

        assert!(matches!(result, Err(CatalogError::NotFound(_))));

        Ok(())
    }

    #[test]
    fn remove_returns_product_and_preserves_order() -> TestResult {
        let mut catalog = sample()?;

        let removed = catalog.remove(&ProductId::from("mug"))?;

        assert_eq!(removed.name, "Coffee Mug");
        assert!(catalog.get(&ProductId::from("mug")).is_none());

        let names: Vec<&str> = catalog.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Desk Lamp", "Logo Tee", "Baseball Cap"]);

        Ok(())
    }

    #[test]
    fn remove_missing_product_errors() -> TestResult {
        let mut catalog = sample()?;

        let result = catalog.remove(&ProductId::from("ghost"));

        assert!(matches!(result, Err(CatalogError::NotFound(_))));

        Ok(())
    }

    #[test]
    fn categories_are_unique_in_insertion_order() -> TestResult {
        let catalog = sample()?;

        assert_eq!(catalog.categories(), ["Home", "Clothing"]);

        Ok(())
    }

    #[test]
    fn price_bounds_span_the_catalog() -> TestResult {
        let catalog = sample()?;

        assert_eq!(
            catalog.price_bounds(),
            Some((Decimal::new(1250, 2), Decimal::new(4500, 2)))
        );

        assert_eq!(Catalog::new().price_bounds(), None);

        Ok(())
    }

    #[test]
    fn search_query_matches_name_description_and_category() -> TestResult {
        let catalog = sample()?;

        let filter = ProductFilter {
            query: Some("clothing".to_string()),
            ..ProductFilter::default()
        };

        let hits = catalog.search(&filter, ProductSort::Featured);
        let names: Vec<&str> = hits.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, ["Logo Tee", "Baseball Cap"]);

        Ok(())
    }

    #[test]
    fn search_applies_price_range_and_stock_filters() -> TestResult {
        let catalog = sample()?;

        let filter = ProductFilter {
            price_range: Some((Decimal::new(1000, 2), Decimal::new(2500, 2))),
            in_stock_only: true,
            ..ProductFilter::default()
        };

        let hits = catalog.search(&filter, ProductSort::Featured);
        let names: Vec<&str> = hits.iter().map(|p| p.name.as_str()).collect();

        // The tee is in range but out of stock.
        assert_eq!(names, ["Coffee Mug", "Baseball Cap"]);

        Ok(())
    }

    #[test]
    fn search_sorts_by_price_in_both_directions() -> TestResult {
        let catalog = sample()?;
        let filter = ProductFilter::default();

        let ascending: Vec<&str> = catalog
            .search(&filter, ProductSort::PriceLowHigh)
            .iter()
            .map(|p| p.name.as_str())
            .collect();

        assert_eq!(
            ascending,
            ["Coffee Mug", "Baseball Cap", "Logo Tee", "Desk Lamp"]
        );

        let descending: Vec<&str> = catalog
            .search(&filter, ProductSort::PriceHighLow)
            .iter()
            .map(|p| p.name.as_str())
            .collect();

        assert_eq!(
            descending,
            ["Desk Lamp", "Logo Tee", "Baseball Cap", "Coffee Mug"]
        );

        Ok(())
    }

    #[test]
    fn search_sorts_by_rating_descending() -> TestResult {
        let catalog = sample()?;

        let top_rated: Vec<&str> = catalog
            .search(&ProductFilter::default(), ProductSort::Rating)
            .iter()
            .map(|p| p.name.as_str())
            .collect();

        assert_eq!(
            top_rated,
            ["Desk Lamp", "Logo Tee", "Coffee Mug", "Baseball Cap"]
        );

        Ok(())
    }

    #[test]
    fn deals_group_by_discount_deepest_first() -> TestResult {
        let catalog = sample()?;

        let deals = catalog.deals();

        let summary: Vec<(u8, Vec<&str>)> = deals
            .iter()
            .map(|(discount, products)| {
                (*discount, products.iter().map(|p| p.name.as_str()).collect())
            })
            .collect();

        assert_eq!(
            summary,
            [
                (20, vec!["Desk Lamp", "Logo Tee"]),
                (10, vec!["Baseball Cap"]),
            ]
        );

        Ok(())
    }

    #[test]
    fn on_sale_filter_keeps_only_discounted_products() -> TestResult {
        let catalog = sample()?;

        let filter = ProductFilter {
            on_sale_only: true,
            ..ProductFilter::default()
        };

        assert_eq!(catalog.search(&filter, ProductSort::Featured).len(), 3);

        Ok(())
    }

    #[test]
    fn empty_catalog_reports_empty() {
        let catalog = Catalog::new();

        assert!(catalog.is_empty());
        assert_eq!(catalog.len(), 0);
        assert_eq!(catalog.currency(), iso::USD);
    }
}
