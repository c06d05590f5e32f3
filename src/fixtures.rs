//! Fixtures
//!
//! Product-set data for demos and tests: YAML files loaded from a base
//! path, plus a small built-in sample catalog.

use std::{fs, path::PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use smallvec::smallvec;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogError},
    products::{Product, ProductId},
};

/// Fixture loading errors.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The catalog rejected a product
    #[error("Failed to build catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Wrapper for products in YAML.
///
/// The sequence order becomes the catalog's featured order.
#[derive(Debug, Deserialize)]
struct ProductsFixture {
    products: Vec<Product>,
}

/// Loads product-set fixture files into catalogs.
#[derive(Debug)]
pub struct CatalogFixture {
    /// Base path for fixture files
    base_path: PathBuf,
}

impl CatalogFixture {
    /// Create a loader with the default base path.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a loader with a custom base path.
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        CatalogFixture {
            base_path: base_path.into(),
        }
    }

    /// Load `<base>/products/<name>.yml` into a catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if two
    /// products share an id.
    pub fn load_products(&self, name: &str) -> Result<Catalog, FixtureError> {
        let file_path = self.base_path.join("products").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

        let mut catalog = Catalog::new();

        for product in fixture.products {
            catalog.insert(product)?;
        }

        Ok(catalog)
    }
}

impl Default for CatalogFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A small built-in catalog for demos and tests.
///
/// # Errors
///
/// Returns a [`CatalogError`] if the sample data is inconsistent.
pub fn sample_catalog() -> Result<Catalog, CatalogError> {
    Catalog::with_products(
        [
            Product {
                id: ProductId::from("headphones"),
                name: "Wireless Headphones".to_string(),
                description: "Over-ear headphones with noise cancellation".to_string(),
                price: Decimal::new(12_999, 2),
                image: "headphones.jpg".to_string(),
                category: "Electronics".to_string(),
                rating: 4.7,
                reviews: 231,
                discount: 15,
                stock: 12,
                colors: smallvec!["Black".to_string(), "Silver".to_string()],
                sizes: smallvec![],
            },
            Product {
                id: ProductId::from("tee"),
                name: "Logo Tee".to_string(),
                description: "Soft cotton tee with embroidered logo".to_string(),
                price: Decimal::new(2499, 2),
                image: "tee.jpg".to_string(),
                category: "Clothing".to_string(),
                rating: 4.3,
                reviews: 58,
                discount: 0,
                stock: 40,
                colors: smallvec!["Red".to_string(), "Blue".to_string(), "White".to_string()],
                sizes: smallvec!["S".to_string(), "M".to_string(), "L".to_string()],
            },
            Product {
                id: ProductId::from("watch"),
                name: "Field Watch".to_string(),
                description: "38mm stainless field watch".to_string(),
                price: Decimal::new(19_999, 2),
                image: "watch.jpg".to_string(),
                category: "Accessories".to_string(),
                rating: 4.8,
                reviews: 112,
                discount: 0,
                stock: 5,
                colors: smallvec![],
                sizes: smallvec![],
            },
            Product {
                id: ProductId::from("backpack"),
                name: "Commuter Backpack".to_string(),
                description: "Water-resistant 20L backpack".to_string(),
                price: Decimal::new(5999, 2),
                image: "backpack.jpg".to_string(),
                category: "Accessories".to_string(),
                rating: 4.5,
                reviews: 87,
                discount: 20,
                stock: 0,
                colors: smallvec!["Grey".to_string()],
                sizes: smallvec![],
            },
            Product {
                id: ProductId::from("bottle"),
                name: "Insulated Bottle".to_string(),
                description: "750ml vacuum-insulated bottle".to_string(),
                price: Decimal::new(1895, 2),
                image: "bottle.jpg".to_string(),
                category: "Outdoors".to_string(),
                rating: 4.1,
                reviews: 301,
                discount: 10,
                stock: 60,
                colors: smallvec!["Green".to_string(), "Black".to_string()],
                sizes: smallvec![],
            },
        ],
        rusty_money::iso::USD,
    )
}
