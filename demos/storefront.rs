//! Storefront demo: browse a catalog, fill a cart, and check out.
//!
//! The cart record persists between runs (delete it, or let checkout clear
//! it, to start fresh).

use std::{env, io, path::PathBuf};

use anyhow::anyhow;
use clap::Parser;

use shopfront::{
    cart::{Cart, VariantSelection},
    catalog::{ProductFilter, ProductSort},
    checkout::{self, CheckoutDetails},
    fixtures::{self, CatalogFixture},
    pricing,
    receipt::OrderSummary,
    storage::JsonFileStore,
};

/// Arguments for the storefront demo
#[derive(Debug, Parser)]
struct StorefrontArgs {
    /// Product-set fixture to load; defaults to the built-in sample set
    #[clap(short, long)]
    fixture: Option<String>,

    /// Directory holding fixture files
    #[clap(long, default_value = "./fixtures")]
    fixtures_dir: PathBuf,

    /// Path for the persisted cart record
    #[clap(long)]
    cart_path: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = StorefrontArgs::parse();

    let catalog = match &args.fixture {
        Some(name) => CatalogFixture::with_base_path(&args.fixtures_dir).load_products(name)?,
        None => fixtures::sample_catalog()?,
    };

    let cart_path = args
        .cart_path
        .unwrap_or_else(|| env::temp_dir().join("shopfront-demo").join("cart.json"));

    let mut cart = Cart::open(JsonFileStore::new(&cart_path));

    if !cart.is_empty() {
        println!(
            "Restored {} line(s) from {}; starting over.\n",
            cart.len(),
            cart_path.display()
        );
        cart.clear();
    }

    println!("Today's deals:");

    for (discount, products) in catalog.deals() {
        let names: Vec<&str> = products.iter().map(|product| product.name.as_str()).collect();
        println!("  {discount}% off: {}", names.join(", "));
    }

    println!();

    // Shop the in-stock items in featured order.
    let filter = ProductFilter {
        in_stock_only: true,
        ..ProductFilter::default()
    };

    let picks = catalog.search(&filter, ProductSort::Featured);

    let first = picks
        .first()
        .ok_or_else(|| anyhow!("catalog has no products in stock"))?;

    cart.add_item(first, 1, None);

    if let Some(second) = picks.get(1) {
        let mut variant = VariantSelection::new();

        if let Some(color) = second.colors.first() {
            variant = variant.with("color", color);
        }

        if let Some(size) = second.sizes.first() {
            variant = variant.with("size", size);
        }

        let variant = (!variant.is_empty()).then_some(variant);

        cart.add_item(second, 2, variant.clone());
        // Same product and variant again: merges into the existing line.
        cart.add_item(second, 1, variant);
    }

    let totals = pricing::quote(cart.items());
    let summary = OrderSummary::new(cart.items(), totals, catalog.currency());

    summary.write_to(io::stdout().lock())?;

    let order = checkout::place_order(
        &mut cart,
        CheckoutDetails {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "user@example.com".to_string(),
            address: "42 Market Street".to_string(),
            city: "Springfield".to_string(),
            postal_code: "12345".to_string(),
            country: "US".to_string(),
        },
    )?;

    println!(
        "{} placed via {} ({}), thank you!",
        order.number, order.payment_method, order.shipping_method
    );

    Ok(())
}
