//! Admin

use crate::{
    auth::{AuthError, Session},
    catalog::{Catalog, CatalogError},
    products::{Product, ProductId},
};

/// Write access to the catalog, granted only to a signed-in user.
///
/// The editor borrows the catalog exclusively for the admin workflow; the
/// rest of the system keeps its read-only view of the same catalog.
#[derive(Debug)]
pub struct CatalogEditor<'a> {
    catalog: &'a mut Catalog,
}

impl<'a> CatalogEditor<'a> {
    /// Open the editor for a signed-in session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SignedOut`] when no user is signed in.
    pub fn new<S>(catalog: &'a mut Catalog, session: &Session<S>) -> Result<Self, AuthError> {
        if session.is_signed_in() {
            Ok(CatalogEditor { catalog })
        } else {
            Err(AuthError::SignedOut)
        }
    }

    /// Add a product to the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateId`] if the id is already taken.
    pub fn add_product(&mut self, product: Product) -> Result<(), CatalogError> {
        self.catalog.insert(product).map(|_key| ())
    }

    /// Replace a product's record, keyed by its id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the id is not in the catalog.
    pub fn update_product(&mut self, product: Product) -> Result<(), CatalogError> {
        self.catalog.update(product)
    }

    /// Remove a product, returning its record.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the id is not in the catalog.
    pub fn delete_product(&mut self, id: &ProductId) -> Result<Product, CatalogError> {
        self.catalog.remove(id)
    }
}
