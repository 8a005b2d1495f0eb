//! Test catalog — in-memory `ProductCatalog` implementation.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use cartwright_core::catalog::{ProductCatalog, ProductRef};
use cartwright_core::error::CartError;
use cartwright_core::money::Money;

/// A product catalog backed by a map. Prices can be changed mid-test to
/// exercise the frozen-unit-price guarantee.
#[derive(Debug, Default)]
pub struct InMemoryProductCatalog {
    products: Mutex<HashMap<Uuid, ProductRef>>,
}

impl InMemoryProductCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a product.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn upsert(&self, product: ProductRef) {
        self.products.lock().unwrap().insert(product.id, product);
    }

    /// Changes the price of an existing product; no-op if absent.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn set_price(&self, product_id: Uuid, price: Money) {
        if let Some(product) = self.products.lock().unwrap().get_mut(&product_id) {
            product.price = price;
        }
    }
}

#[async_trait]
impl ProductCatalog for InMemoryProductCatalog {
    async fn lookup_product(&self, product_id: Uuid) -> Result<ProductRef, CartError> {
        self.products
            .lock()
            .unwrap()
            .get(&product_id)
            .cloned()
            .ok_or(CartError::ProductNotFound(product_id))
    }
}
