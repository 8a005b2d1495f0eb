//! Product catalog abstraction.
//!
//! The catalog is an external collaborator: the cart only needs to resolve
//! a product id to its name and current price at add time.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CartError;
use crate::money::Money;

/// A product as resolved from the catalog at lookup time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRef {
    /// The product identifier.
    pub id: Uuid,
    /// The product's display name.
    pub name: String,
    /// The product's current price.
    pub price: Money,
}

/// Read-only access to the product catalog.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Resolves a product by id.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if no such product exists, or
    /// `CartError::Storage` if the catalog cannot be reached.
    async fn lookup_product(&self, product_id: Uuid) -> Result<ProductRef, CartError>;
}
