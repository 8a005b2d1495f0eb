//! `PostgreSQL` implementation of the `ProductCatalog` trait.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use cartwright_core::catalog::{ProductCatalog, ProductRef};
use cartwright_core::error::CartError;
use cartwright_core::money::Money;

use crate::storage;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    price: Decimal,
}

/// PostgreSQL-backed product catalog.
#[derive(Debug, Clone)]
pub struct PgProductCatalog {
    pool: PgPool,
}

impl PgProductCatalog {
    /// Creates a new `PgProductCatalog`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductCatalog for PgProductCatalog {
    async fn lookup_product(&self, product_id: Uuid) -> Result<ProductRef, CartError> {
        let row =
            sqlx::query_as::<_, ProductRow>("SELECT id, name, price FROM products WHERE id = $1")
                .bind(product_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(storage)?;

        row.map(|row| ProductRef {
            id: row.id,
            name: row.name,
            price: Money::new(row.price),
        })
        .ok_or(CartError::ProductNotFound(product_id))
    }
}
