//! PostgreSQL persistence for the Cartwright cart engine.

pub mod pg_cart_repository;
pub mod pg_product_catalog;
pub mod schema;

use cartwright_core::error::CartError;

pub(crate) fn storage(err: sqlx::Error) -> CartError {
    CartError::Storage(err.to_string())
}
