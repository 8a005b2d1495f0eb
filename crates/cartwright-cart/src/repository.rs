//! Cart repository abstraction.
//!
//! Implementations must persist a cart and its line items as one atomic
//! unit per cart, with optimistic versioning so concurrent writers to the
//! same cart cannot lose updates. Writes to different carts are
//! independent.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use cartwright_core::error::CartError;

use crate::domain::cart::Cart;

/// Repository trait for loading and storing cart aggregates.
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Persists a newly created cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` on persistence failure.
    async fn insert(&self, cart: &Cart) -> Result<(), CartError>;

    /// Loads a cart with its line items.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` on persistence failure.
    async fn find(&self, cart_id: Uuid) -> Result<Option<Cart>, CartError>;

    /// Saves a mutated cart and its line items in one transaction,
    /// verifying the version loaded by the caller is still current.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ConcurrencyConflict` if the cart changed since
    /// it was loaded, `CartError::CartNotFound` if it no longer exists, or
    /// `CartError::Storage` on persistence failure.
    async fn save(&self, cart: &Cart) -> Result<(), CartError>;

    /// Deletes a cart and its line items. Returns false if no such cart
    /// existed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` on persistence failure.
    async fn delete(&self, cart_id: Uuid) -> Result<bool, CartError>;

    /// Returns up to `limit` active carts whose last interaction is at or
    /// before `cutoff`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` on persistence failure.
    async fn find_ready_to_abandon(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Cart>, CartError>;

    /// Returns up to `limit` abandoned carts whose abandonment is at or
    /// before `cutoff`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Storage` on persistence failure.
    async fn find_ready_to_remove(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Cart>, CartError>;
}
