//! Test repositories — mock `CartRepository` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use cartwright_cart::domain::cart::Cart;
use cartwright_cart::repository::CartRepository;
use cartwright_core::error::CartError;

/// A map-backed cart repository with the same contract as the Postgres
/// store: versioned saves, cascade deletes, and batched sweep queries
/// ordered oldest first.
#[derive(Debug, Default)]
pub struct InMemoryCartRepository {
    carts: Mutex<HashMap<Uuid, Cart>>,
}

impl InMemoryCartRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored carts.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.carts.lock().unwrap().len()
    }

    /// Returns true if no carts are stored.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.carts.lock().unwrap().is_empty()
    }

    fn bumped(cart: &Cart) -> Cart {
        Cart::rehydrate(
            cart.id,
            cart.version() + 1,
            cart.line_items().to_vec(),
            cart.total_price(),
            cart.last_interaction_at(),
            cart.abandoned_at(),
        )
    }
}

#[async_trait]
impl CartRepository for InMemoryCartRepository {
    async fn insert(&self, cart: &Cart) -> Result<(), CartError> {
        self.carts.lock().unwrap().insert(cart.id, cart.clone());
        Ok(())
    }

    async fn find(&self, cart_id: Uuid) -> Result<Option<Cart>, CartError> {
        Ok(self.carts.lock().unwrap().get(&cart_id).cloned())
    }

    async fn save(&self, cart: &Cart) -> Result<(), CartError> {
        let mut carts = self.carts.lock().unwrap();
        let current = carts
            .get(&cart.id)
            .ok_or(CartError::CartNotFound(cart.id))?;
        if current.version() != cart.version() {
            return Err(CartError::ConcurrencyConflict {
                cart_id: cart.id,
                expected: cart.version(),
                actual: current.version(),
            });
        }
        carts.insert(cart.id, Self::bumped(cart));
        Ok(())
    }

    async fn delete(&self, cart_id: Uuid) -> Result<bool, CartError> {
        Ok(self.carts.lock().unwrap().remove(&cart_id).is_some())
    }

    async fn find_ready_to_abandon(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Cart>, CartError> {
        let carts = self.carts.lock().unwrap();
        let mut matching: Vec<Cart> = carts
            .values()
            .filter(|cart| cart.ready_to_abandon(cutoff))
            .cloned()
            .collect();
        matching.sort_by_key(Cart::last_interaction_at);
        matching.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(matching)
    }

    async fn find_ready_to_remove(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Cart>, CartError> {
        let carts = self.carts.lock().unwrap();
        let mut matching: Vec<Cart> = carts
            .values()
            .filter(|cart| cart.ready_to_remove(cutoff))
            .cloned()
            .collect();
        matching.sort_by_key(Cart::abandoned_at);
        matching.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(matching)
    }
}

/// A cart repository that always returns a storage error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingCartRepository;

#[async_trait]
impl CartRepository for FailingCartRepository {
    async fn insert(&self, _cart: &Cart) -> Result<(), CartError> {
        Err(CartError::Storage("connection refused".into()))
    }

    async fn find(&self, _cart_id: Uuid) -> Result<Option<Cart>, CartError> {
        Err(CartError::Storage("connection refused".into()))
    }

    async fn save(&self, _cart: &Cart) -> Result<(), CartError> {
        Err(CartError::Storage("connection refused".into()))
    }

    async fn delete(&self, _cart_id: Uuid) -> Result<bool, CartError> {
        Err(CartError::Storage("connection refused".into()))
    }

    async fn find_ready_to_abandon(
        &self,
        _cutoff: DateTime<Utc>,
        _limit: i64,
    ) -> Result<Vec<Cart>, CartError> {
        Err(CartError::Storage("connection refused".into()))
    }

    async fn find_ready_to_remove(
        &self,
        _cutoff: DateTime<Utc>,
        _limit: i64,
    ) -> Result<Vec<Cart>, CartError> {
        Err(CartError::Storage("connection refused".into()))
    }
}
