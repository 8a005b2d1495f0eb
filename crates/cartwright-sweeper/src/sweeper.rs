//! The abandonment sweeper: batched, idempotent lifecycle passes.

use std::sync::Arc;

use cartwright_cart::repository::CartRepository;
use cartwright_core::clock::Clock;
use cartwright_core::error::CartError;

use crate::config::SweeperConfig;

/// Counts from one `run_once` invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Carts transitioned to abandoned.
    pub abandoned: u64,
    /// Carts permanently removed.
    pub removed: u64,
}

/// Scans carts by lifecycle state and applies time-based transitions.
///
/// The selection predicates exclude carts that have already transitioned,
/// so re-running a pass (or overlapping ticks) is a no-op on those rows.
pub struct Sweeper {
    repo: Arc<dyn CartRepository>,
    clock: Arc<dyn Clock>,
    config: SweeperConfig,
}

impl Sweeper {
    /// Creates a sweeper over the given repository and clock.
    #[must_use]
    pub fn new(repo: Arc<dyn CartRepository>, clock: Arc<dyn Clock>, config: SweeperConfig) -> Self {
        Self {
            repo,
            clock,
            config,
        }
    }

    /// Marks every active cart idle beyond the abandon threshold as
    /// abandoned. Returns the number of carts transitioned.
    ///
    /// Idempotent: a second run with no intervening activity abandons zero
    /// additional carts. A failure on one cart is logged and does not
    /// abort the pass; the cart is re-selected on the next tick.
    pub async fn run_abandon_pass(&self) -> u64 {
        let cutoff = self.clock.now() - self.config.abandon_after;
        let mut count: u64 = 0;

        loop {
            let batch = match self
                .repo
                .find_ready_to_abandon(cutoff, self.config.batch_size)
                .await
            {
                Ok(batch) => batch,
                Err(err) => {
                    tracing::error!(error = %err, "abandon pass: selection failed");
                    break;
                }
            };
            if batch.is_empty() {
                break;
            }

            let mut transitioned: u64 = 0;
            for mut cart in batch {
                cart.mark_abandoned(self.clock.as_ref());
                match self.repo.save(&cart).await {
                    Ok(()) => {
                        tracing::info!(cart_id = %cart.id, "cart marked as abandoned");
                        transitioned += 1;
                    }
                    Err(CartError::ConcurrencyConflict { .. }) => {
                        // A user interaction committed after selection;
                        // that interaction wins.
                        tracing::info!(cart_id = %cart.id, "skipping cart: concurrent interaction");
                    }
                    Err(err) => {
                        tracing::warn!(
                            cart_id = %cart.id,
                            error = %err,
                            "failed to abandon cart; will retry next tick"
                        );
                    }
                }
            }

            count += transitioned;
            // Every cart in the batch failed to transition; stop rather
            // than re-selecting the same rows forever.
            if transitioned == 0 {
                break;
            }
        }

        count
    }

    /// Permanently removes every cart abandoned beyond the retention
    /// threshold, cascading to its line items. Returns the number of carts
    /// removed.
    pub async fn run_removal_pass(&self) -> u64 {
        let cutoff = self.clock.now() - self.config.remove_after;
        let mut count: u64 = 0;

        loop {
            let batch = match self
                .repo
                .find_ready_to_remove(cutoff, self.config.batch_size)
                .await
            {
                Ok(batch) => batch,
                Err(err) => {
                    tracing::error!(error = %err, "removal pass: selection failed");
                    break;
                }
            };
            if batch.is_empty() {
                break;
            }

            let mut transitioned: u64 = 0;
            for cart in batch {
                match self.repo.delete(cart.id).await {
                    Ok(true) => {
                        tracing::info!(cart_id = %cart.id, "removed abandoned cart");
                        transitioned += 1;
                    }
                    // Already gone: an overlapping run got there first.
                    Ok(false) => {}
                    Err(err) => {
                        tracing::warn!(
                            cart_id = %cart.id,
                            error = %err,
                            "failed to remove cart; will retry next tick"
                        );
                    }
                }
            }

            count += transitioned;
            if transitioned == 0 {
                break;
            }
        }

        count
    }

    /// One sweep tick: abandon pass, then removal pass.
    ///
    /// A cart abandoned by this tick cannot be removed in the same tick:
    /// its `abandoned_at` was set just now, far inside the retention
    /// window.
    pub async fn run_once(&self) -> SweepReport {
        let abandoned = self.run_abandon_pass().await;
        let removed = self.run_removal_pass().await;
        tracing::info!(abandoned, removed, "sweep tick complete");
        SweepReport { abandoned, removed }
    }

    /// Drives `run_once` on the configured tick interval. Intended to be
    /// spawned as a background task by the binary.
    pub async fn run_on_interval(&self) {
        let mut interval = tokio::time::interval(self.config.tick_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            self.run_once().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use cartwright_cart::domain::cart::Cart;
    use cartwright_cart::repository::CartRepository;
    use cartwright_core::catalog::ProductRef;
    use cartwright_core::error::CartError;
    use cartwright_core::money::Money;
    use cartwright_test_support::{FixedClock, InMemoryCartRepository};

    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    fn sweeper_at(repo: Arc<dyn CartRepository>, now: DateTime<Utc>) -> Sweeper {
        Sweeper::new(repo, Arc::new(FixedClock(now)), SweeperConfig::default())
    }

    /// Inserts a cart whose last interaction was `idle_for` ago.
    async fn seed_idle_cart(repo: &InMemoryCartRepository, idle_for: Duration) -> Uuid {
        let cart = Cart::new(Uuid::new_v4(), &FixedClock(fixed_now() - idle_for));
        repo.insert(&cart).await.unwrap();
        cart.id
    }

    /// Inserts a cart abandoned `abandoned_for` ago.
    async fn seed_abandoned_cart(repo: &InMemoryCartRepository, abandoned_for: Duration) -> Uuid {
        let at = fixed_now() - abandoned_for;
        let mut cart = Cart::new(Uuid::new_v4(), &FixedClock(at));
        cart.mark_abandoned(&FixedClock(at));
        repo.insert(&cart).await.unwrap();
        cart.id
    }

    #[tokio::test]
    async fn test_abandon_pass_marks_idle_carts_and_is_idempotent() {
        // Arrange: 4 h idle with a 3 h threshold.
        let repo = Arc::new(InMemoryCartRepository::new());
        let idle = seed_idle_cart(&repo, Duration::hours(4)).await;
        let fresh = seed_idle_cart(&repo, Duration::minutes(5)).await;
        let sweeper = sweeper_at(repo.clone(), fixed_now());

        // Act
        let first = sweeper.run_abandon_pass().await;
        let second = sweeper.run_abandon_pass().await;

        // Assert
        assert_eq!(first, 1);
        assert_eq!(second, 0);
        let idle = repo.find(idle).await.unwrap().unwrap();
        assert!(idle.is_abandoned());
        assert_eq!(idle.abandoned_at(), Some(fixed_now()));
        assert!(!repo.find(fresh).await.unwrap().unwrap().is_abandoned());
    }

    #[tokio::test]
    async fn test_abandoned_cart_reactivates_on_new_interaction() {
        // Arrange
        let repo = Arc::new(InMemoryCartRepository::new());
        let cart_id = seed_idle_cart(&repo, Duration::hours(4)).await;
        let sweeper = sweeper_at(repo.clone(), fixed_now());
        assert_eq!(sweeper.run_abandon_pass().await, 1);

        // Act: the user comes back and adds a product.
        let mut cart = repo.find(cart_id).await.unwrap().unwrap();
        let product = ProductRef {
            id: Uuid::new_v4(),
            name: "Gadget".to_owned(),
            price: Money::new("3.00".parse::<Decimal>().unwrap()),
        };
        cart.add_or_merge(&product, 1, &FixedClock(fixed_now()))
            .unwrap();
        repo.save(&cart).await.unwrap();

        // Assert
        let cart = repo.find(cart_id).await.unwrap().unwrap();
        assert!(!cart.is_abandoned());
        assert!(cart.abandoned_at().is_none());
        assert_eq!(sweeper.run_abandon_pass().await, 0);
    }

    #[tokio::test]
    async fn test_removal_pass_deletes_only_old_abandoned_carts() {
        // Arrange: 8 d vs 3 d abandoned with a 7 d retention window.
        let repo = Arc::new(InMemoryCartRepository::new());
        let old = seed_abandoned_cart(&repo, Duration::days(8)).await;
        let recent = seed_abandoned_cart(&repo, Duration::days(3)).await;
        let sweeper = sweeper_at(repo.clone(), fixed_now());

        // Act
        let removed = sweeper.run_removal_pass().await;

        // Assert
        assert_eq!(removed, 1);
        assert_eq!(repo.len(), 1);
        assert!(repo.find(old).await.unwrap().is_none());
        assert!(repo.find(recent).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_run_once_never_abandons_and_removes_in_same_tick() {
        // Arrange: idle far beyond both thresholds, but still active.
        let repo = Arc::new(InMemoryCartRepository::new());
        let cart_id = seed_idle_cart(&repo, Duration::days(30)).await;
        let sweeper = sweeper_at(repo.clone(), fixed_now());

        // Act
        let report = sweeper.run_once().await;

        // Assert: abandoned now, removal only once the retention window
        // has elapsed since abandonment.
        assert_eq!(
            report,
            SweepReport {
                abandoned: 1,
                removed: 0
            }
        );
        assert!(repo.find(cart_id).await.unwrap().is_some());

        let later = sweeper_at(repo.clone(), fixed_now() + Duration::days(8));
        let report = later.run_once().await;
        assert_eq!(
            report,
            SweepReport {
                abandoned: 0,
                removed: 1
            }
        );
        assert!(repo.find(cart_id).await.unwrap().is_none());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_pass_loops_over_batches() {
        // Arrange
        let repo = Arc::new(InMemoryCartRepository::new());
        for _ in 0..3 {
            seed_idle_cart(&repo, Duration::hours(5)).await;
        }
        let config = SweeperConfig {
            batch_size: 1,
            ..SweeperConfig::default()
        };
        let sweeper = Sweeper::new(repo.clone(), Arc::new(FixedClock(fixed_now())), config);

        // Act
        let abandoned = sweeper.run_abandon_pass().await;

        // Assert
        assert_eq!(abandoned, 3);
    }

    /// Delegates to an inner repository but fails every save for one cart.
    struct PoisonedSave {
        inner: Arc<InMemoryCartRepository>,
        poison: Uuid,
        error: fn(Uuid) -> CartError,
    }

    #[async_trait]
    impl CartRepository for PoisonedSave {
        async fn insert(&self, cart: &Cart) -> Result<(), CartError> {
            self.inner.insert(cart).await
        }

        async fn find(&self, cart_id: Uuid) -> Result<Option<Cart>, CartError> {
            self.inner.find(cart_id).await
        }

        async fn save(&self, cart: &Cart) -> Result<(), CartError> {
            if cart.id == self.poison {
                return Err((self.error)(cart.id));
            }
            self.inner.save(cart).await
        }

        async fn delete(&self, cart_id: Uuid) -> Result<bool, CartError> {
            self.inner.delete(cart_id).await
        }

        async fn find_ready_to_abandon(
            &self,
            cutoff: DateTime<Utc>,
            limit: i64,
        ) -> Result<Vec<Cart>, CartError> {
            self.inner.find_ready_to_abandon(cutoff, limit).await
        }

        async fn find_ready_to_remove(
            &self,
            cutoff: DateTime<Utc>,
            limit: i64,
        ) -> Result<Vec<Cart>, CartError> {
            self.inner.find_ready_to_remove(cutoff, limit).await
        }
    }

    #[tokio::test]
    async fn test_abandon_pass_continues_past_failing_cart() {
        // Arrange
        let inner = Arc::new(InMemoryCartRepository::new());
        let poisoned = seed_idle_cart(&inner, Duration::hours(4)).await;
        let healthy = seed_idle_cart(&inner, Duration::hours(4)).await;
        let repo = Arc::new(PoisonedSave {
            inner: inner.clone(),
            poison: poisoned,
            error: |_| CartError::Storage("disk full".into()),
        });
        let sweeper = sweeper_at(repo, fixed_now());

        // Act
        let abandoned = sweeper.run_abandon_pass().await;

        // Assert: the healthy cart transitioned, the failed one stays
        // active for the next tick.
        assert_eq!(abandoned, 1);
        assert!(inner.find(healthy).await.unwrap().unwrap().is_abandoned());
        assert!(!inner.find(poisoned).await.unwrap().unwrap().is_abandoned());
    }

    #[tokio::test]
    async fn test_abandon_pass_skips_version_conflicts_quietly() {
        // Arrange: a concurrent user interaction shows up as a version
        // conflict on save.
        let inner = Arc::new(InMemoryCartRepository::new());
        let contested = seed_idle_cart(&inner, Duration::hours(4)).await;
        let repo = Arc::new(PoisonedSave {
            inner: inner.clone(),
            poison: contested,
            error: |cart_id| CartError::ConcurrencyConflict {
                cart_id,
                expected: 0,
                actual: 1,
            },
        });
        let sweeper = sweeper_at(repo, fixed_now());

        // Act
        let abandoned = sweeper.run_abandon_pass().await;

        // Assert
        assert_eq!(abandoned, 0);
        assert!(!inner.find(contested).await.unwrap().unwrap().is_abandoned());
    }
}
