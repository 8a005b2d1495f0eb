//! The cart aggregate root and its line items.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use cartwright_core::catalog::ProductRef;
use cartwright_core::clock::Clock;
use cartwright_core::error::CartError;
use cartwright_core::money::Money;

/// A product entry in a cart.
///
/// The name and unit price are frozen at first add: later catalog changes
/// never retro-apply to items already in a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineItem {
    /// The referenced product.
    pub product_id: Uuid,
    /// Product name captured at first add.
    pub name: String,
    /// Number of units; always at least 1 while the item exists.
    pub quantity: i64,
    /// Unit price captured at first add.
    pub unit_price: Money,
}

impl LineItem {
    /// Returns `unit_price × quantity` for this item.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// The aggregate root for a shopping cart.
///
/// Owns its line items exclusively; the cached total is recomputed inside
/// every mutation so it always equals the sum of the line totals.
#[derive(Debug, Clone)]
pub struct Cart {
    /// Aggregate identifier.
    pub id: Uuid,
    version: i64,
    line_items: Vec<LineItem>,
    total_price: Money,
    last_interaction_at: DateTime<Utc>,
    abandoned_at: Option<DateTime<Utc>>,
}

impl Cart {
    /// Creates a new empty cart with `last_interaction_at = now`.
    #[must_use]
    pub fn new(id: Uuid, clock: &dyn Clock) -> Self {
        Self {
            id,
            version: 0,
            line_items: Vec::new(),
            total_price: Money::ZERO,
            last_interaction_at: clock.now(),
            abandoned_at: None,
        }
    }

    /// Reconstructs a cart from persisted state. Used by repositories.
    #[must_use]
    pub fn rehydrate(
        id: Uuid,
        version: i64,
        line_items: Vec<LineItem>,
        total_price: Money,
        last_interaction_at: DateTime<Utc>,
        abandoned_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            version,
            line_items,
            total_price,
            last_interaction_at,
            abandoned_at,
        }
    }

    /// Returns the persistence version used for optimistic concurrency.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Returns the cached total price.
    #[must_use]
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Returns the timestamp of the most recent add/remove.
    #[must_use]
    pub fn last_interaction_at(&self) -> DateTime<Utc> {
        self.last_interaction_at
    }

    /// Returns when the cart was marked abandoned, if it is.
    #[must_use]
    pub fn abandoned_at(&self) -> Option<DateTime<Utc>> {
        self.abandoned_at
    }

    /// Returns true if the cart is currently abandoned.
    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        self.abandoned_at.is_some()
    }

    /// Returns the line items in insertion order.
    #[must_use]
    pub fn line_items(&self) -> &[LineItem] {
        &self.line_items
    }

    /// Returns the line item for a product, if present.
    #[must_use]
    pub fn line_item(&self, product_id: Uuid) -> Option<&LineItem> {
        self.line_items
            .iter()
            .find(|item| item.product_id == product_id)
    }

    /// Adds a product to the cart, merging quantities if it is already
    /// present. The unit price is never refreshed on merge.
    ///
    /// Recomputes the total, records the interaction, and reactivates an
    /// abandoned cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Validation` if `quantity` is not positive, the
    /// product price is negative, or merging would overflow the stored
    /// quantity; the cart is unchanged in that case.
    pub fn add_or_merge(
        &mut self,
        product: &ProductRef,
        quantity: i64,
        clock: &dyn Clock,
    ) -> Result<&LineItem, CartError> {
        validate_quantity(quantity)?;
        if product.price.is_negative() {
            return Err(CartError::Validation(format!(
                "product {} has a negative price",
                product.id
            )));
        }

        let index = match self.position_of(product.id) {
            Some(index) => {
                let item = &mut self.line_items[index];
                item.quantity = item.quantity.checked_add(quantity).ok_or_else(|| {
                    CartError::Validation(format!(
                        "quantity for product {} exceeds the supported range",
                        product.id
                    ))
                })?;
                index
            }
            None => {
                self.line_items.push(LineItem {
                    product_id: product.id,
                    name: product.name.clone(),
                    quantity,
                    unit_price: product.price,
                });
                self.line_items.len() - 1
            }
        };

        self.recompute_total()?;
        self.touch(clock);
        Ok(&self.line_items[index])
    }

    /// Adds a product to the cart, failing if it is already present.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductAlreadyInCart` if a line item for the
    /// product exists (cart unchanged), or `CartError::Validation` as for
    /// [`Cart::add_or_merge`].
    pub fn add_new_or_conflict(
        &mut self,
        product: &ProductRef,
        quantity: i64,
        clock: &dyn Clock,
    ) -> Result<&LineItem, CartError> {
        if self.position_of(product.id).is_some() {
            return Err(CartError::ProductAlreadyInCart {
                cart_id: self.id,
                product_id: product.id,
            });
        }
        self.add_or_merge(product, quantity, clock)
    }

    /// Removes the line item for a product and returns it.
    ///
    /// Removal counts as an interaction: the total is recomputed and an
    /// abandoned cart is reactivated.
    ///
    /// # Errors
    ///
    /// Returns `CartError::LineItemNotFound` if the product is not in the
    /// cart; the cart is unchanged in that case.
    pub fn remove_item(
        &mut self,
        product_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<LineItem, CartError> {
        let Some(index) = self.position_of(product_id) else {
            return Err(CartError::LineItemNotFound {
                cart_id: self.id,
                product_id,
            });
        };

        let removed = self.line_items.remove(index);
        self.recompute_total()?;
        self.touch(clock);
        Ok(removed)
    }

    /// Marks the cart abandoned. Idempotent: a cart that is already
    /// abandoned keeps its original `abandoned_at`.
    pub fn mark_abandoned(&mut self, clock: &dyn Clock) {
        if self.abandoned_at.is_none() {
            self.abandoned_at = Some(clock.now());
        }
    }

    /// Returns true if the cart is active and idle since `cutoff` or
    /// earlier.
    #[must_use]
    pub fn ready_to_abandon(&self, cutoff: DateTime<Utc>) -> bool {
        !self.is_abandoned() && self.last_interaction_at <= cutoff
    }

    /// Returns true if the cart has been abandoned since `cutoff` or
    /// earlier.
    #[must_use]
    pub fn ready_to_remove(&self, cutoff: DateTime<Utc>) -> bool {
        self.abandoned_at.is_some_and(|at| at <= cutoff)
    }

    fn position_of(&self, product_id: Uuid) -> Option<usize> {
        self.line_items
            .iter()
            .position(|item| item.product_id == product_id)
    }

    fn recompute_total(&mut self) -> Result<(), CartError> {
        let total: Money = self.line_items.iter().map(LineItem::line_total).sum();
        if total.is_negative() {
            return Err(CartError::Validation(format!(
                "total price of cart {} would be negative",
                self.id
            )));
        }
        self.total_price = total;
        Ok(())
    }

    /// Records an interaction: refreshes the timestamp and clears the
    /// abandonment flags, reactivating the cart if the sweeper had marked
    /// it.
    fn touch(&mut self, clock: &dyn Clock) {
        self.last_interaction_at = clock.now();
        self.abandoned_at = None;
    }
}

fn validate_quantity(quantity: i64) -> Result<(), CartError> {
    if quantity < 1 {
        return Err(CartError::Validation(format!(
            "quantity must be a positive integer, got {quantity}"
        )));
    }
    Ok(())
}
