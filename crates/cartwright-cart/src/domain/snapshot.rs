//! Read-only cart projection consumed by the response layer.

use serde::Serialize;
use uuid::Uuid;

use cartwright_core::money::Money;

use super::cart::{Cart, LineItem};

/// One product line in a [`CartSnapshot`].
#[derive(Debug, Clone, Serialize)]
pub struct LineItemView {
    /// The product identifier.
    pub id: Uuid,
    /// Product name frozen at first add.
    pub name: String,
    /// Units in the cart.
    pub quantity: i64,
    /// Unit price frozen at first add.
    pub unit_price: Money,
    /// `unit_price × quantity`, derived at read time.
    pub total_price: Money,
}

impl From<&LineItem> for LineItemView {
    fn from(item: &LineItem) -> Self {
        Self {
            id: item.product_id,
            name: item.name.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            total_price: item.line_total(),
        }
    }
}

/// Read-only projection of a cart.
#[derive(Debug, Clone, Serialize)]
pub struct CartSnapshot {
    /// The cart identifier.
    pub id: Uuid,
    /// Line items in insertion order.
    pub products: Vec<LineItemView>,
    /// Sum of the per-line totals.
    pub total_price: Money,
}

impl Cart {
    /// Produces a read-only projection with no side effects.
    ///
    /// Line totals and the cart total are re-derived from quantities and
    /// frozen unit prices rather than echoing the cached column, so a
    /// drifted store shows up in reads.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        let products: Vec<LineItemView> = self.line_items().iter().map(LineItemView::from).collect();
        let total_price = products.iter().map(|line| line.total_price).sum();
        CartSnapshot {
            id: self.id,
            products,
            total_price,
        }
    }
}
