//! Commands for the cart context.

use uuid::Uuid;

/// Command to add a product to a cart.
///
/// Handled by either the merge path ([`handle_add_or_merge`]) or the
/// strict path ([`handle_add_new`]); the two conflict semantics are kept
/// as separately named operations on purpose.
///
/// [`handle_add_or_merge`]: crate::application::command_handlers::handle_add_or_merge
/// [`handle_add_new`]: crate::application::command_handlers::handle_add_new
#[derive(Debug, Clone)]
pub struct AddToCart {
    /// The target cart.
    pub cart_id: Uuid,
    /// The product to add.
    pub product_id: Uuid,
    /// Units to add; must be positive.
    pub quantity: i64,
}

/// Command to remove a product's line item from a cart.
#[derive(Debug, Clone)]
pub struct RemoveFromCart {
    /// The target cart.
    pub cart_id: Uuid,
    /// The product whose line item should be removed.
    pub product_id: Uuid,
}
