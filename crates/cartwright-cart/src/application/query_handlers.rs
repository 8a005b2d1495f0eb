//! Query handlers for the cart context.

use uuid::Uuid;

use cartwright_core::error::CartError;

use crate::domain::snapshot::CartSnapshot;
use crate::repository::CartRepository;

/// Retrieves a read-only snapshot of a cart. No side effects: reads do not
/// count as interactions and never touch the abandonment flags.
///
/// # Errors
///
/// Returns `CartError::CartNotFound` if no such cart exists, or
/// `CartError::Storage` on persistence failure.
pub async fn get_cart_snapshot(
    cart_id: Uuid,
    repo: &dyn CartRepository,
) -> Result<CartSnapshot, CartError> {
    let cart = repo
        .find(cart_id)
        .await?
        .ok_or(CartError::CartNotFound(cart_id))?;
    Ok(cart.snapshot())
}
