//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type for cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// No cart exists for the given identifier.
    #[error("cart not found: {0}")]
    CartNotFound(Uuid),

    /// The product catalog has no product for the given identifier.
    #[error("product not found: {0}")]
    ProductNotFound(Uuid),

    /// The cart has no line item for the given product.
    #[error("product {product_id} is not in cart {cart_id}")]
    LineItemNotFound {
        /// The cart that was searched.
        cart_id: Uuid,
        /// The product that was not found.
        product_id: Uuid,
    },

    /// The strict add path found an existing line item for the product.
    #[error("product {product_id} is already in cart {cart_id}")]
    ProductAlreadyInCart {
        /// The cart holding the conflicting line item.
        cart_id: Uuid,
        /// The product already present.
        product_id: Uuid,
    },

    /// A validation error in domain logic (non-positive quantity, negative
    /// total). Rejected before any state mutation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Optimistic concurrency conflict: the cart changed between load and
    /// save.
    #[error("concurrency conflict on cart {cart_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The cart that had the conflict.
        cart_id: Uuid,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// An infrastructure/persistence error.
    #[error("storage error: {0}")]
    Storage(String),
}
