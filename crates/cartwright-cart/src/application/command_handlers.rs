//! Command handlers for the cart context.
//!
//! Each handler orchestrates one mutation: resolve the product where
//! needed, load the current persisted cart, apply the domain method, and
//! save atomically. A failure at any step leaves the persisted cart
//! unchanged.

use uuid::Uuid;

use cartwright_core::catalog::ProductCatalog;
use cartwright_core::clock::Clock;
use cartwright_core::error::CartError;

use crate::domain::cart::Cart;
use crate::domain::commands::{AddToCart, RemoveFromCart};
use crate::domain::snapshot::{CartSnapshot, LineItemView};
use crate::repository::CartRepository;

/// Result of a successful add (either path).
#[derive(Debug)]
pub struct AddItemOutcome {
    /// The resulting line item, post-merge.
    pub line_item: LineItemView,
    /// The refreshed cart projection.
    pub cart: CartSnapshot,
}

/// Result of a successful removal.
#[derive(Debug)]
pub struct RemoveItemOutcome {
    /// The line item that was removed, for response confirmation.
    pub removed: LineItemView,
    /// The refreshed cart projection.
    pub cart: CartSnapshot,
}

/// Creates and persists a new empty cart.
///
/// # Errors
///
/// Returns `CartError::Storage` if persistence fails.
pub async fn handle_create_cart(
    clock: &dyn Clock,
    repo: &dyn CartRepository,
) -> Result<CartSnapshot, CartError> {
    let cart = Cart::new(Uuid::new_v4(), clock);
    repo.insert(&cart).await?;
    Ok(cart.snapshot())
}

/// Handles the merge add path: quantities accumulate on an existing line
/// item, with the unit price frozen from the first add.
///
/// # Errors
///
/// Returns `CartError::ProductNotFound` if the product cannot be resolved
/// (checked before the cart is touched), `CartError::CartNotFound`,
/// `CartError::Validation` for a non-positive quantity, or persistence
/// errors from the repository.
pub async fn handle_add_or_merge(
    command: &AddToCart,
    clock: &dyn Clock,
    catalog: &dyn ProductCatalog,
    repo: &dyn CartRepository,
) -> Result<AddItemOutcome, CartError> {
    let product = catalog.lookup_product(command.product_id).await?;
    let mut cart = repo
        .find(command.cart_id)
        .await?
        .ok_or(CartError::CartNotFound(command.cart_id))?;

    let line_item = LineItemView::from(cart.add_or_merge(&product, command.quantity, clock)?);

    repo.save(&cart).await?;

    Ok(AddItemOutcome {
        line_item,
        cart: cart.snapshot(),
    })
}

/// Handles the strict add path: fails with `ProductAlreadyInCart` instead
/// of merging quantities.
///
/// # Errors
///
/// As [`handle_add_or_merge`], plus `CartError::ProductAlreadyInCart` when
/// a line item for the product exists.
pub async fn handle_add_new(
    command: &AddToCart,
    clock: &dyn Clock,
    catalog: &dyn ProductCatalog,
    repo: &dyn CartRepository,
) -> Result<AddItemOutcome, CartError> {
    let product = catalog.lookup_product(command.product_id).await?;
    let mut cart = repo
        .find(command.cart_id)
        .await?
        .ok_or(CartError::CartNotFound(command.cart_id))?;

    let line_item =
        LineItemView::from(cart.add_new_or_conflict(&product, command.quantity, clock)?);

    repo.save(&cart).await?;

    Ok(AddItemOutcome {
        line_item,
        cart: cart.snapshot(),
    })
}

/// Handles a line item removal.
///
/// # Errors
///
/// Returns `CartError::CartNotFound`, `CartError::LineItemNotFound` if the
/// product is not in the cart, or persistence errors from the repository.
pub async fn handle_remove_item(
    command: &RemoveFromCart,
    clock: &dyn Clock,
    repo: &dyn CartRepository,
) -> Result<RemoveItemOutcome, CartError> {
    let mut cart = repo
        .find(command.cart_id)
        .await?
        .ok_or(CartError::CartNotFound(command.cart_id))?;

    let removed = cart.remove_item(command.product_id, clock)?;

    repo.save(&cart).await?;

    Ok(RemoveItemOutcome {
        removed: LineItemView::from(&removed),
        cart: cart.snapshot(),
    })
}
