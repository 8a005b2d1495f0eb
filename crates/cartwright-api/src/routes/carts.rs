//! Routes for the cart context.
//!
//! Carts are addressed by explicit id; creation is an explicit operation,
//! not a side effect of any other request. The strict and merge add paths
//! are separate endpoints with different conflict semantics.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use cartwright_cart::application::command_handlers::{
    handle_add_new, handle_add_or_merge, handle_create_cart, handle_remove_item,
};
use cartwright_cart::application::query_handlers::get_cart_snapshot;
use cartwright_cart::domain::commands::{AddToCart, RemoveFromCart};
use cartwright_cart::domain::snapshot::CartSnapshot;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for both add endpoints.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// The product to add.
    pub product_id: Uuid,
    /// Units to add; must be positive.
    pub quantity: i64,
}

/// POST /
async fn create_cart(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CartSnapshot>), ApiError> {
    let snapshot = handle_create_cart(state.clock.as_ref(), state.repo.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(snapshot)))
}

/// GET /{cart_id}
async fn show_cart(
    State(state): State<AppState>,
    Path(cart_id): Path<Uuid>,
) -> Result<Json<CartSnapshot>, ApiError> {
    let snapshot = get_cart_snapshot(cart_id, state.repo.as_ref()).await?;
    Ok(Json(snapshot))
}

/// POST /{cart_id}/items — strict add; 409 if the product is already in
/// the cart.
async fn add_item_strict(
    State(state): State<AppState>,
    Path(cart_id): Path<Uuid>,
    Json(request): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CartSnapshot>), ApiError> {
    let command = AddToCart {
        cart_id,
        product_id: request.product_id,
        quantity: request.quantity,
    };
    let outcome = handle_add_new(
        &command,
        state.clock.as_ref(),
        state.catalog.as_ref(),
        state.repo.as_ref(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(outcome.cart)))
}

/// POST /{cart_id}/add_item — merge add; quantities accumulate.
async fn add_item_merge(
    State(state): State<AppState>,
    Path(cart_id): Path<Uuid>,
    Json(request): Json<AddItemRequest>,
) -> Result<Json<CartSnapshot>, ApiError> {
    let command = AddToCart {
        cart_id,
        product_id: request.product_id,
        quantity: request.quantity,
    };
    let outcome = handle_add_or_merge(
        &command,
        state.clock.as_ref(),
        state.catalog.as_ref(),
        state.repo.as_ref(),
    )
    .await?;
    Ok(Json(outcome.cart))
}

/// DELETE /{cart_id}/items/{product_id}
async fn remove_item(
    State(state): State<AppState>,
    Path((cart_id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<CartSnapshot>, ApiError> {
    let command = RemoveFromCart {
        cart_id,
        product_id,
    };
    let outcome = handle_remove_item(&command, state.clock.as_ref(), state.repo.as_ref()).await?;
    Ok(Json(outcome.cart))
}

/// Returns the router for the cart context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_cart))
        .route("/{cart_id}", get(show_cart))
        .route("/{cart_id}/items", post(add_item_strict))
        .route("/{cart_id}/add_item", post(add_item_merge))
        .route("/{cart_id}/items/{product_id}", delete(remove_item))
}
