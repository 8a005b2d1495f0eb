//! `PostgreSQL` implementation of the `CartRepository` trait.
//!
//! Every write is one transaction scoped to a single cart: the cart row is
//! locked `FOR UPDATE`, the version loaded by the caller is verified, and
//! the line items are rewritten together with the cart row. Writes to
//! different carts proceed in parallel.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use cartwright_cart::domain::cart::{Cart, LineItem};
use cartwright_cart::repository::CartRepository;
use cartwright_core::error::CartError;
use cartwright_core::money::Money;

use crate::storage;

const SELECT_CART: &str =
    "SELECT id, total_price, last_interaction_at, abandoned_at, version FROM carts";

#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: Uuid,
    total_price: Decimal,
    last_interaction_at: DateTime<Utc>,
    abandoned_at: Option<DateTime<Utc>>,
    version: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
    product_id: Uuid,
    name: String,
    quantity: i64,
    unit_price: Decimal,
}

impl From<LineItemRow> for LineItem {
    fn from(row: LineItemRow) -> Self {
        Self {
            product_id: row.product_id,
            name: row.name,
            quantity: row.quantity,
            unit_price: Money::new(row.unit_price),
        }
    }
}

fn hydrate(row: CartRow, line_items: Vec<LineItem>) -> Cart {
    Cart::rehydrate(
        row.id,
        row.version,
        line_items,
        Money::new(row.total_price),
        row.last_interaction_at,
        row.abandoned_at,
    )
}

/// PostgreSQL-backed cart repository.
#[derive(Debug, Clone)]
pub struct PgCartRepository {
    pool: PgPool,
}

impl PgCartRepository {
    /// Creates a new `PgCartRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_line_items(&self, cart_id: Uuid) -> Result<Vec<LineItem>, CartError> {
        let rows = sqlx::query_as::<_, LineItemRow>(
            "SELECT product_id, name, quantity, unit_price FROM line_items \
             WHERE cart_id = $1 ORDER BY id",
        )
        .bind(cart_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        Ok(rows.into_iter().map(LineItem::from).collect())
    }

    async fn hydrate_all(&self, rows: Vec<CartRow>) -> Result<Vec<Cart>, CartError> {
        let mut carts = Vec::with_capacity(rows.len());
        for row in rows {
            let line_items = self.load_line_items(row.id).await?;
            carts.push(hydrate(row, line_items));
        }
        Ok(carts)
    }
}

async fn insert_line_items(
    tx: &mut Transaction<'_, Postgres>,
    cart: &Cart,
) -> Result<(), CartError> {
    for item in cart.line_items() {
        sqlx::query(
            "INSERT INTO line_items (cart_id, product_id, name, quantity, unit_price) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(cart.id)
        .bind(item.product_id)
        .bind(&item.name)
        .bind(item.quantity)
        .bind(item.unit_price.amount())
        .execute(&mut **tx)
        .await
        .map_err(storage)?;
    }
    Ok(())
}

#[async_trait]
impl CartRepository for PgCartRepository {
    async fn insert(&self, cart: &Cart) -> Result<(), CartError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        sqlx::query(
            "INSERT INTO carts (id, total_price, last_interaction_at, abandoned, abandoned_at, version) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(cart.id)
        .bind(cart.total_price().amount())
        .bind(cart.last_interaction_at())
        .bind(cart.is_abandoned())
        .bind(cart.abandoned_at())
        .bind(cart.version())
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        insert_line_items(&mut tx, cart).await?;

        tx.commit().await.map_err(storage)
    }

    async fn find(&self, cart_id: Uuid) -> Result<Option<Cart>, CartError> {
        let row = sqlx::query_as::<_, CartRow>(&format!("{SELECT_CART} WHERE id = $1"))
            .bind(cart_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let line_items = self.load_line_items(cart_id).await?;
        Ok(Some(hydrate(row, line_items)))
    }

    async fn save(&self, cart: &Cart) -> Result<(), CartError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let actual: Option<i64> =
            sqlx::query_scalar("SELECT version FROM carts WHERE id = $1 FOR UPDATE")
                .bind(cart.id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(storage)?;

        let Some(actual) = actual else {
            return Err(CartError::CartNotFound(cart.id));
        };
        if actual != cart.version() {
            return Err(CartError::ConcurrencyConflict {
                cart_id: cart.id,
                expected: cart.version(),
                actual,
            });
        }

        sqlx::query(
            "UPDATE carts SET total_price = $2, last_interaction_at = $3, abandoned = $4, \
             abandoned_at = $5, version = $6 WHERE id = $1",
        )
        .bind(cart.id)
        .bind(cart.total_price().amount())
        .bind(cart.last_interaction_at())
        .bind(cart.is_abandoned())
        .bind(cart.abandoned_at())
        .bind(cart.version() + 1)
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        sqlx::query("DELETE FROM line_items WHERE cart_id = $1")
            .bind(cart.id)
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        insert_line_items(&mut tx, cart).await?;

        tx.commit().await.map_err(storage)
    }

    async fn delete(&self, cart_id: Uuid) -> Result<bool, CartError> {
        let result = sqlx::query("DELETE FROM carts WHERE id = $1")
            .bind(cart_id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_ready_to_abandon(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Cart>, CartError> {
        let rows = sqlx::query_as::<_, CartRow>(&format!(
            "{SELECT_CART} WHERE abandoned = FALSE AND last_interaction_at <= $1 \
             ORDER BY last_interaction_at LIMIT $2"
        ))
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        self.hydrate_all(rows).await
    }

    async fn find_ready_to_remove(
        &self,
        cutoff: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Cart>, CartError> {
        let rows = sqlx::query_as::<_, CartRow>(&format!(
            "{SELECT_CART} WHERE abandoned = TRUE AND abandoned_at <= $1 \
             ORDER BY abandoned_at LIMIT $2"
        ))
        .bind(cutoff)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        self.hydrate_all(rows).await
    }
}
