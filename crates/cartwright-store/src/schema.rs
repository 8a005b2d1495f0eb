//! Cart store database schema.
//!
//! The canonical copy lives in `migrations/`; this constant is kept for
//! embedded/ad-hoc setups that do not run the migrator.

/// SQL to create the cart engine tables.
pub const CREATE_CART_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS products (
    id    UUID PRIMARY KEY,
    name  VARCHAR(255) NOT NULL,
    price NUMERIC(12, 2) NOT NULL CHECK (price >= 0)
);

CREATE TABLE IF NOT EXISTS carts (
    id                  UUID PRIMARY KEY,
    total_price         NUMERIC(12, 2) NOT NULL DEFAULT 0 CHECK (total_price >= 0),
    last_interaction_at TIMESTAMPTZ NOT NULL,
    abandoned           BOOLEAN NOT NULL DEFAULT FALSE,
    abandoned_at        TIMESTAMPTZ,
    version             BIGINT NOT NULL DEFAULT 0,
    CHECK (abandoned = (abandoned_at IS NOT NULL))
);

CREATE INDEX IF NOT EXISTS idx_carts_ready_to_abandon
    ON carts (last_interaction_at) WHERE abandoned = FALSE;

CREATE INDEX IF NOT EXISTS idx_carts_ready_to_remove
    ON carts (abandoned_at) WHERE abandoned = TRUE;

CREATE TABLE IF NOT EXISTS line_items (
    id         BIGSERIAL PRIMARY KEY,
    cart_id    UUID NOT NULL REFERENCES carts (id) ON DELETE CASCADE,
    product_id UUID NOT NULL,
    name       VARCHAR(255) NOT NULL,
    quantity   BIGINT NOT NULL CHECK (quantity > 0),
    unit_price NUMERIC(12, 2) NOT NULL CHECK (unit_price >= 0),
    UNIQUE (cart_id, product_id)
);

CREATE INDEX IF NOT EXISTS idx_line_items_cart_id
    ON line_items (cart_id);
";
