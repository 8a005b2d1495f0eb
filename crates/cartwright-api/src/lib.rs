//! Cartwright — Axum HTTP API for the cart engine.

pub mod error;
pub mod routes;
pub mod state;
