//! Route modules.

pub mod carts;
pub mod health;
