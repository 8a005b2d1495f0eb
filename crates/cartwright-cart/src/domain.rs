//! Domain model for the cart context.

pub mod cart;
pub mod commands;
pub mod snapshot;
