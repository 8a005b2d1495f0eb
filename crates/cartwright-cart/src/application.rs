//! Application layer for the cart context.

pub mod command_handlers;
pub mod query_handlers;
