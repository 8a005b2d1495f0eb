//! Cartwright — shopping cart bounded context.
//!
//! Responsible for the cart aggregate: line items, the derived total
//! price, interaction tracking, and the abandonment lifecycle flags.

pub mod application;
pub mod domain;
pub mod repository;
