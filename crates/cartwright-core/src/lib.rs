//! Cartwright Core — shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that the cart
//! context, sweeper, and stores depend on. It contains no infrastructure
//! code.

pub mod catalog;
pub mod clock;
pub mod error;
pub mod money;
