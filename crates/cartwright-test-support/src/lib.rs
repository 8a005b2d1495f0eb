//! Shared test mocks and utilities for the Cartwright cart engine.

mod catalog;
mod clock;
mod repository;

pub use catalog::InMemoryProductCatalog;
pub use clock::FixedClock;
pub use repository::{FailingCartRepository, InMemoryCartRepository};
