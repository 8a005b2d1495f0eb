//! Cartwright — periodic cart abandonment sweeper.
//!
//! Applies the time-based cart lifecycle: `Active → Abandoned → Removed`.
//! Passes are idempotent and safe to run concurrently with user-facing
//! mutations; each per-cart transition goes through the same versioned
//! repository save as any other write.

mod config;
mod sweeper;

pub use config::SweeperConfig;
pub use sweeper::{SweepReport, Sweeper};
