//! Day timeline model.
//!
//! This module provides:
//! - The scheduled interval type the resolver works on
//! - Cascading conflict resolution for a new or moved interval
//! - Next free start lookup for placements without a drop position

mod interval;
mod resolver;
mod slot;

pub use interval::ScheduledInterval;
pub use resolver::{resolve, Resolution, Shift};
pub use slot::{next_available_start, DEFAULT_DAY_START, LATEST_SLOT_START};
