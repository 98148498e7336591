//! # Daycascade Core Library
//!
//! Single-day timeline placement with cascading conflict resolution. A
//! task dropped onto (or moved along) a day timeline is snapped to the
//! 15-minute grid, every later task it collides with is pushed forward in
//! start order, and the result is handed to the schedule store as one
//! batch.
//!
//! ## Architecture
//!
//! - **Timeline**: interval model and the cascade resolver, a pure function
//!   of (committed intervals, active interval)
//! - **Placement**: converts drop coordinates to minutes and packages
//!   resolutions as batch updates
//! - **Storage**: the schedule store seam and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`resolve`]: cascade resolver
//! - [`PlacementCoordinator`]: drop handling and batch assembly
//! - [`ScheduleStore`]: persistence collaborator trait
//! - [`Config`]: application configuration management

pub mod error;
pub mod placement;
pub mod storage;
pub mod time;
pub mod timeline;

pub use error::{ConfigError, CoreError, StorageError, ValidationError};
pub use placement::{
    BatchUpdate, DaySnapshot, OverflowPolicy, PlacementCoordinator, PlacementKind,
    PlacementOutcome, PlacementRequest, RejectReason, SnapshotEntry, ViewRange,
};
pub use storage::{Config, JsonFileStore, MemoryStore, ScheduleStore};
pub use time::Minute;
pub use timeline::{next_available_start, resolve, Resolution, ScheduledInterval, Shift};
