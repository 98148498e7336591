//! Placement coordination between the gesture layer, the resolver and the store.

mod coordinator;
mod request;
mod snapshot;

pub use coordinator::{
    build_placement_request, build_resize_request, OverflowPolicy, PlacementCoordinator,
    PlacementOutcome, RejectReason, ViewRange,
};
pub use request::{
    ActivePlacement, BatchUpdate, CascadingUpdate, PlacementKind, PlacementRequest,
    ResizeRequest, UnscheduleRequest,
};
pub use snapshot::{DaySnapshot, SnapshotEntry};
