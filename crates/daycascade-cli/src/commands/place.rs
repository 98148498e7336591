//! Placement command for CLI.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use daycascade_core::{
    Config, PlacementCoordinator, PlacementKind, PlacementOutcome, PlacementRequest, ScheduleStore,
};

use super::open_store;

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    /// Place a pool task for the first time
    New,
    /// Move an already-scheduled entry
    Move,
}

impl From<KindArg> for PlacementKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::New => PlacementKind::New,
            KindArg::Move => PlacementKind::Move,
        }
    }
}

#[derive(Args)]
pub struct PlaceArgs {
    /// Day key (e.g. 2025-03-01)
    #[arg(long)]
    date: String,
    /// Placement kind
    #[arg(long, value_enum, default_value = "new")]
    kind: KindArg,
    /// Task reference
    #[arg(long)]
    task: String,
    /// Schedule entry id (required for moves)
    #[arg(long)]
    entry: Option<String>,
    /// Vertical drop offset in pixels from the top of the timeline
    #[arg(long, allow_negative_numbers = true, required_unless_present = "next")]
    offset: Option<f64>,
    /// Place at the next free start of the day instead of a drop offset
    #[arg(long, conflicts_with = "offset")]
    next: bool,
    /// Duration in minutes (default: entry's duration or configured default)
    #[arg(long)]
    duration: Option<i32>,
    /// Commit the batch to the store
    #[arg(long)]
    apply: bool,
}

pub fn run(store: Option<PathBuf>, args: PlaceArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let coordinator = PlacementCoordinator::from_config(&config)?;
    let mut store = open_store(store)?;

    let snapshot = store.day_snapshot(&args.date)?;
    snapshot.validate()?;

    let kind = PlacementKind::from(args.kind);
    let outcome = match args.offset {
        Some(offset) => {
            let request = PlacementRequest {
                kind,
                task_ref: args.task,
                schedule_entry_id: args.entry,
                raw_offset_pixels: offset,
                duration_minutes: args.duration,
            };
            coordinator.place(&snapshot, &request)?
        }
        None if kind == PlacementKind::Move => {
            return Err("--next only places pool tasks; use --offset to move an entry".into());
        }
        None => coordinator.schedule_next(&snapshot, &args.task, args.duration)?,
    };

    match outcome {
        PlacementOutcome::Rejected(reason) => {
            println!("rejected: {reason}");
        }
        PlacementOutcome::Apply(batch) => {
            println!("{}", serde_json::to_string_pretty(&batch)?);
            if args.apply {
                store.apply_batch(&batch)?;
                eprintln!(
                    "applied placement and {} cascading update(s)",
                    batch.cascading_updates.len()
                );
            }
        }
    }
    Ok(())
}
