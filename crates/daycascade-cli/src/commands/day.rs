//! Day inspection and single-row edits for CLI.

use std::path::PathBuf;

use clap::Subcommand;
use daycascade_core::placement::{build_resize_request, UnscheduleRequest};
use daycascade_core::time::{format_display_12h, format_duration, minute_to_time_string};
use daycascade_core::{next_available_start, Config, ScheduleStore, ViewRange};

use super::open_store;

#[derive(Subcommand)]
pub enum DayAction {
    /// Show a day's schedule in start order
    Show {
        /// Day key
        #[arg(long)]
        date: String,
        /// Print the raw snapshot as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the next free start time of a day
    NextSlot {
        /// Day key
        #[arg(long)]
        date: String,
    },
    /// Resize an entry from a drag-handle height (no cascade)
    Resize {
        /// Day key
        #[arg(long)]
        date: String,
        /// Schedule entry id
        #[arg(long)]
        entry: String,
        /// Block height in pixels
        #[arg(long)]
        height: f64,
        /// Commit the resize to the store
        #[arg(long)]
        apply: bool,
    },
    /// Remove an entry from a day
    Unschedule {
        /// Day key
        #[arg(long)]
        date: String,
        /// Schedule entry id
        #[arg(long)]
        entry: String,
    },
}

pub fn run(store: Option<PathBuf>, action: DayAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(store)?;
    match action {
        DayAction::Show { date, json } => {
            let snapshot = store.day_snapshot(&date)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
                return Ok(());
            }

            let config = Config::load_or_default();
            let view = ViewRange::new(config.timeline.view_start_hour, config.timeline.view_end_hour)?;

            let mut rows: Vec<_> = snapshot.entries.iter().collect();
            rows.sort_by_key(|e| e.start_minute().unwrap_or(i32::MAX));
            for entry in rows {
                let duration = format_duration(entry.effective_duration());
                match entry.start_minute() {
                    Some(start) => {
                        let marker = if view.is_visible(start) { ' ' } else { '*' };
                        println!(
                            "{marker}{}  {:>8}  {:<12} {}  [{}]",
                            minute_to_time_string(start),
                            format_display_12h(start),
                            duration,
                            entry.task_ref,
                            entry.schedule_entry_id
                        );
                    }
                    None => println!(
                        " --:--  {:>8}  {:<12} {}  [{}]",
                        "pool", duration, entry.task_ref, entry.schedule_entry_id
                    ),
                }
            }
        }
        DayAction::NextSlot { date } => {
            let snapshot = store.day_snapshot(&date)?;
            let start = next_available_start(&snapshot.committed_intervals());
            println!("{}", minute_to_time_string(start));
        }
        DayAction::Resize {
            date,
            entry,
            height,
            apply,
        } => {
            let request = build_resize_request(&date, &entry, height)?;
            println!("{}", serde_json::to_string_pretty(&request)?);
            if apply {
                store.apply_resize(&request)?;
                eprintln!("resized {entry} to {} min", request.duration_minutes);
            }
        }
        DayAction::Unschedule { date, entry } => {
            store.unschedule(&UnscheduleRequest {
                date_key: date,
                schedule_entry_id: entry.clone(),
            })?;
            println!("unscheduled {entry}");
        }
    }
    Ok(())
}
