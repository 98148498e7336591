pub mod config;
pub mod day;
pub mod place;

use std::path::PathBuf;

use daycascade_core::storage::data_dir;
use daycascade_core::JsonFileStore;

/// Open the store at `path`, or the default file in the data directory.
pub fn open_store(path: Option<PathBuf>) -> Result<JsonFileStore, Box<dyn std::error::Error>> {
    let path = match path {
        Some(path) => path,
        None => data_dir()?.join("schedule.json"),
    };
    let store = JsonFileStore::open(path)?;
    tracing::debug!(path = %store.path().display(), "opened schedule store");
    Ok(store)
}
