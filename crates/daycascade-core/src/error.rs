//! Core error types for daycascade-core.
//!
//! Placement outcomes that are ordinary user gestures (a drop above the
//! timeline, a cascade past midnight under a reject policy) are not errors;
//! they come back as [`crate::placement::PlacementOutcome::Rejected`].
//! The types here cover bad input text, configuration and storage.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for daycascade-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Schedule store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Text that is not a 24-hour `HH:MM` time
    #[error("Invalid time '{0}': expected 24-hour HH:MM")]
    InvalidTime(String),

    /// The same schedule entry appears twice in one day snapshot
    #[error("Duplicate schedule entry '{0}' in day snapshot")]
    DuplicateEntry(String),

    /// A move was requested without the placement row it moves
    #[error("Move of task '{task_ref}' requires a schedule entry id")]
    MissingEntryId { task_ref: String },

    /// A gesture value that cannot be converted, such as a non-finite offset
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Schedule store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// A batch or request names a row that is not in the day
    #[error("Schedule entry '{entry_id}' not found on {date_key}")]
    EntryNotFound { date_key: String, entry_id: String },

    /// A batch that cannot be applied as a whole
    #[error("Invalid batch: {0}")]
    InvalidBatch(String),

    /// Store file could not be read or written
    #[error("Store file {path}: {message}")]
    File { path: PathBuf, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
