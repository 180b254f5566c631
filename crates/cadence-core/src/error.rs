//! Core error types for cadence-core.
//!
//! The core itself never prints; the calling layer translates these kinds
//! into user-facing messages.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cadence-core.
#[derive(Error, Debug)]
pub enum Error {
    /// Adding another entry would exceed the list capacity. The add is
    /// rejected and the list is left unchanged.
    #[error("{list} is full ({max} entries)")]
    CapacityExceeded { list: &'static str, max: usize },

    /// Index-based access outside the list bounds. Raised before any
    /// mutation, so bulk operations never partially apply.
    #[error("index {index} out of bounds for {list} (length: {len})")]
    InvalidIndex {
        list: &'static str,
        index: usize,
        len: usize,
    },

    /// Snoozing is only meaningful for one-time schedules.
    #[error("a recurring reminder cannot be snoozed")]
    SnoozeUnsupported,

    /// A date-time argument could not be read at all.
    #[error("'{value}' is not a valid date-time")]
    BadDateTime { value: String },

    /// A date-time argument with a blank segment was used where a concrete
    /// instant is required (schedule triggers, habit deadlines).
    #[error("'{value}' is not a complete date-time")]
    IncompleteDateTime { value: String },

    /// Schedule and habit intervals must be at least one minute.
    #[error("interval must be at least one minute")]
    InvalidInterval,

    /// Storage-related errors
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read a data file
    #[error("failed to load {path}: {source}")]
    LoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a data file
    #[error("failed to save {path}: {source}")]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data file line did not match any known record shape
    #[error("{path}:{line}: unrecognized record '{record}'")]
    ParseFailed {
        path: PathBuf,
        line: usize,
        record: String,
    },

    /// Failed to parse configuration
    #[error("failed to parse configuration: {0}")]
    ConfigParseFailed(String),

    /// Failed to serialize configuration
    #[error("failed to serialize configuration: {0}")]
    ConfigEncodeFailed(String),
}

/// Result type alias for core errors
pub type Result<T, E = Error> = std::result::Result<T, E>;
