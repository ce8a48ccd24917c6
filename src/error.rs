//! Failures of a single reduce invocation.
//!
//! Every variant is fatal for the partition being reduced: the caller gets
//! the error back and no output is left at the destination.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for reduce operations
pub type Result<T> = std::result::Result<T, ReduceError>;

#[derive(Error, Debug)]
pub enum ReduceError {
    /// An intermediate file expected from a map task is missing or cannot be opened
    #[error("intermediate file {} from map task {map_task} is unavailable: {source}", .path.display())]
    SourceUnavailable {
        map_task: usize,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An intermediate file does not parse as a record stream
    #[error("record #{record} of {} (map task {map_task}) is corrupt: {source}", .path.display())]
    DecodeCorruption {
        map_task: usize,
        path: PathBuf,
        record: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The output file cannot be created, written or committed
    #[error("output file {} cannot be written: {source}", .path.display())]
    DestinationUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ReduceError {
    /// The file the failure is about.
    pub fn path(&self) -> &PathBuf {
        match self {
            ReduceError::SourceUnavailable { path, .. }
            | ReduceError::DecodeCorruption { path, .. }
            | ReduceError::DestinationUnavailable { path, .. } => path,
        }
    }
}
