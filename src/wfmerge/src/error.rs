//! Error types for the fusion pipeline.
//!
//! Only the primary export can abort a run. Every other source degrades to
//! empty input at the loader boundary, so these variants are either fatal
//! source problems or output I/O failures.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("primary export {path} is not valid JSON: {source}")]
    PrimaryParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("primary export {path} has unexpected top-level shape: expected an array or an object holding one, found {found}")]
    PrimaryShape { path: PathBuf, found: &'static str },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to persist output to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MergeError>;
