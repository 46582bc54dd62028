//! Output module for the persisted catalog artifacts
//!
//! This module handles:
//! - The price-sorted catalog and its derived views
//! - Writing paired `.json` / `.js` artifacts from one serialized payload
//! - Reading a previous catalog back for incremental runs

mod catalog;
mod writer;

pub use catalog::Catalog;
pub use writer::{
    load_existing_catalog, read_catalog, write_artifacts, write_catalog, ArtifactPaths,
    CATALOG_CONSTANT, CATALOG_STEM,
};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
