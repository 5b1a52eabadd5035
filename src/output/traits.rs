//! Output handler traits and types
//!
//! This module defines the trait interface implemented by every artifact a
//! discovery run produces for downstream consumers.

use crate::discovery::DiscoveryResult;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for writers of discovery artifacts
pub trait OutputHandler {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Writes the artifact for `result`, replacing any previous version
    fn write(&self, result: &DiscoveryResult) -> OutputResult<()>;
}
