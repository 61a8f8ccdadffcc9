//! Error types for path tree construction.

use thiserror::Error;
use tracing::warn;

/// Result type for path tree operations.
pub type PathTreeResult<T> = Result<T, PathTreeError>;

/// Errors raised while building a tree from path entries.
///
/// A failed build never yields a partial tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathTreeError {
    /// The path splits into zero segments under the configured separator.
    #[error("path {path:?} has no segments when split on {separator:?}")]
    MalformedPath { path: String, separator: String },

    /// The separator is the empty string.
    #[error("path separator must not be empty")]
    EmptySeparator,
}

impl PathTreeError {
    /// Creates a malformed path error.
    pub fn malformed_path(path: impl Into<String>, separator: impl Into<String>) -> Self {
        let path = path.into();
        let separator = separator.into();
        warn!(%path, %separator, "rejecting path without segments");
        Self::MalformedPath { path, separator }
    }
}
