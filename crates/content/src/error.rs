//! Content Metadata Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use cmeta_objectfile::error::ErrorKind as FileErrorKind;
use derive_more::{Display, Error};
use exn::ResultExt;
use std::path::{Path, PathBuf};

/// A content metadata error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for content metadata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
/// Configuration and missing-input errors are raised before any output is
/// produced.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required input (object identifier, files, resources) was absent or empty.
    #[display("missing required input: {_0}")]
    MissingInput(#[error(not(source))] &'static str),
    /// A referenced file doesn't exist on the filesystem.
    #[display("file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// An option value is unrecognized or the options contradict the input.
    #[display("invalid configuration: {_0}")]
    InvalidConfiguration(#[error(not(source))] String),
    /// Required metadata (checksum, size, mimetype) couldn't be read from a file.
    #[display("could not extract metadata from {}", _0.display())]
    MetadataExtraction(#[error(not(source))] PathBuf),
    /// Writing the XML document failed.
    #[display("failed to write XML")]
    Xml,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::MetadataExtraction(_))
    }
}

/// Raises a file metadata failure for `path`: a file that has disappeared is
/// [`ErrorKind::NotFound`], anything else is [`ErrorKind::MetadataExtraction`].
pub(crate) fn raise_for_file<T>(result: cmeta_objectfile::error::Result<T>, path: &Path) -> Result<T> {
    let missing = match result.as_ref().map_err(|err| &**err) {
        Err(FileErrorKind::NotFound(missing)) => Some(missing.clone()),
        _ => None,
    };
    result.or_raise(|| match missing {
        Some(missing) => ErrorKind::NotFound(missing),
        None => ErrorKind::MetadataExtraction(path.to_path_buf()),
    })
}
