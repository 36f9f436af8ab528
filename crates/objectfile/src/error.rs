//! Object File Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// An object file error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for object file operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The file backing a descriptor does not exist (or is not a regular file).
    #[display("file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Underlying I/O error while reading file contents or metadata.
    #[display("I/O error: {_0}")]
    Io(IoError),
    /// A derived metadata field could not be extracted from the file.
    #[display("could not extract {_0} from file")]
    Metadata(#[error(not(source))] &'static str),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
