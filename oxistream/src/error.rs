//! Error types for compressed stream operations.

use crate::mode::OpenMode;
use std::io;
use thiserror::Error;

/// The main error type for stream operations.
#[derive(Debug, Error)]
pub enum StreamError {
    /// I/O error from the codec library or the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Open rejected: the flag set does not reduce to plain read or plain
    /// write.
    #[error("Unsupported open mode: {flags}")]
    InvalidMode {
        /// The rejected flag set.
        flags: OpenMode,
    },

    /// Open called on a stream that is already open.
    #[error("Stream is already open")]
    AlreadyOpen,

    /// Open called after close. Streams are one-shot.
    #[error("Stream cannot be reopened after close")]
    Reopened,

    /// A write-side operation on a stream not open for writing.
    #[error("Stream is not open for writing")]
    NotWritable,

    /// The codec accepted fewer bytes than one flush submitted.
    #[error("Short write: submitted {submitted} bytes, codec accepted {accepted}")]
    WriteShortfall {
        /// Bytes handed to the codec.
        submitted: usize,
        /// Bytes the codec accepted.
        accepted: usize,
    },

    /// The codec handle reported a failure while being released.
    #[error("Close failed: {source}")]
    CloseFailed {
        /// The underlying codec or filesystem error.
        #[source]
        source: io::Error,
    },
}

impl StreamError {
    /// Create an invalid open-mode error.
    pub fn invalid_mode(flags: OpenMode) -> Self {
        Self::InvalidMode { flags }
    }

    /// Create a short-write error.
    pub fn write_shortfall(submitted: usize, accepted: usize) -> Self {
        Self::WriteShortfall { submitted, accepted }
    }

    /// Create a close-failure error.
    pub fn close_failed(source: io::Error) -> Self {
        Self::CloseFailed { source }
    }
}

/// Translation into `io::Error` for the standard trait implementations.
///
/// Plain I/O failures unwrap back to the original error; a short write maps
/// to [`io::ErrorKind::WriteZero`] since data would otherwise be lost
/// silently.
impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::Io(e) => e,
            StreamError::WriteShortfall { .. } => io::Error::new(io::ErrorKind::WriteZero, err),
            other => io::Error::other(other),
        }
    }
}

/// Result type alias for stream operations.
pub type Result<T> = std::result::Result<T, StreamError>;
