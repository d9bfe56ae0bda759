//! # OxiStream
//!
//! Buffered file streams for compressed data. Gzip and bzip2 files are read
//! and written through the standard `Read`/`Write` traits, the same way
//! plain files are.
//!
//! The crate provides the building blocks and the ready-made facades:
//!
//! - [`buffer`]: fixed-size buffering engine with putback support
//! - [`stream`]: lifecycle base, sticky error state, reader/writer facades
//! - [`codec`]: the capability set codec bindings implement
//! - [`gzip`], [`bzip2`], [`plain`]: the codec bindings
//! - [`detect`]: format detection from magic bytes
//! - [`mode`]: open-mode flags and validation
//! - [`error`]: error types
//!
//! ## Architecture
//!
//! A thin stack. Facades delegate to a lifecycle base, the base to the
//! buffering engine, the engine to a codec binding:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ Facades                                              │
//! │   CompressedReader / CompressedWriter  (std::io)     │
//! ├──────────────────────────────────────────────────────┤
//! │ Lifecycle                                            │
//! │   StreamBase  (open/close, good/bad/fail/eof state)  │
//! ├──────────────────────────────────────────────────────┤
//! │ Buffering                                            │
//! │   StreamBuffer  (putback prefix, fill/flush cursor)  │
//! ├──────────────────────────────────────────────────────┤
//! │ Codec bindings                                       │
//! │   GzFile (flate2) / BzFile (bzip2) / PlainFile       │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use oxistream::gzip::{GzipReader, GzipWriter};
//! use std::io::{BufRead, Write};
//!
//! // Compress a line into a file.
//! let mut writer = GzipWriter::open("greeting.gz").unwrap();
//! writeln!(writer, "hello from a compressed stream").unwrap();
//! writer.close().unwrap();
//!
//! // Read it back like any buffered file.
//! let mut reader = GzipReader::open("greeting.gz").unwrap();
//! let mut line = String::new();
//! reader.read_line(&mut line).unwrap();
//! assert_eq!(line.trim_end(), "hello from a compressed stream");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod buffer;
pub mod bzip2;
pub mod codec;
pub mod detect;
pub mod error;
pub mod gzip;
pub mod mode;
pub mod plain;
pub mod stream;

pub use crate::buffer::{BUFFER_CAPACITY, Cursor, PAYLOAD_CAPACITY, PUTBACK_CAPACITY, StreamBuffer};
pub use crate::bzip2::{BZIP2_MAGIC, BzFile, Bzip2Reader, Bzip2Writer};
pub use crate::codec::CompressedFile;
pub use crate::detect::StreamFormat;
pub use crate::error::{Result, StreamError};
pub use crate::gzip::{GZIP_MAGIC, GzFile, GzipReader, GzipWriter};
pub use crate::mode::{Mode, OpenMode};
pub use crate::plain::{PlainFile, PlainReader, PlainWriter};
pub use crate::stream::{CompressedReader, CompressedWriter, StreamBase, StreamState};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bzip2::{Bzip2Reader, Bzip2Writer};
    pub use crate::codec::CompressedFile;
    pub use crate::error::{Result, StreamError};
    pub use crate::gzip::{GzipReader, GzipWriter};
    pub use crate::mode::{Mode, OpenMode};
    pub use crate::plain::{PlainReader, PlainWriter};
    pub use crate::stream::{CompressedReader, CompressedWriter};
}
