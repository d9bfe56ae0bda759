//! The capability set codec bindings implement.
//!
//! A codec binding is anything that can open a file at a path in one
//! direction and move bytes through the compression library behind it. The
//! buffering engine ([`StreamBuffer`](crate::buffer::StreamBuffer)) is
//! generic over this trait, so putback and flush logic is written once and
//! bound to gzip, bzip2, or plain files.

use crate::mode::Mode;
use std::io;
use std::path::Path;

/// An opened codec-backed file.
///
/// Methods speak `io::Result`; the buffering engine translates failures into
/// [`StreamError`](crate::error::StreamError). Implementations are strict
/// about direction: reading a write handle or writing a read handle is an
/// [`io::ErrorKind::Unsupported`] error. The engine never does either.
pub trait CompressedFile: Sized {
    /// Open `path` in the given direction.
    ///
    /// Read handles decode an existing compressed file; write handles create
    /// (or truncate) and encode. Codec libraries validate headers lazily, so
    /// a corrupt input surfaces at the first [`read`](Self::read), not here.
    fn open(path: &Path, mode: Mode) -> io::Result<Self>;

    /// Read up to `buf.len()` decoded bytes.
    ///
    /// `Ok(0)` means the source is exhausted.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Submit `buf` to the encoder in one call, returning how many bytes it
    /// accepted.
    ///
    /// No retry loop; callers treat a short count as a hard error.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Push everything written so far through the codec and the file beneath
    /// it, so a concurrent reader can decode it.
    fn flush(&mut self) -> io::Result<()>;

    /// Finalize the stream (write-side trailer).
    ///
    /// Called at most once by the engine; dropping the handle afterwards is
    /// always safe.
    fn close(&mut self) -> io::Result<()>;
}
