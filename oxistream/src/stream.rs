//! Stream lifecycle, sticky error state, and the typed reader/writer
//! facades.
//!
//! [`StreamBase`] binds a [`StreamBuffer`] to its open/close lifecycle and
//! latches every failure into [`StreamState`] bits, so callers can check
//! errors per call or per phase, whichever their style.
//! [`CompressedReader`] and [`CompressedWriter`] fix a direction at the type
//! level and implement the standard I/O traits, so a compressed file drops
//! into code written for plain ones.
//!
//! # Example
//!
//! ```no_run
//! use oxistream::gzip::{GzipReader, GzipWriter};
//! use std::io::{BufRead, Write};
//!
//! let mut writer = GzipWriter::open("hello.gz").unwrap();
//! writeln!(writer, "hello, stream").unwrap();
//! writer.close().unwrap();
//!
//! let mut reader = GzipReader::open("hello.gz").unwrap();
//! let mut line = String::new();
//! reader.read_line(&mut line).unwrap();
//! assert_eq!(line, "hello, stream\n");
//! ```

use crate::buffer::StreamBuffer;
use crate::codec::CompressedFile;
use crate::error::Result;
use crate::mode::OpenMode;
use std::fmt;
use std::io::{self, BufRead, Read, Write};
use std::path::Path;

/// Sticky error-state bits for a stream.
///
/// All bits clear means the stream is good. Bits latch until
/// [`clear`](StreamState::clear); the owning stream never clears them
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StreamState(u8);

impl StreamState {
    const BAD: u8 = 1 << 0;
    const FAIL: u8 = 1 << 1;
    const EOF: u8 = 1 << 2;

    /// A fresh, good state.
    pub const fn new() -> Self {
        Self(0)
    }

    /// No failure recorded and end-of-stream not reached.
    pub const fn good(self) -> bool {
        self.0 == 0
    }

    /// A hard failure was recorded: an I/O or codec error, a rejected open,
    /// or a failed close.
    pub const fn bad(self) -> bool {
        self.0 & Self::BAD != 0
    }

    /// An operation failed. True whenever [`bad`](Self::bad) is true.
    pub const fn fail(self) -> bool {
        self.0 & (Self::FAIL | Self::BAD) != 0
    }

    /// End of stream was reached on the read side.
    pub const fn eof(self) -> bool {
        self.0 & Self::EOF != 0
    }

    /// Latch the bad bit.
    pub fn set_bad(&mut self) {
        self.0 |= Self::BAD;
    }

    /// Latch the fail bit without the bad bit (caller-level failures).
    pub fn set_fail(&mut self) {
        self.0 |= Self::FAIL;
    }

    /// Latch the end-of-stream bit.
    pub fn set_eof(&mut self) {
        self.0 |= Self::EOF;
    }

    /// Reset to good.
    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

/// Lifecycle wrapper around a [`StreamBuffer`].
///
/// Owns the buffer and the sticky state. Every error an operation returns is
/// also latched as the bad bit, and a read-side end-of-stream latches eof.
pub struct StreamBase<F: CompressedFile> {
    buffer: StreamBuffer<F>,
    state: StreamState,
}

impl<F: CompressedFile> StreamBase<F> {
    /// Create an unopened stream in a good state.
    pub fn new() -> Self {
        Self {
            buffer: StreamBuffer::new(),
            state: StreamState::new(),
        }
    }

    /// Open `path` with the given flags.
    pub fn open(&mut self, path: impl AsRef<Path>, flags: OpenMode) -> Result<()> {
        let result = self.buffer.open(path, flags);
        self.latch(result)
    }

    /// Close the stream. A no-op when not open.
    pub fn close(&mut self) -> Result<()> {
        let result = self.buffer.close();
        self.latch(result)
    }

    /// Refill the read side; `Ok(0)` latches the eof bit.
    pub fn fill(&mut self) -> Result<usize> {
        let result = self.buffer.fill();
        if let Ok(0) = result {
            self.state.set_eof();
        }
        self.latch(result)
    }

    /// Buffered write of `data` in full.
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        let result = self.buffer.write(data);
        self.latch(result)
    }

    /// Flush buffered bytes through the codec.
    pub fn sync(&mut self) -> Result<()> {
        let result = self.buffer.sync();
        self.latch(result)
    }

    /// Current state bits.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Mutable access to the state bits, for clearing or caller-level
    /// latching.
    pub fn state_mut(&mut self) -> &mut StreamState {
        &mut self.state
    }

    /// Shorthand for `state().good()`.
    pub fn good(&self) -> bool {
        self.state.good()
    }

    /// Shorthand for `state().bad()`.
    pub fn bad(&self) -> bool {
        self.state.bad()
    }

    /// Shorthand for `state().fail()`.
    pub fn fail(&self) -> bool {
        self.state.fail()
    }

    /// Shorthand for `state().eof()`.
    pub fn eof(&self) -> bool {
        self.state.eof()
    }

    /// Whether the underlying buffer is open.
    pub fn is_open(&self) -> bool {
        self.buffer.is_open()
    }

    /// The buffering engine.
    pub fn buffer(&self) -> &StreamBuffer<F> {
        &self.buffer
    }

    /// Mutable access to the buffering engine.
    ///
    /// Failures produced through this reference are not latched; use the
    /// base's own methods when state tracking matters.
    pub fn buffer_mut(&mut self) -> &mut StreamBuffer<F> {
        &mut self.buffer
    }

    fn latch<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.state.set_bad();
        }
        result
    }
}

impl<F: CompressedFile> Default for StreamBase<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: CompressedFile> fmt::Debug for StreamBase<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamBase")
            .field("state", &self.state)
            .field("buffer", &self.buffer)
            .finish()
    }
}

/// Read-only compressed stream facade.
///
/// Construction opens the file; the type never writes. Decompressed bytes
/// come out through [`Read`] and [`BufRead`].
pub struct CompressedReader<F: CompressedFile> {
    stream: StreamBase<F>,
}

impl<F: CompressedFile> CompressedReader<F> {
    /// Open `path` for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, OpenMode::READ)
    }

    /// Open with an explicit flag set; [`OpenMode::READ`] is implied.
    ///
    /// Extra flags survive into validation, so append, at-end, or write
    /// requests are rejected exactly as a direct buffer open would reject
    /// them.
    pub fn open_with(path: impl AsRef<Path>, flags: OpenMode) -> Result<Self> {
        let mut stream = StreamBase::new();
        stream.open(path, flags | OpenMode::READ)?;
        Ok(Self { stream })
    }

    /// Move the read position back `n` bytes.
    ///
    /// Bounded like [`StreamBuffer::unread`]: at least
    /// [`PUTBACK_CAPACITY`](crate::buffer::PUTBACK_CAPACITY) consumed bytes
    /// are always available.
    pub fn unread(&mut self, n: usize) -> bool {
        self.stream.buffer_mut().unread(n)
    }

    /// Close the stream. Idempotent.
    pub fn close(&mut self) -> Result<()> {
        self.stream.close()
    }

    /// The lifecycle base, for state queries beyond the shorthands.
    pub fn stream(&self) -> &StreamBase<F> {
        &self.stream
    }

    /// Mutable access to the lifecycle base, for clearing latched state.
    pub fn stream_mut(&mut self) -> &mut StreamBase<F> {
        &mut self.stream
    }

    /// No failure recorded and end-of-stream not reached.
    pub fn good(&self) -> bool {
        self.stream.good()
    }

    /// A hard failure was recorded.
    pub fn bad(&self) -> bool {
        self.stream.bad()
    }

    /// An operation failed.
    pub fn fail(&self) -> bool {
        self.stream.fail()
    }

    /// End of stream was reached.
    pub fn eof(&self) -> bool {
        self.stream.eof()
    }
}

impl<F: CompressedFile> fmt::Debug for CompressedReader<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressedReader")
            .field("stream", &self.stream)
            .finish()
    }
}

impl<F: CompressedFile> Read for CompressedReader<F> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl<F: CompressedFile> BufRead for CompressedReader<F> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.stream.buffer().readable() == 0 {
            self.stream.fill().map_err(io::Error::from)?;
        }
        Ok(self.stream.buffer().buffered())
    }

    fn consume(&mut self, amt: usize) {
        self.stream.buffer_mut().consume(amt);
    }
}

/// Write-only compressed stream facade.
///
/// Construction opens (creating or truncating) the file; the type never
/// reads. Implements [`Write`], where `flush` is a true codec-level sync:
/// flushed bytes are immediately decodable by a concurrent reader.
pub struct CompressedWriter<F: CompressedFile> {
    stream: StreamBase<F>,
}

impl<F: CompressedFile> CompressedWriter<F> {
    /// Open `path` for writing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, OpenMode::WRITE)
    }

    /// Open with an explicit flag set; [`OpenMode::WRITE`] is implied.
    pub fn open_with(path: impl AsRef<Path>, flags: OpenMode) -> Result<Self> {
        let mut stream = StreamBase::new();
        stream.open(path, flags | OpenMode::WRITE)?;
        Ok(Self { stream })
    }

    /// Flush pending bytes and finalize the compressed stream.
    ///
    /// After `close` the file on disk is a complete gzip/bzip2 stream.
    /// Dropping an unclosed writer closes best-effort; close explicitly to
    /// observe failures.
    pub fn close(&mut self) -> Result<()> {
        self.stream.close()
    }

    /// The lifecycle base, for state queries beyond the shorthands.
    pub fn stream(&self) -> &StreamBase<F> {
        &self.stream
    }

    /// Mutable access to the lifecycle base, for clearing latched state.
    pub fn stream_mut(&mut self) -> &mut StreamBase<F> {
        &mut self.stream
    }

    /// No failure recorded.
    pub fn good(&self) -> bool {
        self.stream.good()
    }

    /// A hard failure was recorded.
    pub fn bad(&self) -> bool {
        self.stream.bad()
    }

    /// An operation failed.
    pub fn fail(&self) -> bool {
        self.stream.fail()
    }

    /// End of stream was reached (never set by the write side itself).
    pub fn eof(&self) -> bool {
        self.stream.eof()
    }
}

impl<F: CompressedFile> fmt::Debug for CompressedWriter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressedWriter")
            .field("stream", &self.stream)
            .finish()
    }
}

impl<F: CompressedFile> Write for CompressedWriter<F> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.sync().map_err(io::Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StreamError;
    use crate::plain::PlainFile;

    #[test]
    fn test_state_bits() {
        let mut state = StreamState::new();
        assert!(state.good());
        assert!(!state.bad());
        assert!(!state.fail());
        assert!(!state.eof());

        state.set_fail();
        assert!(!state.good());
        assert!(state.fail());
        assert!(!state.bad());

        state.set_bad();
        assert!(state.bad());
        assert!(state.fail(), "bad implies fail");

        state.set_eof();
        assert!(state.eof());

        state.clear();
        assert!(state.good());
    }

    #[test]
    fn test_eof_alone_is_not_failure() {
        let mut state = StreamState::new();
        state.set_eof();
        assert!(state.eof());
        assert!(!state.good());
        assert!(!state.fail());
        assert!(!state.bad());
    }

    #[test]
    fn test_rejected_open_latches_bad() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.bin");
        std::fs::write(&path, b"abc").unwrap();

        let mut base = StreamBase::<PlainFile>::new();
        let err = base.open(&path, OpenMode::READ | OpenMode::WRITE).unwrap_err();
        assert!(matches!(err, StreamError::InvalidMode { .. }));
        assert!(base.bad());
        assert!(base.fail());
        assert!(!base.is_open());
    }

    #[test]
    fn test_missing_file_latches_bad() {
        let dir = tempfile::tempdir().unwrap();
        let mut base = StreamBase::<PlainFile>::new();
        let err = base.open(dir.path().join("absent.bin"), OpenMode::READ).unwrap_err();
        assert!(matches!(err, StreamError::Io(_)));
        assert!(base.bad());
    }

    #[test]
    fn test_drained_stream_latches_eof() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.bin");
        std::fs::write(&path, b"payload").unwrap();

        let mut reader = CompressedReader::<PlainFile>::open(&path).unwrap();
        assert!(reader.good());
        println!("opened: {reader:?}");
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"payload");
        assert!(reader.eof());
        assert!(!reader.bad());
        assert!(!reader.fail());
        assert!(!reader.good());
    }

    #[test]
    fn test_write_after_close_errors_and_latches_bad() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.bin");

        let mut writer = CompressedWriter::<PlainFile>::open(&path).unwrap();
        writer.write_all(b"kept").unwrap();
        writer.close().unwrap();
        assert!(writer.good());

        assert!(writer.write_all(b"dropped").is_err());
        assert!(writer.bad());
        assert_eq!(std::fs::read(&path).unwrap(), b"kept");
    }

    #[test]
    fn test_reader_buffered_traits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.bin");
        std::fs::write(&path, b"one\ntwo\nthree\n").unwrap();

        let reader = CompressedReader::<PlainFile>::open(&path).unwrap();
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, ["one", "two", "three"]);
    }

    #[test]
    fn test_clear_resets_latched_eof() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.bin");
        std::fs::write(&path, b"x").unwrap();

        let mut reader = CompressedReader::<PlainFile>::open(&path).unwrap();
        let mut out = Vec::new();
        reader.read_to_end(&mut out).unwrap();
        assert!(reader.eof());

        reader.stream_mut().state_mut().clear();
        assert!(reader.good());

        // The source is still drained, so the next read latches eof again.
        assert_eq!(reader.read(&mut [0u8; 8]).unwrap(), 0);
        assert!(reader.eof());
    }
}
