//! Fixed-size buffering engine between a byte-stream interface and a codec
//! library's chunked read/write calls.
//!
//! The buffer reserves a small prefix for putback on the read side: every
//! refill keeps up to [`PUTBACK_CAPACITY`] already-consumed bytes at the
//! front, so a caller can [`unread`](StreamBuffer::unread) what it just
//! consumed without another trip through the codec. On the write side the
//! whole buffer collects bytes and is submitted to the codec in one call
//! when full, flushed, or closed.
//!
//! # Example
//!
//! ```no_run
//! use oxistream::buffer::StreamBuffer;
//! use oxistream::gzip::GzFile;
//! use oxistream::mode::OpenMode;
//!
//! let mut buf = StreamBuffer::<GzFile>::new();
//! buf.open("data.gz", OpenMode::READ).unwrap();
//! while let Some(byte) = buf.read_byte().unwrap() {
//!     let _ = byte;
//! }
//! buf.close().unwrap();
//! ```

use crate::codec::CompressedFile;
use crate::error::{Result, StreamError};
use crate::mode::{Mode, OpenMode};
use std::fmt;
use std::path::Path;

/// Bytes reserved at the front of the buffer for putback history.
pub const PUTBACK_CAPACITY: usize = 4;

/// Payload bytes moved per codec call.
pub const PAYLOAD_CAPACITY: usize = 256;

/// Total buffer capacity.
pub const BUFFER_CAPACITY: usize = PUTBACK_CAPACITY + PAYLOAD_CAPACITY;

/// Cursor positions delimiting the active region of the buffer.
///
/// In read mode `start` is the putback floor, `pos` the next unread byte,
/// and `limit` the end of decoded data. In write mode `start` is the flush
/// base, `pos` the next free slot, and `limit` the end of usable space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    start: usize,
    pos: usize,
    limit: usize,
}

impl Cursor {
    /// Lowest position the cursor may move back to.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Current position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// End of the active region.
    pub fn limit(&self) -> usize {
        self.limit
    }
}

/// Buffered adapter over an opened codec file.
///
/// One instance is one stream: it opens at most once, runs in exactly one
/// direction, and cannot be reopened after close. Dropping an open buffer
/// closes it best-effort; call [`close`](StreamBuffer::close) to observe
/// failures.
pub struct StreamBuffer<F: CompressedFile> {
    file: Option<F>,
    mode: Option<Mode>,
    spent: bool,
    cursor: Cursor,
    buf: [u8; BUFFER_CAPACITY],
}

impl<F: CompressedFile> StreamBuffer<F> {
    /// Create an unopened buffer.
    pub fn new() -> Self {
        Self {
            file: None,
            mode: None,
            spent: false,
            cursor: Cursor::default(),
            buf: [0; BUFFER_CAPACITY],
        }
    }

    /// Open `path` with the given flag set.
    ///
    /// Fails without touching the filesystem when the flags do not reduce to
    /// exactly one of read or write, when the buffer is already open, or
    /// when it was open once before.
    pub fn open(&mut self, path: impl AsRef<Path>, flags: OpenMode) -> Result<()> {
        if self.file.is_some() {
            return Err(StreamError::AlreadyOpen);
        }
        if self.spent {
            return Err(StreamError::Reopened);
        }
        let mode = flags.direction()?;
        let file = F::open(path.as_ref(), mode)?;
        self.cursor = match mode {
            // Read side starts empty: first access triggers a fill.
            Mode::Read => Cursor {
                start: PUTBACK_CAPACITY,
                pos: PUTBACK_CAPACITY,
                limit: PUTBACK_CAPACITY,
            },
            // Write side uses the whole buffer, putback prefix included.
            Mode::Write => Cursor {
                start: 0,
                pos: 0,
                limit: BUFFER_CAPACITY,
            },
        };
        self.file = Some(file);
        self.mode = Some(mode);
        Ok(())
    }

    /// Whether the buffer currently holds an open codec handle.
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// The direction this buffer was opened in, if it ever was.
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Current cursor positions.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Decoded bytes buffered and not yet consumed (zero outside read mode).
    pub fn readable(&self) -> usize {
        match self.mode {
            Some(Mode::Read) => self.cursor.limit - self.cursor.pos,
            _ => 0,
        }
    }

    /// Bytes accepted but not yet submitted to the codec (zero outside write
    /// mode).
    pub fn pending(&self) -> usize {
        match self.mode {
            Some(Mode::Write) => self.cursor.pos - self.cursor.start,
            _ => 0,
        }
    }

    /// The unconsumed slice of decoded data.
    pub fn buffered(&self) -> &[u8] {
        match self.mode {
            Some(Mode::Read) => &self.buf[self.cursor.pos..self.cursor.limit],
            _ => &[],
        }
    }

    /// Mark up to `n` buffered bytes as consumed.
    pub fn consume(&mut self, n: usize) {
        let n = n.min(self.readable());
        self.cursor.pos += n;
    }

    /// Refill the read region from the codec.
    ///
    /// Returns the number of bytes now available, `Ok(0)` meaning
    /// end-of-stream. A buffer that is not open, or not in read mode, also
    /// reports end-of-stream. Up to [`PUTBACK_CAPACITY`] already-consumed
    /// bytes survive the refill as putback history; at end-of-stream the
    /// cursor is left alone, so the last window's history stays addressable.
    pub fn fill(&mut self) -> Result<usize> {
        let available = self.readable();
        if available > 0 {
            return Ok(available);
        }
        if self.mode != Some(Mode::Read) {
            return Ok(0);
        }
        let Some(file) = self.file.as_mut() else {
            return Ok(0);
        };
        let history = (self.cursor.pos - self.cursor.start).min(PUTBACK_CAPACITY);
        if history > 0 {
            self.buf.copy_within(
                self.cursor.pos - history..self.cursor.pos,
                PUTBACK_CAPACITY - history,
            );
        }
        let n = file.read(&mut self.buf[PUTBACK_CAPACITY..])?;
        if n == 0 {
            return Ok(0);
        }
        self.cursor = Cursor {
            start: PUTBACK_CAPACITY - history,
            pos: PUTBACK_CAPACITY,
            limit: PUTBACK_CAPACITY + n,
        };
        Ok(n)
    }

    /// Move the read position back `n` bytes.
    ///
    /// Returns `false` without moving when `n` exceeds the history still in
    /// the buffer. At least [`PUTBACK_CAPACITY`] consumed bytes survive each
    /// refill; asking for more than that may work within one buffer window
    /// but is out of contract.
    pub fn unread(&mut self, n: usize) -> bool {
        if self.mode != Some(Mode::Read) || n > self.cursor.pos - self.cursor.start {
            return false;
        }
        self.cursor.pos -= n;
        true
    }

    /// Read one decoded byte, refilling as needed.
    ///
    /// `Ok(None)` at end of stream.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        if self.readable() == 0 && self.fill()? == 0 {
            return Ok(None);
        }
        let byte = self.buf[self.cursor.pos];
        self.cursor.pos += 1;
        Ok(Some(byte))
    }

    /// Read into `out` from buffered data, refilling once when empty.
    ///
    /// Returns the byte count, `Ok(0)` at end of stream. One call makes at
    /// most one codec request, like any buffered reader.
    pub fn read(&mut self, out: &mut [u8]) -> Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }
        if self.readable() == 0 && self.fill()? == 0 {
            return Ok(0);
        }
        let n = self.readable().min(out.len());
        out[..n].copy_from_slice(&self.buf[self.cursor.pos..self.cursor.pos + n]);
        self.cursor.pos += n;
        Ok(n)
    }

    /// Append one byte, flushing first when the buffer is full.
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.ensure_writable()?;
        if self.cursor.pos == self.cursor.limit {
            self.flush_pending()?;
        }
        self.buf[self.cursor.pos] = byte;
        self.cursor.pos += 1;
        Ok(())
    }

    /// Append `data`, flushing whenever the buffer fills.
    ///
    /// Returns `data.len()`; a codec that stops accepting bytes fails the
    /// call instead of shortening it.
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.ensure_writable()?;
        let mut written = 0;
        while written < data.len() {
            if self.cursor.pos == self.cursor.limit {
                self.flush_pending()?;
            }
            let n = (self.cursor.limit - self.cursor.pos).min(data.len() - written);
            self.buf[self.cursor.pos..self.cursor.pos + n]
                .copy_from_slice(&data[written..written + n]);
            self.cursor.pos += n;
            written += n;
        }
        Ok(written)
    }

    /// Submit all pending bytes to the codec in one call.
    ///
    /// The codec must accept the full count. On a short acceptance the call
    /// fails with [`StreamError::WriteShortfall`] and the cursor stays put:
    /// the unaccepted bytes remain pending rather than silently dropped.
    pub fn flush_pending(&mut self) -> Result<usize> {
        let Some(file) = self.file.as_mut() else {
            return Err(StreamError::NotWritable);
        };
        if self.mode != Some(Mode::Write) {
            return Err(StreamError::NotWritable);
        }
        let pending = self.cursor.pos - self.cursor.start;
        if pending == 0 {
            return Ok(0);
        }
        let accepted = file.write(&self.buf[self.cursor.start..self.cursor.pos])?;
        if accepted != pending {
            return Err(StreamError::write_shortfall(pending, accepted));
        }
        self.cursor.pos = self.cursor.start;
        Ok(pending)
    }

    /// Flush pending bytes and ask the codec to make them decodable.
    ///
    /// After a successful sync a reader opening the file sees everything
    /// written so far, terminated line or not. On a read-side or unopened
    /// buffer there is nothing to synchronize and the call succeeds.
    pub fn sync(&mut self) -> Result<()> {
        if self.mode != Some(Mode::Write) || self.file.is_none() {
            return Ok(());
        }
        if self.pending() > 0 {
            self.flush_pending()?;
        }
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    /// Flush pending data and release the codec handle.
    ///
    /// Idempotent: closing a buffer that is not open changes nothing and
    /// succeeds. The handle is released even when the final flush fails; the
    /// flush error is reported first, a release error second.
    pub fn close(&mut self) -> Result<()> {
        if self.file.is_none() {
            return Ok(());
        }
        let flushed = if self.pending() > 0 {
            self.flush_pending().map(drop)
        } else {
            Ok(())
        };
        let closed = match self.file.take() {
            Some(mut file) => {
                self.spent = true;
                file.close().map_err(StreamError::close_failed)
            }
            None => Ok(()),
        };
        self.cursor = Cursor::default();
        flushed.and(closed)
    }

    fn ensure_writable(&self) -> Result<()> {
        if self.file.is_some() && self.mode == Some(Mode::Write) {
            Ok(())
        } else {
            Err(StreamError::NotWritable)
        }
    }
}

impl<F: CompressedFile> Default for StreamBuffer<F> {
    fn default() -> Self {
        Self::new()
    }
}

// Manual impl: codec handles are not themselves Debug.
impl<F: CompressedFile> fmt::Debug for StreamBuffer<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamBuffer")
            .field("open", &self.is_open())
            .field("mode", &self.mode)
            .field("spent", &self.spent)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl<F: CompressedFile> Drop for StreamBuffer<F> {
    fn drop(&mut self) {
        // Teardown errors have nowhere to go.
        let _ = self.close();
    }
}
