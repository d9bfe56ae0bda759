//! Gzip codec binding.
//!
//! Binds `flate2`'s file-oriented encoder and decoder to the
//! [`CompressedFile`] capability set and names the gzip-flavored facades.
//!
//! # Example
//!
//! ```no_run
//! use oxistream::gzip::GzipWriter;
//! use std::io::Write;
//!
//! let mut writer = GzipWriter::open("out.gz").unwrap();
//! writer.write_all(b"payload").unwrap();
//! writer.close().unwrap();
//! ```

use crate::codec::CompressedFile;
use crate::mode::Mode;
use crate::stream::{CompressedReader, CompressedWriter};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Gzip magic bytes.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// An open gzip file, decoding on read or encoding on write.
///
/// Write handles encode at `flate2`'s default level (6), the conventional
/// gzip default. Read handles validate the header lazily, so a corrupt file
/// fails at the first read.
pub struct GzFile {
    inner: Inner,
}

enum Inner {
    Read(GzDecoder<File>),
    Write(GzEncoder<File>),
}

impl CompressedFile for GzFile {
    fn open(path: &Path, mode: Mode) -> io::Result<Self> {
        let inner = match mode {
            Mode::Read => Inner::Read(GzDecoder::new(File::open(path)?)),
            Mode::Write => Inner::Write(GzEncoder::new(File::create(path)?, Compression::default())),
        };
        Ok(Self { inner })
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            Inner::Read(decoder) => decoder.read(buf),
            Inner::Write(_) => Err(io::ErrorKind::Unsupported.into()),
        }
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            Inner::Write(encoder) => encoder.write(buf),
            Inner::Read(_) => Err(io::ErrorKind::Unsupported.into()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            // flate2 sync-flushes the deflate stream before the file, so
            // everything so far becomes decodable.
            Inner::Write(encoder) => encoder.flush(),
            Inner::Read(_) => Ok(()),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        match &mut self.inner {
            Inner::Write(encoder) => encoder.try_finish(),
            Inner::Read(_) => Ok(()),
        }
    }
}

/// Reader facade bound to gzip.
pub type GzipReader = CompressedReader<GzFile>;

/// Writer facade bound to gzip.
pub type GzipWriter = CompressedWriter<GzFile>;
