//! Bzip2 codec binding.
//!
//! Binds the `bzip2` crate's encoder and decoder to the [`CompressedFile`]
//! capability set and names the bzip2-flavored facades.
//!
//! # Example
//!
//! ```no_run
//! use oxistream::bzip2::Bzip2Reader;
//! use std::io::Read;
//!
//! let mut reader = Bzip2Reader::open("archive.bz2").unwrap();
//! let mut contents = Vec::new();
//! reader.read_to_end(&mut contents).unwrap();
//! ```

use crate::codec::CompressedFile;
use crate::mode::Mode;
use crate::stream::{CompressedReader, CompressedWriter};
use bzip2::Compression;
use bzip2::read::BzDecoder;
use bzip2::write::BzEncoder;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Bzip2 magic bytes, "BZh".
pub const BZIP2_MAGIC: [u8; 3] = [0x42, 0x5A, 0x68];

/// Block size used when encoding, in 100 KB units. 9 is the bzip2 tool's
/// own write default.
const BLOCK_SIZE_LEVEL: u32 = 9;

/// An open bzip2 file, decoding on read or encoding on write.
pub struct BzFile {
    inner: Inner,
}

enum Inner {
    Read(BzDecoder<File>),
    Write(BzEncoder<File>),
}

impl CompressedFile for BzFile {
    fn open(path: &Path, mode: Mode) -> io::Result<Self> {
        let inner = match mode {
            Mode::Read => Inner::Read(BzDecoder::new(File::open(path)?)),
            Mode::Write => Inner::Write(BzEncoder::new(
                File::create(path)?,
                Compression::new(BLOCK_SIZE_LEVEL),
            )),
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
            // Terminates the current block, so everything so far becomes
            // decodable.
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

/// Reader facade bound to bzip2.
pub type Bzip2Reader = CompressedReader<BzFile>;

/// Writer facade bound to bzip2.
pub type Bzip2Writer = CompressedWriter<BzFile>;
