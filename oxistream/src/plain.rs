//! Uncompressed passthrough binding.
//!
//! The identity codec: bytes move to and from a plain [`File`] untouched.
//! It rounds out the format set so generic call sites (and the engine's own
//! tests) can run against a stream with no codec behind it.

use crate::codec::CompressedFile;
use crate::mode::Mode;
use crate::stream::{CompressedReader, CompressedWriter};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// An open uncompressed file.
pub struct PlainFile {
    inner: Inner,
}

enum Inner {
    Read(File),
    Write(File),
}

impl CompressedFile for PlainFile {
    fn open(path: &Path, mode: Mode) -> io::Result<Self> {
        let inner = match mode {
            Mode::Read => Inner::Read(File::open(path)?),
            Mode::Write => Inner::Write(File::create(path)?),
        };
        Ok(Self { inner })
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            Inner::Read(file) => file.read(buf),
            Inner::Write(_) => Err(io::ErrorKind::Unsupported.into()),
        }
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.inner {
            Inner::Write(file) => file.write(buf),
            Inner::Read(_) => Err(io::ErrorKind::Unsupported.into()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.inner {
            Inner::Write(file) => file.flush(),
            Inner::Read(_) => Ok(()),
        }
    }

    fn close(&mut self) -> io::Result<()> {
        match &mut self.inner {
            Inner::Write(file) => file.flush(),
            Inner::Read(_) => Ok(()),
        }
    }
}

/// Reader facade bound to uncompressed files.
pub type PlainReader = CompressedReader<PlainFile>;

/// Writer facade bound to uncompressed files.
pub type PlainWriter = CompressedWriter<PlainFile>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passthrough_is_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.txt");

        let mut writer = PlainWriter::open(&path).unwrap();
        writer.write_all(b"exactly these bytes").unwrap();
        writer.close().unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"exactly these bytes");

        let mut reader = PlainReader::open(&path).unwrap();
        let mut back = String::new();
        reader.read_to_string(&mut back).unwrap();
        assert_eq!(back, "exactly these bytes");
    }
}
