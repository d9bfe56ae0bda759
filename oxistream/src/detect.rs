//! Stream format auto-detection.
//!
//! Identifies which codec produced a file from its magic bytes, so tools
//! can pick the right reader without trusting the file extension.

use crate::bzip2::BZIP2_MAGIC;
use crate::error::Result;
use crate::gzip::GZIP_MAGIC;
use std::io::Read;

/// Known compressed stream formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFormat {
    /// GZIP compressed file (.gz).
    Gzip,
    /// Bzip2 compressed file (.bz2).
    Bzip2,
    /// Unknown format (treated as uncompressed).
    Unknown,
}

impl StreamFormat {
    /// Detect format from magic bytes.
    pub fn from_magic(magic: &[u8]) -> Self {
        if magic.len() < 2 {
            return Self::Unknown;
        }
        if magic.starts_with(&GZIP_MAGIC) {
            return Self::Gzip;
        }
        if magic.starts_with(&BZIP2_MAGIC) {
            return Self::Bzip2;
        }
        Self::Unknown
    }

    /// Detect format from a reader.
    ///
    /// Consumes up to four bytes; callers that go on to open a stream
    /// should reopen from the path.
    pub fn detect<R: Read>(reader: &mut R) -> Result<(Self, Vec<u8>)> {
        let mut magic = vec![0u8; 4];
        let bytes_read = reader.read(&mut magic)?;
        magic.truncate(bytes_read);
        let format = Self::from_magic(&magic);
        Ok((format, magic))
    }

    /// Get the typical file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Gzip => "gz",
            Self::Bzip2 => "bz2",
            Self::Unknown => "",
        }
    }

    /// Get the MIME type.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Gzip => "application/gzip",
            Self::Bzip2 => "application/x-bzip2",
            Self::Unknown => "application/octet-stream",
        }
    }
}

impl std::fmt::Display for StreamFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gzip => write!(f, "GZIP"),
            Self::Bzip2 => write!(f, "Bzip2"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}
