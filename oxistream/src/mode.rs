//! Open-mode flags and direction validation.
//!
//! Streams are opened with a flag set so callers can express (and be
//! refused) the combinations file-stream APIs traditionally accept.
//! Validation happens before any file is touched: only plain read and plain
//! write survive it.

use crate::error::{Result, StreamError};
use std::fmt;
use std::ops::BitOr;

/// Open-mode flag set.
///
/// Flags combine with `|`. Exactly two combinations are accepted at open
/// time: [`OpenMode::READ`] alone and [`OpenMode::WRITE`] alone. Everything
/// else, including an empty set, is rejected with
/// [`StreamError::InvalidMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenMode(u8);

impl OpenMode {
    /// Open for reading (decompress an existing file).
    pub const READ: Self = Self(1 << 0);
    /// Open for writing (create and compress).
    pub const WRITE: Self = Self(1 << 1);
    /// Append to an existing stream. Never supported.
    pub const APPEND: Self = Self(1 << 2);
    /// Position at the end immediately after opening. Never supported.
    pub const AT_END: Self = Self(1 << 3);

    /// The empty flag set. Rejected at open (no direction).
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Whether every flag in `other` is also set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Reduce the flag set to a stream direction.
    ///
    /// Append and at-end are refused outright; so are dual-direction and
    /// directionless sets.
    pub fn direction(self) -> Result<Mode> {
        if self.contains(Self::APPEND) || self.contains(Self::AT_END) {
            return Err(StreamError::invalid_mode(self));
        }
        match (self.contains(Self::READ), self.contains(Self::WRITE)) {
            (true, false) => Ok(Mode::Read),
            (false, true) => Ok(Mode::Write),
            _ => Err(StreamError::invalid_mode(self)),
        }
    }
}

impl BitOr for OpenMode {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "none");
        }
        let mut first = true;
        for (flag, name) in [
            (Self::READ, "read"),
            (Self::WRITE, "write"),
            (Self::APPEND, "append"),
            (Self::AT_END, "at-end"),
        ] {
            if self.contains(flag) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// The direction a stream runs in, fixed for its whole open lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Decompress bytes from an existing file.
    Read,
    /// Compress bytes into a new file.
    Write,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_directions_accepted() {
        assert_eq!(OpenMode::READ.direction().unwrap(), Mode::Read);
        assert_eq!(OpenMode::WRITE.direction().unwrap(), Mode::Write);
    }

    #[test]
    fn test_rejected_combinations() {
        let rejected = [
            OpenMode::empty(),
            OpenMode::APPEND,
            OpenMode::AT_END,
            OpenMode::READ | OpenMode::WRITE,
            OpenMode::WRITE | OpenMode::APPEND,
            OpenMode::READ | OpenMode::AT_END,
            OpenMode::READ | OpenMode::WRITE | OpenMode::APPEND,
        ];
        for flags in rejected {
            assert!(
                matches!(flags.direction(), Err(StreamError::InvalidMode { .. })),
                "{flags} should be rejected"
            );
        }
    }

    #[test]
    fn test_contains() {
        let flags = OpenMode::READ | OpenMode::APPEND;
        assert!(flags.contains(OpenMode::READ));
        assert!(flags.contains(OpenMode::APPEND));
        assert!(!flags.contains(OpenMode::WRITE));
        assert!(flags.contains(OpenMode::empty()));
    }

    #[test]
    fn test_display() {
        assert_eq!(OpenMode::READ.to_string(), "read");
        assert_eq!((OpenMode::WRITE | OpenMode::APPEND).to_string(), "write|append");
        assert_eq!((OpenMode::READ | OpenMode::AT_END).to_string(), "read|at-end");
        assert_eq!(OpenMode::empty().to_string(), "none");
        assert_eq!(Mode::Read.to_string(), "read");
        assert_eq!(Mode::Write.to_string(), "write");
    }
}
