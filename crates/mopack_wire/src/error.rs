use core::fmt;

use crate::marker::Marker;

// -----------------------------------------------------------------------------
// WireError

/// A failure while reading or writing the binary encoding.
///
/// Read failures carry the byte offset of the value whose marker was being
/// decoded, so a caller can report where in the buffer things went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// The buffer ended before the value did.
    UnexpectedEof {
        offset: usize,
    },
    /// A value of one family was found where another was required.
    Mismatch {
        expected: &'static str,
        found: Marker,
        offset: usize,
    },
    /// The value is well-formed but does not fit the requested type.
    OutOfRange {
        expected: &'static str,
        offset: usize,
    },
    /// A string payload was not valid UTF-8.
    Utf8 {
        offset: usize,
    },
    /// An extension value carried a different type tag than the one asked
    /// for.
    ExtType {
        expected: i8,
        found: i8,
        offset: usize,
    },
    /// A length exceeds what the format can carry (`u32::MAX` bytes).
    LengthOverflow {
        kind: &'static str,
        len: usize,
    },
    /// The reserved format byte `0xc1` appeared in the input.
    Reserved {
        offset: usize,
    },
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireError::UnexpectedEof { offset } => {
                write!(f, "unexpected end of input at offset {offset}")
            }
            WireError::Mismatch {
                expected,
                found,
                offset,
            } => {
                write!(f, "expected {expected} but found {found} at offset {offset}")
            }
            WireError::OutOfRange { expected, offset } => {
                write!(f, "value at offset {offset} does not fit in {expected}")
            }
            WireError::Utf8 { offset } => {
                write!(f, "invalid UTF-8 in string at offset {offset}")
            }
            WireError::ExtType {
                expected,
                found,
                offset,
            } => {
                write!(
                    f,
                    "expected extension type {expected} but found {found} at offset {offset}"
                )
            }
            WireError::LengthOverflow { kind, len } => {
                write!(f, "{kind} of {len} bytes exceeds the format's length limit")
            }
            WireError::Reserved { offset } => {
                write!(f, "reserved format byte 0xc1 at offset {offset}")
            }
        }
    }
}

impl core::error::Error for WireError {}
