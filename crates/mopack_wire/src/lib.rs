#![doc = include_str!("../README.md")]
#![no_std]

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod bytes;
mod error;
mod marker;
mod reader;
mod timestamp;
mod writer;

// -----------------------------------------------------------------------------
// Top-level exports

pub use bytes::Bytes;
pub use error::WireError;
pub use marker::Marker;
pub use reader::Reader;
pub use timestamp::Timestamp;
pub use writer::Writer;

/// Extension type carrying the MessagePack timestamp layouts.
pub const TIMESTAMP_EXT_TYPE: i8 = -1;
