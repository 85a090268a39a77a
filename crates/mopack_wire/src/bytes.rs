use alloc::vec::Vec;
use core::ops::Deref;

// -----------------------------------------------------------------------------
// Bytes

/// An owned byte buffer that encodes as the binary family.
///
/// A plain `Vec<u8>` goes through the generic list codec and writes an
/// array of small integers; wrapping the buffer in `Bytes` selects the
/// compact `bin 8/16/32` layouts instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub const fn new(bytes: Vec<u8>) -> Bytes {
        Bytes(bytes)
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Bytes {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Bytes {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    #[inline]
    fn from(bytes: Vec<u8>) -> Bytes {
        Bytes(bytes)
    }
}

impl From<&[u8]> for Bytes {
    #[inline]
    fn from(bytes: &[u8]) -> Bytes {
        Bytes(bytes.to_vec())
    }
}

impl From<Bytes> for Vec<u8> {
    #[inline]
    fn from(bytes: Bytes) -> Vec<u8> {
        bytes.0
    }
}
