use mopack_wire::{Reader, Writer};

use crate::formatter::{DecodeError, EncodeError};
use crate::info::Described;
use crate::resolve::Resolver;

// -----------------------------------------------------------------------------
// Encode

/// A type that can write itself to the wire.
///
/// Composite implementations encode inner values through
/// [`Resolver::encode_value`] rather than calling `encode` on them directly,
/// so that registered overrides apply all the way down the tree.
pub trait Encode: Described {
    fn encode(&self, writer: &mut Writer<'_>, resolver: &Resolver) -> Result<(), EncodeError>;
}

// -----------------------------------------------------------------------------
// Decode

/// A type that can read itself from the wire.
///
/// Composite implementations decode inner values through
/// [`Resolver::decode_value`] for the same reason [`Encode`] routes through
/// the resolver: overrides must reach nested values.
pub trait Decode: Described + Sized {
    fn decode(reader: &mut Reader<'_>, resolver: &Resolver) -> Result<Self, DecodeError>;
}
