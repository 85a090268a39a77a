//! Formatter resolution.
//!
//! # Menu
//!
//! - [`Resolver`]: maps types to formatters through an ordered strategy
//!   chain with a cache in front.
//! - [`ResolverBuilder`]: assembles the chain; a built resolver never
//!   changes again.
//! - [`ResolveStrategy`]: one link of the chain. The standard links are
//!   [`ScalarStrategy`], [`EnumStrategy`], [`ContainerStrategy`],
//!   [`UnionStrategy`], [`ObjectStrategy`] and [`AnyFallbackStrategy`];
//!   overrides sit in front of all of them.
//! - [`serialize`] / [`deserialize`]: one-call entry points over a
//!   resolver.

mod builder;
mod error;
#[expect(clippy::module_inception, reason = "mirrors the public type name")]
mod resolver;
mod strategy;

pub use builder::ResolverBuilder;
pub use error::{ConfigError, ResolveError};
pub use resolver::Resolver;
pub use strategy::{
    AnyFallbackStrategy, ContainerStrategy, EnumStrategy, ObjectStrategy, ResolveStrategy,
    ScalarStrategy, UnionStrategy,
};

use alloc::boxed::Box;
use alloc::vec::Vec;

use mopack_wire::{Reader, Writer};

use crate::formatter::{AnyPack, Decode, DecodeError, Encode, EncodeError};
use crate::info::TypeDescriptor;

/// Serializes a value into a fresh byte vector.
///
/// ```
/// use mopack_format::resolve::{self, Resolver};
///
/// let resolver = Resolver::standard();
/// let bytes = resolve::serialize(&300_u16, &resolver)?;
/// assert_eq!(bytes, [0xCD, 0x01, 0x2C]);
/// # Ok::<(), mopack_format::formatter::EncodeError>(())
/// ```
pub fn serialize<T: Encode>(value: &T, resolver: &Resolver) -> Result<Vec<u8>, EncodeError> {
    crate::cfg::debug! {
        crate::formatter::stack::DESCRIPTOR_STACK.with_borrow_mut(|stack| stack.clear());
    }
    let mut bytes = Vec::new();
    resolver.encode_value(value, &mut Writer::new(&mut bytes))?;
    Ok(bytes)
}

/// Deserializes a value from a byte slice.
///
/// The value must span the whole slice; leftover bytes are reported as
/// [`DecodeError::Trailing`].
///
/// ```
/// use mopack_format::resolve::{self, Resolver};
///
/// let resolver = Resolver::standard();
/// let value: u16 = resolve::deserialize(&[0xCD, 0x01, 0x2C], &resolver)?;
/// assert_eq!(value, 300);
/// # Ok::<(), mopack_format::formatter::DecodeError>(())
/// ```
pub fn deserialize<T: Decode>(bytes: &[u8], resolver: &Resolver) -> Result<T, DecodeError> {
    crate::cfg::debug! {
        crate::formatter::stack::DESCRIPTOR_STACK.with_borrow_mut(|stack| stack.clear());
    }
    let mut reader = Reader::new(bytes);
    let value = resolver.decode_value(&mut reader)?;
    if !reader.is_finished() {
        return Err(DecodeError::Trailing {
            remaining: reader.remaining(),
        });
    }
    Ok(value)
}

/// Serializes an erased value into a fresh byte vector.
pub fn serialize_erased(
    value: &dyn AnyPack,
    resolver: &Resolver,
) -> Result<Vec<u8>, EncodeError> {
    crate::cfg::debug! {
        crate::formatter::stack::DESCRIPTOR_STACK.with_borrow_mut(|stack| stack.clear());
    }
    let mut bytes = Vec::new();
    resolver.encode_erased(value, &mut Writer::new(&mut bytes))?;
    Ok(bytes)
}

/// Deserializes an erased value of the descriptor's type from a byte slice.
///
/// The counterpart of [`serialize_erased`] for callers that only hold a
/// [`TypeDescriptor`]. Leftover bytes are reported as
/// [`DecodeError::Trailing`].
pub fn deserialize_erased(
    descriptor: &'static TypeDescriptor,
    bytes: &[u8],
    resolver: &Resolver,
) -> Result<Box<dyn AnyPack>, DecodeError> {
    crate::cfg::debug! {
        crate::formatter::stack::DESCRIPTOR_STACK.with_borrow_mut(|stack| stack.clear());
    }
    let mut reader = Reader::new(bytes);
    let value = resolver.decode_erased(descriptor, &mut reader)?;
    if !reader.is_finished() {
        return Err(DecodeError::Trailing {
            remaining: reader.remaining(),
        });
    }
    Ok(value)
}
