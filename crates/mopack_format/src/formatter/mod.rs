//! Formatters and the codec traits they are built from.
//!
//! A [`Formatter`] is the unit the resolver hands out: one codec for one
//! closed type, always usable through erased entry points and usually also
//! through a [`TypedVtable`].
//!
//! - [`Encode`] / [`Decode`]: the statically typed codec traits.
//! - [`AnyPack`]: erased values, as moved around by interpreting formatters.
//! - [`PackHooks`]: lifecycle callbacks around encoding and decoding.
//! - [`interpreting_formatter`]: shared run-time codecs for hand-built
//!   object, enum and union descriptors.
//! - [`EncodeError`] / [`DecodeError`]: everything that can go wrong.

// -----------------------------------------------------------------------------
// Modules

mod any_pack;
mod error;
#[expect(clippy::module_inception, reason = "mirrors the public type name")]
mod formatter;
mod hooks;
mod object;
mod traits;
mod union;

pub(crate) mod stack;

// -----------------------------------------------------------------------------
// Exports

pub use any_pack::AnyPack;
pub use error::{DecodeError, EncodeError};
pub use formatter::{Formatter, TypedVtable, interpreting_formatter};
pub use hooks::PackHooks;
pub use traits::{Decode, Encode};
