//! Codec implementations for built-in types, plus the utilities the
//! implementations and the derive macro lean on.
//!
//! - [`concat`]: An efficient string concatenation function.
//! - [`NonGenericDescriptorCell`]: Used to implement [`Described`] for non-generic types.
//! - [`GenericDescriptorCell`]: Used to implement [`Described`] for generic types.
//! - [`GenericNameCell`]: Used to build the display name of a generic type.
//! - [`GenericFormatterCell`]: Backs [`native_formatter`].
//! - [`native_formatter`]: The canonical formatter of a type with its own codec.
//!
//! ## Implemented Menu
//!
//! - native:
//!     - `i8`-`i64`, `u8`-`u64`, `isize`, `usize`, `f32`, `f64`
//!     - `bool`, `char`, `()`
//!     - `(P0,)`, `(P0, P1, ...)`. the num of P <= 8
//!     - `[T; N]`
//!     - `String`
//! - core:
//!     - `Option<T>`
//! - alloc:
//!     - `Vec<T>`, `Box<T>`
//!     - `BTreeMap<K, V>`, `BTreeSet<T>`
//! - std:
//!     - `HashMap` `HashSet`
//!     - `std::time::SystemTime`
//! - mopack_utils:
//!     - `hashbrown::HashMap` `hashbrown::HashSet`
//! - mopack_wire:
//!     - `Timestamp` `Bytes`
//!
//! [`Described`]: crate::info::Described

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod utils;

mod alloc;
mod core;
mod mopack_utils;
mod mopack_wire;
mod native;
mod std;

// -----------------------------------------------------------------------------
// Exports

pub use cell::{
    GenericDescriptorCell, GenericFormatterCell, GenericNameCell, NonGenericDescriptorCell,
};

pub(crate) use utils::*;

use crate::formatter::{Decode, Encode, Formatter};

/// An efficient string concatenation function.
///
/// This is usually used to build the display name of a generic type.
///
/// # Example
///
/// ```
/// use mopack_format::impls;
///
/// let s = impls::concat(&["Pair", "<", "u8", ", ", "u16", ">"]);
///
/// assert_eq!(s.capacity(), 14);
/// ```
///
/// Inline is prohibited here to reduce compilation time.
#[inline(never)]
pub fn concat(arr: &[&str]) -> ::alloc::string::String {
    let mut len = 0usize;
    for &item in arr {
        len += item.len();
    }
    let mut res = ::alloc::string::String::with_capacity(len);
    for &item in arr {
        res.push_str(item);
    }
    res
}

/// The canonical [`Formatter`] of a type that carries its own codec.
///
/// Built once per type and shared afterwards, so every descriptor hook and
/// every resolver that asks for it lands on the same instance.
pub fn native_formatter<T>() -> &'static Formatter
where
    T: Encode + Decode + Send + Sync,
{
    static CELL: GenericFormatterCell = GenericFormatterCell::new();
    CELL.get_or_insert::<T>(Formatter::of::<T>)
}
