#![doc = include_str!("../README.md")]

// -----------------------------------------------------------------------------
// Compilation config

/// Some macros used for compilation control.
pub mod cfg {
    mopack_cfg::define_alias! {
        #[cfg(feature = "auto_register")] => auto_register,
        #[cfg(all(debug_assertions, feature = "debug"))] => debug,
    }
}

// -----------------------------------------------------------------------------
// Extern Self

// Usually, we need to use `crate` in the crate itself and use `mopack_format`
// in doc testing. But `macro_utils::Manifest` can only choose one, so we must
// have an `extern self` to ensure `mopack_format` can be used as an alias for
// `crate`.
extern crate self as mopack_format;

pub extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod collect;
pub mod formatter;
pub mod impls;
pub mod info;
pub mod resolve;

#[cfg(test)]
mod tests;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use formatter::{Decode, Encode};
pub use info::Described;
pub use resolve::{deserialize, serialize};
pub use mopack_format_derive as derive;
