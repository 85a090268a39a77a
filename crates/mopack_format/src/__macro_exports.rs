//! Exports for generated code. Not public API.
//!
//! The derive macro emits fully qualified paths through this module so its
//! output works from any crate, whatever that crate's own imports look like.

pub use alloc;

pub use mopack_wire as wire;

crate::cfg::auto_register! {
    /// Support for `#[pack(auto_register)]`.
    pub mod auto_register {
        pub use inventory;

        use crate::resolve::ResolverBuilder;

        /// A registration hook collected across the final binary.
        pub struct __AutoRegisterFunc(pub fn(&mut ResolverBuilder));

        inventory::collect!(__AutoRegisterFunc);

        /// Implemented by the derive for `#[pack(auto_register)]` types.
        pub trait __RegisterType {
            fn __register(builder: &mut ResolverBuilder);
        }

        /// Runs every collected registration hook against `builder`.
        pub fn __register_types(builder: &mut ResolverBuilder) {
            for entry in inventory::iter::<__AutoRegisterFunc> {
                (entry.0)(builder);
            }
        }

        // Sentinel distinguishing "no registered types" from "collection is
        // unsupported on this platform": the sweep finds it iff `inventory`
        // works here at all.
        inventory::submit! { __AutoRegisterFunc(__mark_available) }

        fn __mark_available(builder: &mut ResolverBuilder) {
            builder.mark_auto_register_available();
        }
    }
}
