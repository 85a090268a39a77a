#![doc = include_str!("../README.md")]
#![no_std]

/// Defines one alias macro per listed `cfg` predicate.
///
/// Each alias accepts a plain token block, emitted only when its predicate
/// is active, and an `if { .. } else { .. }` form that swaps between the
/// two blocks depending on the predicate:
///
/// ```
/// pub mod cfg {
///     mopack_cfg::define_alias! {
///         #[cfg(target_pointer_width = "64")] => wide,
///         #[cfg(all(test, debug_assertions))] => checked,
///     }
/// }
///
/// const LANES: usize = cfg::wide! { if { 4 } else { 2 } };
/// ```
///
/// The generated macros are plain items of the enclosing module, so a crate
/// that defines them inside `pub mod cfg` calls them as `crate::cfg::name!`.
///
/// The predicate is evaluated in the crate that *invokes* `define_alias!`,
/// which is what makes feature aliases (`#[cfg(feature = "..")] => std`)
/// refer to that crate's own feature set.
#[macro_export]
macro_rules! define_alias {
    ($( #[cfg($($cfg:tt)*)] => $(#[$meta:meta])* $alias:ident ),* $(,)?) => {
        $(
            $crate::define_alias! {
                @dollar [$]
                #[cfg($($cfg)*)] => $(#[$meta])* $alias
            }
        )*
    };

    (@dollar [$d:tt] #[cfg($($cfg:tt)*)] => $(#[$meta:meta])* $alias:ident) => {
        #[cfg($($cfg)*)]
        $(#[$meta])*
        #[doc = concat!("Emits the wrapped tokens when `", stringify!($($cfg)*), "` holds.")]
        #[doc = ""]
        #[doc = "With this build configuration the plain form expands to its"]
        #[doc = "contents and the `if`/`else` form expands to the first block."]
        #[doc(hidden)]
        #[macro_export]
        macro_rules! $alias {
            (if { $d($d enabled:tt)* } else { $d($d disabled:tt)* }) => {
                $d($d enabled)*
            };
            ($d($d tokens:tt)*) => {
                $d($d tokens)*
            };
        }

        #[cfg(not($($cfg)*))]
        $(#[$meta])*
        #[doc = concat!("Emits the wrapped tokens when `", stringify!($($cfg)*), "` holds.")]
        #[doc = ""]
        #[doc = "With this build configuration the plain form expands to nothing"]
        #[doc = "and the `if`/`else` form expands to the second block."]
        #[doc(hidden)]
        #[macro_export]
        macro_rules! $alias {
            (if { $d($d enabled:tt)* } else { $d($d disabled:tt)* }) => {
                $d($d disabled)*
            };
            ($d($d tokens:tt)*) => {};
        }

        #[doc(inline)]
        pub use $alias;
    };
}

#[cfg(test)]
mod tests {
    mod cfg {
        crate::define_alias! {
            #[cfg(test)] => enabled,
            #[cfg(not(test))] => disabled,
        }
    }

    #[test]
    fn plain_form_follows_predicate() {
        let mut hits = 0;
        cfg::enabled! {
            hits += 1;
        }
        cfg::disabled! {
            hits += 10;
        }
        assert_eq!(hits, 1);
    }

    #[test]
    fn switch_form_picks_the_matching_block() {
        let on = cfg::enabled! { if { true } else { false } };
        let off = cfg::disabled! { if { true } else { false } };
        assert!(on);
        assert!(!off);
    }

    #[test]
    fn aliases_work_in_item_position() {
        cfg::enabled! {
            fn answer() -> u32 {
                42
            }
        }
        assert_eq!(answer(), 42);
    }
}
