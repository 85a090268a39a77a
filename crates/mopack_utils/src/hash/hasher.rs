//! `FixedHasher` and `NoOpHasher`.
//!
//! `FixedHasher` wraps the *foldhash* fast hasher behind a fixed seed, so
//! equal inputs hash equally across runs and across compilation units.
//!
//! `NoOpHasher` passes an already well-distributed `u64` through unchanged.

use core::fmt::Debug;
use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHasher

/// The workspace-wide fixed hash seed.
const FIXED_HASH_STATE: FixedState = FixedState::with_seed(0xD1B5_4A32_D192_ED03);

/// A hasher whose output depends only on its input.
///
/// A type alias for [`foldhash::fast::FoldHasher`], created through
/// [`FixedHashState::build_hasher`].
pub type FixedHasher = FoldHasher<'static>;

/// Hash state with a random but fixed seed.
///
/// Iteration order of containers built over this state is still
/// unspecified, but the hash of a given key never changes between runs,
/// which keeps hash-derived data (key tables, cached layouts) stable.
///
/// # Examples
///
/// ```
/// use core::hash::{Hash, Hasher, BuildHasher};
/// use mopack_utils::hash::FixedHashState;
///
/// let mut a = FixedHashState.build_hasher();
/// let mut b = FixedHashState.build_hasher();
/// 3.hash(&mut a);
/// 3.hash(&mut b);
/// assert_eq!(a.finish(), b.finish());
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        FIXED_HASH_STATE.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHasher

/// A hasher that stores the written `u64` as the finished hash.
///
/// Created through [`NoOpHashState::build_hasher`].
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher {
    hash: u64,
}

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.hash
    }

    fn write(&mut self, bytes: &[u8]) {
        // `write_u64` is the intended entry point; this fallback folds the
        // bytes in reverse so `write_u32(n)` and `write_u64(n)` agree.
        for byte in bytes.iter().rev() {
            self.hash = self.hash.rotate_left(8).wrapping_add(*byte as u64);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.hash = i;
    }
}

/// Hash state for keys that already are high-quality hashes.
///
/// `TypeId` is the main customer: its bits come out of the compiler fully
/// mixed, so feeding them through another hash round buys nothing.
///
/// # Examples
///
/// ```
/// use core::hash::{Hash, Hasher, BuildHasher};
/// use mopack_utils::hash::NoOpHashState;
///
/// let mut hasher = NoOpHashState.build_hasher();
/// 3_u64.hash(&mut hasher);
/// assert_eq!(hasher.finish(), 3);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher { hash: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::hash::{Hash, Hasher};

    #[test]
    fn fixed_state_is_reproducible() {
        let hash = |value: u64| {
            let mut hasher = FixedHashState.build_hasher();
            value.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash(17), hash(17));
        assert_ne!(hash(17), hash(18));
    }

    #[test]
    fn noop_write_widths_agree() {
        let mut narrow = NoOpHashState.build_hasher();
        narrow.write_u32(1234);
        let mut wide = NoOpHashState.build_hasher();
        wide.write_u64(1234);
        assert_eq!(narrow.finish(), wide.finish());
    }
}
