//! Seeded [`HashSet`] aliases over *hashbrown*.

use super::FixedHashState;

/// A [`hashbrown::HashSet`] with the workspace's fixed-seed hash state.
pub type HashSet<T, S = FixedHashState> = hashbrown::HashSet<T, S>;

pub use hashbrown::hash_set::{Difference, Intersection, Iter, Union};
