//! Seeded [`HashMap`] aliases over *hashbrown*.

use super::FixedHashState;

/// A [`hashbrown::HashMap`] with the workspace's fixed-seed hash state.
pub type HashMap<K, V, S = FixedHashState> = hashbrown::HashMap<K, V, S>;

pub use hashbrown::hash_map::{Entry, Iter, IterMut, Keys, Values, ValuesMut};
