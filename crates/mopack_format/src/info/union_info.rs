use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use crate::formatter::{AnyPack, Formatter};
use crate::info::{ConstructError, DescType, TypeDescriptor};

// -----------------------------------------------------------------------------
// KeyTable

/// Maps a wire key to an arm index.
///
/// Compact key spaces collapse into a direct-index table; sparse ones fall
/// back to binary search over sorted pairs.
#[derive(Clone, Debug)]
enum KeyTable {
    Dense(Box<[Option<u16>]>),
    Sparse(Box<[(u32, u16)]>),
}

impl KeyTable {
    fn build(pairs: &[(u32, u16)]) -> KeyTable {
        let max = pairs.iter().map(|&(key, _)| key).max().unwrap_or(0);
        let dense_len = max as usize + 1;
        if !pairs.is_empty() && dense_len <= pairs.len().saturating_mul(2).max(16) {
            let mut slots: Vec<Option<u16>> = alloc::vec![None; dense_len];
            for &(key, index) in pairs {
                let slot = &mut slots[key as usize];
                if slot.is_none() {
                    *slot = Some(index);
                }
            }
            KeyTable::Dense(slots.into_boxed_slice())
        } else {
            let mut sorted: Vec<(u32, u16)> = pairs.to_vec();
            sorted.sort_by_key(|&(key, _)| key);
            sorted.dedup_by_key(|&mut (key, _)| key);
            KeyTable::Sparse(sorted.into_boxed_slice())
        }
    }

    fn get(&self, key: u32) -> Option<u16> {
        match self {
            KeyTable::Dense(slots) => slots.get(key as usize).copied().flatten(),
            KeyTable::Sparse(pairs) => {
                let index = pairs.binary_search_by_key(&key, |&(key, _)| key).ok()?;
                Some(pairs[index].1)
            }
        }
    }
}

// -----------------------------------------------------------------------------
// UnionArm

/// One alternative of a union.
#[derive(Clone, Copy, Debug)]
pub struct UnionArm {
    key: u32,
    name: &'static str,
    ty: Option<fn() -> &'static TypeDescriptor>,
}

impl UnionArm {
    /// An arm carrying a payload of the given type.
    pub const fn new(key: u32, name: &'static str, ty: fn() -> &'static TypeDescriptor) -> Self {
        UnionArm {
            key,
            name,
            ty: Some(ty),
        }
    }

    /// An arm with no payload; its wire payload slot holds nil.
    pub const fn unit(key: u32, name: &'static str) -> Self {
        UnionArm { key, name, ty: None }
    }

    #[inline]
    pub const fn key(&self) -> u32 {
        self.key
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The payload descriptor, or `None` for unit arms.
    pub fn descriptor(&self) -> Option<&'static TypeDescriptor> {
        self.ty.map(|ty| ty())
    }
}

impl fmt::Display for UnionArm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.key)
    }
}

// -----------------------------------------------------------------------------
// UnionAccess

/// Erased selection and assembly for descriptor-interpreting union codecs.
#[derive(Clone, Copy)]
pub struct UnionAccess {
    /// Identifies the active arm of an instance and borrows its payload.
    /// `None` when the instance is not of the described union type.
    pub select: fn(&dyn AnyPack) -> Option<(usize, Option<&dyn AnyPack>)>,
    /// Builds an instance from an arm index and its decoded payload.
    pub assemble: fn(usize, Option<Box<dyn AnyPack>>) -> Result<Box<dyn AnyPack>, ConstructError>,
}

impl fmt::Debug for UnionAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("UnionAccess")
    }
}

// -----------------------------------------------------------------------------
// UnionDescriptor

/// A closed set of keyed alternatives, encoded as a `[key, payload]` pair.
#[derive(Clone, Debug)]
pub struct UnionDescriptor {
    ty: DescType,
    arms: Box<[UnionArm]>,
    table: KeyTable,
    fallback: Option<usize>,
    access: UnionAccess,
    formatter: Option<fn() -> &'static Formatter>,
}

impl UnionDescriptor {
    /// Creates the descriptor for `T` with the given arms.
    ///
    /// Duplicate arm keys are not rejected here; the graph collector reports
    /// them. Lookup resolves a duplicated key to its first declaration.
    pub fn new<T: Any>(name: &'static str, arms: &[UnionArm], access: UnionAccess) -> Self {
        let pairs: Vec<(u32, u16)> = arms
            .iter()
            .enumerate()
            .map(|(index, arm)| (arm.key(), index as u16))
            .collect();
        UnionDescriptor {
            ty: DescType::of::<T>(name),
            arms: arms.into(),
            table: KeyTable::build(&pairs),
            fallback: None,
            access,
            formatter: None,
        }
    }

    /// Designates the arm decoded in place of an unknown key. The arm must be
    /// a unit arm; the unknown payload is skipped, not captured.
    pub fn with_fallback(mut self, arm_index: usize) -> Self {
        self.fallback = Some(arm_index);
        self
    }

    /// Sets the hook returning the canonical formatter for the described type.
    pub fn with_formatter(mut self, formatter: fn() -> &'static Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    #[inline]
    pub const fn ty(&self) -> &DescType {
        &self.ty
    }

    #[inline]
    pub fn arms(&self) -> &[UnionArm] {
        &self.arms
    }

    #[inline]
    pub fn arm(&self, index: usize) -> Option<&UnionArm> {
        self.arms.get(index)
    }

    /// Resolves a wire key to its arm index.
    pub fn arm_index_for_key(&self, key: u32) -> Option<usize> {
        self.table.get(key).map(usize::from)
    }

    /// Whether unknown keys decode into a designated fallback arm instead of
    /// failing.
    #[inline]
    pub const fn tolerant(&self) -> bool {
        self.fallback.is_some()
    }

    #[inline]
    pub const fn fallback(&self) -> Option<usize> {
        self.fallback
    }

    #[inline]
    pub const fn access(&self) -> &UnionAccess {
        &self.access
    }

    #[inline]
    pub const fn native_formatter(&self) -> Option<fn() -> &'static Formatter> {
        self.formatter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_table_indexes_directly() {
        let table = KeyTable::build(&[(0, 0), (1, 1), (3, 2)]);
        assert!(matches!(table, KeyTable::Dense(_)));
        assert_eq!(table.get(0), Some(0));
        assert_eq!(table.get(3), Some(2));
        assert_eq!(table.get(2), None);
    }

    #[test]
    fn sparse_table_searches_sorted_pairs() {
        let table = KeyTable::build(&[(7, 0), (100_000, 1), (42, 2)]);
        assert!(matches!(table, KeyTable::Sparse(_)));
        assert_eq!(table.get(42), Some(2));
        assert_eq!(table.get(100_000), Some(1));
        assert_eq!(table.get(41), None);
    }

    #[test]
    fn duplicate_keys_resolve_to_the_first_declaration() {
        let table = KeyTable::build(&[(1, 0), (1, 1)]);
        assert_eq!(table.get(1), Some(0));
    }
}
