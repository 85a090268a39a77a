use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};

// -----------------------------------------------------------------------------
// DescType

/// The identity of a described type.
///
/// Pairs the [`TypeId`] of the concrete (closed) type with a stable display
/// name. Equality and hashing go through the `TypeId` only; the name exists
/// for diagnostics and never participates in lookup.
#[derive(Clone, Copy, Debug)]
pub struct DescType {
    id: TypeId,
    name: &'static str,
}

impl DescType {
    /// Creates the identity for `T` under the given display name.
    ///
    /// Generic instantiations pass a name with the arguments rendered in
    /// (`"Vec<u32>"`), built once through
    /// [`GenericNameCell`](crate::impls::GenericNameCell).
    pub fn of<T: Any + ?Sized>(name: &'static str) -> DescType {
        DescType {
            id: TypeId::of::<T>(),
            name,
        }
    }

    #[inline]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this identity belongs to `T`.
    #[inline]
    pub fn is<T: Any + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for DescType {
    #[inline]
    fn eq(&self, other: &DescType) -> bool {
        self.id == other.id
    }
}

impl Eq for DescType {}

impl Hash for DescType {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for DescType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_the_display_name() {
        let a = DescType::of::<u32>("u32");
        let b = DescType::of::<u32>("also u32");
        let c = DescType::of::<u64>("u32");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.is::<u32>());
        assert!(!a.is::<u64>());
    }
}
