//! Containers for static storage of descriptors and formatters.
//!
//! These back the usual implementation pattern of
//! [`Described`](crate::info::Described): a `static CELL` inside the method,
//! filled on first call and shared afterwards.
//!
//! ## NonGenericCell
//!
//! For non-generic types. Internally an [`OnceLock<T>`], almost no
//! additional expense.
//!
//! ## GenericCell
//!
//! If the type is generic, the `static CELL` inside the method is shared by
//! every instantiation, so the container keys its entries by [`TypeId`]
//! behind an [`RwLock`].
//!
//! ## Examples
//!
//! See [`NonGenericDescriptorCell`], [`GenericDescriptorCell`] and
//! [`GenericNameCell`].

use alloc::boxed::Box;
use alloc::string::String;
use core::any::{Any, TypeId};
use std::sync::{OnceLock, PoisonError, RwLock};

use mopack_utils::TypeIdMap;

use crate::formatter::Formatter;
use crate::info::TypeDescriptor;

mod sealed {
    use alloc::string::String;

    use crate::formatter::Formatter;
    use crate::info::TypeDescriptor;

    pub trait CellProperty: 'static {}

    impl CellProperty for String {}
    impl CellProperty for TypeDescriptor {}
    impl CellProperty for Formatter {}
}

use sealed::CellProperty;

/// Container for static storage of non-generic type data.
///
/// Internally an [`OnceLock<T>`], almost no additional expense.
///
/// There is no `NonGenericNameCell` because a static string literal already
/// covers non-generic names.
pub struct NonGenericCell<T: CellProperty>(OnceLock<T>);

/// Stores the [`TypeDescriptor`] of a non-generic type.
///
/// ## Example
///
/// ```
/// use mopack_format::impls::NonGenericDescriptorCell;
/// use mopack_format::info::{Described, ScalarDescriptor, ScalarKind, TypeDescriptor};
///
/// struct Celsius(f32);
///
/// impl Described for Celsius {
///     fn descriptor() -> &'static TypeDescriptor {
///         static CELL: NonGenericDescriptorCell = NonGenericDescriptorCell::new();
///         CELL.get_or_init(|| {
///             TypeDescriptor::Scalar(ScalarDescriptor::new::<Celsius>("Celsius", ScalarKind::F32))
///         })
///     }
/// }
///
/// assert!(Celsius::descriptor().is_scalar());
/// ```
pub type NonGenericDescriptorCell = NonGenericCell<TypeDescriptor>;

impl<T: CellProperty> NonGenericCell<T> {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Returns a reference to the stored value, filling the cell from the
    /// given function if it is still empty.
    #[inline]
    pub fn get_or_init<F>(&self, f: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.0.get_or_init(f)
    }
}

/// Container for static storage of type data with generics.
///
/// The `static CELL` in a generic method is shared by every instantiation,
/// so the interior is a [`TypeIdMap`] wrapped in an [`RwLock`]. Values are
/// leaked on first insert and live for the rest of the program.
pub struct GenericCell<T: CellProperty>(RwLock<TypeIdMap<&'static T>>);

/// Stores one [`TypeDescriptor`] per instantiation of a generic type.
///
/// ## Example
///
/// ```
/// use mopack_format::impls::GenericDescriptorCell;
/// use mopack_format::info::{
///     ContainerDescriptor, ContainerShape, Described, TypeDescriptor,
/// };
///
/// struct Pair<T>(T, T);
///
/// impl<T: Described> Described for Pair<T> {
///     fn descriptor() -> &'static TypeDescriptor {
///         static CELL: GenericDescriptorCell = GenericDescriptorCell::new();
///         CELL.get_or_insert::<Self>(|| {
///             TypeDescriptor::Container(ContainerDescriptor::new::<Self>(
///                 "Pair",
///                 ContainerShape::FixedArray(2),
///                 &[T::descriptor],
///             ))
///         })
///     }
/// }
///
/// assert!(<Pair<u8>>::descriptor().is_container());
/// assert!(!core::ptr::eq(
///     <Pair<u8>>::descriptor(),
///     <Pair<u16>>::descriptor(),
/// ));
/// ```
pub type GenericDescriptorCell = GenericCell<TypeDescriptor>;

/// Stores one rendered display name per instantiation of a generic type.
///
/// ## Example
///
/// ```
/// use mopack_format::impls::{self, GenericNameCell};
///
/// struct Wrap<T>(T);
///
/// fn name_of<T: 'static>(inner: &'static str) -> &'static str {
///     static CELL: GenericNameCell = GenericNameCell::new();
///     CELL.get_or_insert::<Wrap<T>>(|| impls::concat(&["Wrap<", inner, ">"]))
/// }
///
/// assert_eq!(name_of::<u8>("u8"), "Wrap<u8>");
/// assert_eq!(name_of::<u8>("ignored on the second call"), "Wrap<u8>");
/// ```
pub type GenericNameCell = GenericCell<String>;

/// Stores one canonical [`Formatter`] per instantiation of a type.
///
/// [`native_formatter`](crate::impls::native_formatter) keeps all of these in
/// a single shared cell, which is what makes the typed and the
/// descriptor-driven resolution paths land on the same instance.
pub type GenericFormatterCell = GenericCell<Formatter>;

impl<T: CellProperty> GenericCell<T> {
    /// Creates an empty cell.
    #[inline]
    pub const fn new() -> Self {
        Self(RwLock::new(TypeIdMap::new()))
    }

    /// Returns the value stored for type `G`, inserting the result of `f`
    /// first if `G` has no entry yet.
    #[inline(always)]
    pub fn get_or_insert<G: Any + ?Sized>(&self, f: impl FnOnce() -> T) -> &'static T {
        // Separate to reduce code compilation times
        self.get_or_insert_by_type_id(TypeId::of::<G>(), f)
    }

    // Separate to reduce code compilation times
    #[inline(never)]
    pub(crate) fn get_or_insert_by_type_id(&self, type_id: TypeId, f: impl FnOnce() -> T) -> &'static T {
        match self.get_by_type_id(type_id) {
            Some(value) => value,
            None => self.insert_by_type_id(type_id, f()),
        }
    }

    // Separate to reduce code compilation times
    #[inline(never)]
    fn get_by_type_id(&self, type_id: TypeId) -> Option<&'static T> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .copied()
    }

    // Separate to reduce code compilation times
    #[inline(never)]
    fn insert_by_type_id(&self, type_id: TypeId, value: T) -> &'static T {
        *self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_or_insert(type_id, || Box::leak(Box::new(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_cell_runs_the_initializer_once_per_type() {
        let cell: GenericCell<String> = GenericCell::new();

        let first = cell.get_or_insert::<u32>(|| String::from("first"));
        let again = cell.get_or_insert::<u32>(|| String::from("second"));
        let other = cell.get_or_insert::<u64>(|| String::from("third"));

        assert_eq!(first, "first");
        assert!(core::ptr::eq(first, again));
        assert_eq!(other, "third");
    }
}
