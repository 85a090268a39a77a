use alloc::boxed::Box;
use core::any::{Any, TypeId};

use crate::info::{Described, TypeDescriptor};

// -----------------------------------------------------------------------------
// AnyPack

/// An erased serializable value.
///
/// Descriptor-interpreting formatters move values around as `dyn AnyPack`;
/// the descriptor carried by each value selects the formatter that knows how
/// to take it apart or put it back together.
///
/// Implemented for every [`Described`] type that is `Send + Sync` through a
/// blanket impl, so there is normally nothing to write by hand.
pub trait AnyPack: Any + Send + Sync {
    /// The descriptor of the underlying type.
    ///
    /// Same as [`Described::descriptor`], but reachable through a trait
    /// object.
    fn descriptor(&self) -> &'static TypeDescriptor;

    /// The [`TypeId`] of the underlying type.
    #[inline]
    fn ty_id(&self) -> TypeId {
        TypeId::of::<Self>()
    }
}

impl<T: Described + Send + Sync> AnyPack for T {
    #[inline]
    fn descriptor(&self) -> &'static TypeDescriptor {
        T::descriptor()
    }
}

impl dyn AnyPack {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline(always)]
    pub fn is<T: Any>(&self) -> bool {
        self.ty_id() == TypeId::of::<T>()
    }

    /// Downcasts the value to type `T` by reference.
    ///
    /// If the underlying value is not of type `T`, returns `None`.
    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        <dyn Any>::downcast_ref(self)
    }

    /// Downcasts the value to type `T` by mutable reference.
    ///
    /// If the underlying value is not of type `T`, returns `None`.
    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        <dyn Any>::downcast_mut(self)
    }

    /// Downcasts the value to type `T`, consuming the trait object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    #[inline]
    pub fn downcast<T: Any>(self: Box<dyn AnyPack>) -> Result<Box<T>, Box<dyn AnyPack>> {
        if self.is::<T>() {
            #[expect(unsafe_code, reason = "type is already checked")]
            Ok(unsafe { <Box<dyn Any>>::downcast::<T>(self).unwrap_unchecked() })
        } else {
            Err(self)
        }
    }

    /// Downcasts the value to type `T`, unboxing and consuming the trait
    /// object.
    ///
    /// If the underlying value is not of type `T`, returns `Err(self)`.
    #[inline]
    pub fn take<T: Any>(self: Box<dyn AnyPack>) -> Result<T, Box<dyn AnyPack>> {
        if self.is::<T>() {
            #[expect(unsafe_code, reason = "type is already checked")]
            Ok(unsafe { *<Box<dyn Any>>::downcast::<T>(self).unwrap_unchecked() })
        } else {
            Err(self)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erased_values_round_trip_through_downcast() {
        let erased: Box<dyn AnyPack> = Box::new(7_u32);

        assert!(erased.is::<u32>());
        assert_eq!(erased.descriptor().name(), "u32");
        assert_eq!(erased.downcast_ref::<u32>(), Some(&7));
        assert!(erased.downcast_ref::<u64>().is_none());

        let erased = erased.downcast::<i8>().unwrap_err();
        assert_eq!(erased.take::<u32>().ok(), Some(7));
    }
}
