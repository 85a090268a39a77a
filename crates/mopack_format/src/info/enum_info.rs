use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::formatter::{AnyPack, Formatter};
use crate::info::{DescType, ScalarKind};

// -----------------------------------------------------------------------------
// EnumVariant

/// One unit variant of a closed enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnumVariant {
    name: &'static str,
    value: i64,
}

impl EnumVariant {
    pub const fn new(name: &'static str, value: i64) -> Self {
        EnumVariant { name, value }
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The underlying discriminant, widened to `i64`.
    #[inline]
    pub const fn value(&self) -> i64 {
        self.value
    }
}

// -----------------------------------------------------------------------------
// EnumDescriptor

/// A unit-variant enum, encoded as its underlying integer value.
///
/// Unknown wire values are a decode error. Enums with payload-carrying
/// variants are modeled as unions instead.
#[derive(Clone, Debug)]
pub struct EnumDescriptor {
    ty: DescType,
    repr: ScalarKind,
    variants: Box<[EnumVariant]>,
    to_value: fn(&dyn AnyPack) -> Option<i64>,
    from_value: fn(i64) -> Option<Box<dyn AnyPack>>,
    formatter: Option<fn() -> &'static Formatter>,
}

impl EnumDescriptor {
    pub fn new<T: Any>(
        name: &'static str,
        repr: ScalarKind,
        variants: &[EnumVariant],
        to_value: fn(&dyn AnyPack) -> Option<i64>,
        from_value: fn(i64) -> Option<Box<dyn AnyPack>>,
    ) -> Self {
        EnumDescriptor {
            ty: DescType::of::<T>(name),
            repr,
            variants: variants.into(),
            to_value,
            from_value,
            formatter: None,
        }
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

    /// The declared representation width, used to range-check decoded values.
    #[inline]
    pub const fn repr(&self) -> ScalarKind {
        self.repr
    }

    #[inline]
    pub fn variants(&self) -> &[EnumVariant] {
        &self.variants
    }

    pub fn variant_for_value(&self, value: i64) -> Option<&EnumVariant> {
        self.variants.iter().find(|variant| variant.value() == value)
    }

    /// Reads the discriminant out of an erased instance. `None` when the
    /// instance is not of the described type.
    pub fn to_value(&self, value: &dyn AnyPack) -> Option<i64> {
        (self.to_value)(value)
    }

    /// Builds an instance from a discriminant. `None` for unknown values.
    pub fn from_value(&self, value: i64) -> Option<Box<dyn AnyPack>> {
        (self.from_value)(value)
    }

    #[inline]
    pub const fn native_formatter(&self) -> Option<fn() -> &'static Formatter> {
        self.formatter
    }
}

impl fmt::Display for EnumVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.value)
    }
}
