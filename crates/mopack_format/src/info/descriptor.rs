use core::fmt;

use crate::formatter::Formatter;
use crate::info::{
    ContainerDescriptor, DescType, EnumDescriptor, ObjectDescriptor, ScalarDescriptor,
    UnionDescriptor,
};

// -----------------------------------------------------------------------------
// TypeDescriptor

/// Compact serialization metadata for a closed type.
///
/// Descriptors are immutable after construction and published as `'static`
/// references, typically through
/// [`NonGenericDescriptorCell`](crate::impls::NonGenericDescriptorCell) or
/// [`GenericDescriptorCell`](crate::impls::GenericDescriptorCell), so every
/// downstream consumer reads them without locking.
#[derive(Clone, Debug)]
pub enum TypeDescriptor {
    Scalar(ScalarDescriptor),
    Object(ObjectDescriptor),
    Enum(EnumDescriptor),
    Container(ContainerDescriptor),
    Union(UnionDescriptor),
}

macro_rules! impl_cast_method {
    ($name:ident : $kind:ident => $descriptor:ty) => {
        #[doc = concat!("Casts to [`", stringify!($descriptor), "`].")]
        pub fn $name(&self) -> Result<&$descriptor, DescriptorKindError> {
            match self {
                Self::$kind(descriptor) => Ok(descriptor),
                _ => Err(DescriptorKindError {
                    expected: DescriptorKind::$kind,
                    received: self.kind(),
                }),
            }
        }
    };
}

macro_rules! impl_is_method {
    ($name:ident : $kind:ident) => {
        #[doc = concat!(
            "Whether this descriptor is [`TypeDescriptor::",
            stringify!($kind),
            "`]."
        )]
        #[inline]
        pub fn $name(&self) -> bool {
            matches!(self, Self::$kind(_))
        }
    };
}

impl TypeDescriptor {
    /// The identity of the described type.
    pub const fn ty(&self) -> &DescType {
        match self {
            TypeDescriptor::Scalar(descriptor) => descriptor.ty(),
            TypeDescriptor::Object(descriptor) => descriptor.ty(),
            TypeDescriptor::Enum(descriptor) => descriptor.ty(),
            TypeDescriptor::Container(descriptor) => descriptor.ty(),
            TypeDescriptor::Union(descriptor) => descriptor.ty(),
        }
    }

    /// The display name of the described type.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.ty().name()
    }

    pub const fn kind(&self) -> DescriptorKind {
        match self {
            TypeDescriptor::Scalar(_) => DescriptorKind::Scalar,
            TypeDescriptor::Object(_) => DescriptorKind::Object,
            TypeDescriptor::Enum(_) => DescriptorKind::Enum,
            TypeDescriptor::Container(_) => DescriptorKind::Container,
            TypeDescriptor::Union(_) => DescriptorKind::Union,
        }
    }

    /// The hook returning the canonical formatter for the described type, if
    /// one was registered at descriptor construction.
    ///
    /// When present, resolving through the descriptor and resolving through
    /// the typed API reach the same formatter instance.
    pub const fn native_formatter(&self) -> Option<fn() -> &'static Formatter> {
        match self {
            TypeDescriptor::Scalar(descriptor) => descriptor.native_formatter(),
            TypeDescriptor::Object(descriptor) => descriptor.native_formatter(),
            TypeDescriptor::Enum(descriptor) => descriptor.native_formatter(),
            TypeDescriptor::Container(descriptor) => descriptor.native_formatter(),
            TypeDescriptor::Union(descriptor) => descriptor.native_formatter(),
        }
    }

    impl_cast_method!(as_scalar: Scalar => ScalarDescriptor);
    impl_cast_method!(as_object: Object => ObjectDescriptor);
    impl_cast_method!(as_enum: Enum => EnumDescriptor);
    impl_cast_method!(as_container: Container => ContainerDescriptor);
    impl_cast_method!(as_union: Union => UnionDescriptor);

    impl_is_method!(is_scalar: Scalar);
    impl_is_method!(is_object: Object);
    impl_is_method!(is_enum: Enum);
    impl_is_method!(is_container: Container);
    impl_is_method!(is_union: Union);
}

// -----------------------------------------------------------------------------
// DescriptorKind

/// The kind of a [`TypeDescriptor`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DescriptorKind {
    Scalar,
    Object,
    Enum,
    Container,
    Union,
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DescriptorKind::Scalar => "scalar",
            DescriptorKind::Object => "object",
            DescriptorKind::Enum => "enum",
            DescriptorKind::Container => "container",
            DescriptorKind::Union => "union",
        };
        f.pad(name)
    }
}

/// A kind cast found a different kind than the caller expected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DescriptorKindError {
    pub expected: DescriptorKind,
    pub received: DescriptorKind,
}

impl fmt::Display for DescriptorKindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "kind mismatch: expected {}, received {}",
            self.expected, self.received
        )
    }
}

impl core::error::Error for DescriptorKindError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::Described;

    #[test]
    fn casts_report_the_received_kind() {
        let descriptor = u32::descriptor();
        assert!(descriptor.is_scalar());
        assert_eq!(descriptor.kind(), DescriptorKind::Scalar);

        let error = descriptor.as_object().unwrap_err();
        assert_eq!(error.expected, DescriptorKind::Object);
        assert_eq!(error.received, DescriptorKind::Scalar);
        assert_eq!(
            error.to_string(),
            "kind mismatch: expected object, received scalar"
        );
    }
}
