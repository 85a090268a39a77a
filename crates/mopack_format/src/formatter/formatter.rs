use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use mopack_wire::{Reader, Writer};

use crate::formatter::{
    AnyPack, Decode, DecodeError, Encode, EncodeError, object, union,
};
use crate::impls::GenericFormatterCell;
use crate::info::{Described, DescriptorKind, ScalarKind, TypeDescriptor};
use crate::resolve::Resolver;

type EncodeFn = fn(&Formatter, &dyn AnyPack, &mut Writer<'_>, &Resolver) -> Result<(), EncodeError>;
type DecodeFn =
    fn(&Formatter, &mut Reader<'_>, &Resolver) -> Result<Box<dyn AnyPack>, DecodeError>;

// -----------------------------------------------------------------------------
// TypedVtable

/// The statically typed entry points of a [`Formatter`].
///
/// [`Resolver::encode_value`] and [`Resolver::decode_value`] dispatch through
/// this table when the resolved formatter carries one for the requested type,
/// skipping the erased glue entirely.
pub struct TypedVtable<T> {
    pub encode: fn(&T, &mut Writer<'_>, &Resolver) -> Result<(), EncodeError>,
    pub decode: fn(&mut Reader<'_>, &Resolver) -> Result<T, DecodeError>,
}

// -----------------------------------------------------------------------------
// Formatter

/// The codec for one closed type.
///
/// A formatter always answers through two erased entry points, and usually
/// also carries a [`TypedVtable`] so statically typed callers skip the
/// erasure. Formatters built from a descriptor alone interpret it per call
/// and have no typed table.
///
/// ```
/// use mopack_format::formatter::Formatter;
/// use mopack_format::resolve::Resolver;
/// use mopack_wire::Writer;
///
/// let resolver = Resolver::standard();
/// let formatter = Formatter::of::<u32>();
///
/// let mut out = Vec::new();
/// formatter.encode(&7_u32, &mut Writer::new(&mut out), &resolver)?;
/// assert_eq!(out, [0x07]);
/// # Ok::<(), mopack_format::formatter::EncodeError>(())
/// ```
pub struct Formatter {
    descriptor: &'static TypeDescriptor,
    encode_fn: EncodeFn,
    decode_fn: DecodeFn,
    typed: Option<&'static (dyn Any + Send + Sync)>,
}

impl Formatter {
    /// Builds the formatter that serializes `T` through its own codec traits.
    pub fn of<T>() -> Formatter
    where
        T: Encode + Decode + Send + Sync,
    {
        Self::from_fns::<T>(T::encode, T::decode)
    }

    /// Builds a formatter for `T` from a custom codec function pair.
    ///
    /// This is how member and resolver overrides are made: the functions
    /// replace `T`'s own codec wherever this formatter is picked.
    pub fn from_fns<T>(
        encode: fn(&T, &mut Writer<'_>, &Resolver) -> Result<(), EncodeError>,
        decode: fn(&mut Reader<'_>, &Resolver) -> Result<T, DecodeError>,
    ) -> Formatter
    where
        T: Described + Send + Sync,
    {
        let vtable: &'static TypedVtable<T> = Box::leak(Box::new(TypedVtable { encode, decode }));
        Formatter {
            descriptor: T::descriptor(),
            encode_fn: encode_with_vtable::<T>,
            decode_fn: decode_with_vtable::<T>,
            typed: Some(vtable),
        }
    }

    /// The descriptor of the type this formatter serves.
    #[inline]
    pub const fn descriptor(&self) -> &'static TypeDescriptor {
        self.descriptor
    }

    /// The typed entry points, when this formatter has them for `T`.
    pub fn typed<T: Any>(&self) -> Option<&'static TypedVtable<T>> {
        self.typed?.downcast_ref::<TypedVtable<T>>()
    }

    /// Encodes an erased value.
    pub fn encode(
        &self,
        value: &dyn AnyPack,
        writer: &mut Writer<'_>,
        resolver: &Resolver,
    ) -> Result<(), EncodeError> {
        (self.encode_fn)(self, value, writer, resolver)
    }

    /// Decodes an erased value.
    pub fn decode(
        &self,
        reader: &mut Reader<'_>,
        resolver: &Resolver,
    ) -> Result<Box<dyn AnyPack>, DecodeError> {
        (self.decode_fn)(self, reader, resolver)
    }
}

impl fmt::Debug for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Formatter")
            .field("descriptor", &self.descriptor.name())
            .field("typed", &self.typed.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// Typed glue

fn encode_with_vtable<T: Described + Send + Sync>(
    formatter: &Formatter,
    value: &dyn AnyPack,
    writer: &mut Writer<'_>,
    resolver: &Resolver,
) -> Result<(), EncodeError> {
    let Some(vtable) = formatter.typed::<T>() else {
        return Err(EncodeError::custom("formatter is missing its typed table"));
    };
    let Some(value) = value.downcast_ref::<T>() else {
        return Err(EncodeError::ValueType {
            expected: formatter.descriptor.name(),
            found: value.descriptor().name(),
        });
    };
    (vtable.encode)(value, writer, resolver)
}

fn decode_with_vtable<T: Described + Send + Sync>(
    formatter: &Formatter,
    reader: &mut Reader<'_>,
    resolver: &Resolver,
) -> Result<Box<dyn AnyPack>, DecodeError> {
    let Some(vtable) = formatter.typed::<T>() else {
        return Err(DecodeError::custom("formatter is missing its typed table"));
    };
    let value = (vtable.decode)(reader, resolver)?;
    Ok(Box::new(value))
}

// -----------------------------------------------------------------------------
// Interpreting formatters

/// Returns the shared descriptor-interpreting formatter for a descriptor.
///
/// Supported for object, enum and union descriptors; scalar and container
/// descriptors have no erased construction story and return `None`. The
/// instance is built on first request and cached, so repeated resolution of
/// the same descriptor always lands on the same formatter.
pub fn interpreting_formatter(
    descriptor: &'static TypeDescriptor,
) -> Option<&'static Formatter> {
    match descriptor.kind() {
        DescriptorKind::Object | DescriptorKind::Enum | DescriptorKind::Union => {}
        DescriptorKind::Scalar | DescriptorKind::Container => return None,
    }
    static CELL: GenericFormatterCell = GenericFormatterCell::new();
    Some(CELL.get_or_insert_by_type_id(descriptor.ty().id(), || interpreting(descriptor)))
}

// Kind is pre-checked by the caller.
fn interpreting(descriptor: &'static TypeDescriptor) -> Formatter {
    let (encode_fn, decode_fn): (EncodeFn, DecodeFn) = match descriptor.kind() {
        DescriptorKind::Union => (union::encode_union, union::decode_union),
        DescriptorKind::Enum => (encode_enum, decode_enum),
        _ => (object::encode_object, object::decode_object),
    };
    Formatter {
        descriptor,
        encode_fn,
        decode_fn,
        typed: None,
    }
}

fn encode_enum(
    formatter: &Formatter,
    value: &dyn AnyPack,
    writer: &mut Writer<'_>,
    _resolver: &Resolver,
) -> Result<(), EncodeError> {
    let descriptor = formatter.descriptor.as_enum().map_err(EncodeError::custom)?;
    let Some(discriminant) = descriptor.to_value(value) else {
        return Err(EncodeError::ValueType {
            expected: formatter.descriptor.name(),
            found: value.descriptor().name(),
        });
    };
    writer.write_int(discriminant);
    Ok(())
}

fn decode_enum(
    formatter: &Formatter,
    reader: &mut Reader<'_>,
    _resolver: &Resolver,
) -> Result<Box<dyn AnyPack>, DecodeError> {
    let descriptor = formatter.descriptor.as_enum().map_err(DecodeError::custom)?;

    let offset = reader.position();
    let value = reader.read_int()?;
    let (fits, expected) = match descriptor.repr() {
        ScalarKind::I8 => (i8::try_from(value).is_ok(), "i8"),
        ScalarKind::I16 => (i16::try_from(value).is_ok(), "i16"),
        ScalarKind::I32 => (i32::try_from(value).is_ok(), "i32"),
        ScalarKind::U8 => (u8::try_from(value).is_ok(), "u8"),
        ScalarKind::U16 => (u16::try_from(value).is_ok(), "u16"),
        ScalarKind::U32 => (u32::try_from(value).is_ok(), "u32"),
        ScalarKind::U64 => (value >= 0, "u64"),
        _ => (true, "i64"),
    };
    if !fits {
        return Err(mopack_wire::WireError::OutOfRange { expected, offset }.into());
    }

    match descriptor.from_value(value) {
        Some(instance) => Ok(instance),
        None => Err(DecodeError::UnknownEnumValue {
            type_name: formatter.descriptor.name(),
            value,
        }),
    }
}
