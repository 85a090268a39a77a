//! Codecs for tuples with a field count of 8 or less.
//!
//! A tuple encodes as a fixed-arity array; every position keeps its own
//! item type. The empty tuple is a scalar and lives in `native_basic`.

use mopack_utils::range_invoke;

use mopack_wire::{Reader, Writer};

use crate::formatter::{Decode, DecodeError, Encode, EncodeError};
use crate::impls::{GenericDescriptorCell, GenericNameCell, concat, native_formatter};
use crate::info::{ContainerDescriptor, ContainerShape, Described, TypeDescriptor};
use crate::resolve::Resolver;

macro_rules! impl_tuple_codec {
    (0: []) => {};
    (1: [0: $zero:ident]) => {
        impl<$zero> Described for ($zero,)
        where
            $zero: Encode + Decode + Send + Sync,
        {
            fn descriptor() -> &'static TypeDescriptor {
                static NAME: GenericNameCell = GenericNameCell::new();
                static CELL: GenericDescriptorCell = GenericDescriptorCell::new();
                CELL.get_or_insert::<Self>(|| {
                    let name = NAME.get_or_insert::<Self>(|| {
                        concat(&["(", $zero::descriptor().name(), ",)"])
                    });
                    TypeDescriptor::Container(
                        ContainerDescriptor::new::<Self>(
                            name.as_str(),
                            ContainerShape::Tuple,
                            &[$zero::descriptor],
                        )
                        .with_formatter(native_formatter::<Self>),
                    )
                })
            }
        }

        impl<$zero> Encode for ($zero,)
        where
            $zero: Encode + Decode + Send + Sync,
        {
            fn encode(
                &self,
                writer: &mut Writer<'_>,
                resolver: &Resolver,
            ) -> Result<(), EncodeError> {
                writer.write_array_header(1)?;
                resolver.encode_value(&self.0, writer)
            }
        }

        impl<$zero> Decode for ($zero,)
        where
            $zero: Encode + Decode + Send + Sync,
        {
            fn decode(reader: &mut Reader<'_>, resolver: &Resolver) -> Result<Self, DecodeError> {
                let len = reader.read_array_len()?;
                if len != 1 {
                    return Err(DecodeError::custom(::alloc::format!(
                        "expected a tuple of 1 item, found {len}"
                    )));
                }
                Ok((resolver.decode_value::<$zero>(reader)?,))
            }
        }
    };
    ($num:literal: [0: $zero:ident, $($index:tt: $name:ident),*]) => {
        impl<$zero, $($name),*> Described for ($zero, $($name),*)
        where
            $zero: Encode + Decode + Send + Sync,
            $($name: Encode + Decode + Send + Sync,)*
        {
            fn descriptor() -> &'static TypeDescriptor {
                static NAME: GenericNameCell = GenericNameCell::new();
                static CELL: GenericDescriptorCell = GenericDescriptorCell::new();
                CELL.get_or_insert::<Self>(|| {
                    let name = NAME.get_or_insert::<Self>(|| {
                        concat(&[
                            "(",
                            $zero::descriptor().name()
                            $(, ", ", $name::descriptor().name())*,
                            ")",
                        ])
                    });
                    TypeDescriptor::Container(
                        ContainerDescriptor::new::<Self>(
                            name.as_str(),
                            ContainerShape::Tuple,
                            &[$zero::descriptor, $($name::descriptor),*],
                        )
                        .with_formatter(native_formatter::<Self>),
                    )
                })
            }
        }

        impl<$zero, $($name),*> Encode for ($zero, $($name),*)
        where
            $zero: Encode + Decode + Send + Sync,
            $($name: Encode + Decode + Send + Sync,)*
        {
            fn encode(
                &self,
                writer: &mut Writer<'_>,
                resolver: &Resolver,
            ) -> Result<(), EncodeError> {
                writer.write_array_header($num)?;
                resolver.encode_value(&self.0, writer)?;
                $(resolver.encode_value(&self.$index, writer)?;)*
                Ok(())
            }
        }

        impl<$zero, $($name),*> Decode for ($zero, $($name),*)
        where
            $zero: Encode + Decode + Send + Sync,
            $($name: Encode + Decode + Send + Sync,)*
        {
            fn decode(reader: &mut Reader<'_>, resolver: &Resolver) -> Result<Self, DecodeError> {
                let len = reader.read_array_len()?;
                if len != $num {
                    return Err(DecodeError::custom(::alloc::format!(
                        "expected a tuple of {} items, found {len}",
                        $num,
                    )));
                }
                Ok((
                    resolver.decode_value::<$zero>(reader)?,
                    $(resolver.decode_value::<$name>(reader)?,)*
                ))
            }
        }
    };
}

range_invoke!(impl_tuple_codec, 8: P);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve;

    #[test]
    fn tuple_names_list_every_position() {
        assert_eq!(<(u8, bool)>::descriptor().name(), "(u8, bool)");
        assert_eq!(<(u8,)>::descriptor().name(), "(u8,)");
    }

    #[test]
    fn tuples_round_trip_positionally() {
        let resolver = resolve::Resolver::standard();
        let bytes = resolve::serialize(&(1_u8, true, 2_u16), &resolver).unwrap();
        assert_eq!(bytes, [0x93, 0x01, 0xC3, 0x02]);

        let back: (u8, bool, u16) = resolve::deserialize(&bytes, &resolver).unwrap();
        assert_eq!(back, (1, true, 2));
    }

    #[test]
    fn arity_mismatches_are_rejected() {
        let resolver = resolve::Resolver::standard();
        let bytes = resolve::serialize(&(1_u8, 2_u8), &resolver).unwrap();
        let err = resolve::deserialize::<(u8, u8, u8)>(&bytes, &resolver).unwrap_err();
        assert!(matches!(err, DecodeError::Message(_)));
    }
}
