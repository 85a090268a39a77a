use alloc::format;
use alloc::string::ToString;
use alloc::vec::Vec;

use mopack_wire::{Reader, Writer};

use crate::formatter::{Decode, DecodeError, Encode, EncodeError};
use crate::impls::{GenericDescriptorCell, GenericNameCell, concat, native_formatter};
use crate::info::{ContainerDescriptor, ContainerShape, Described, TypeDescriptor};
use crate::resolve::Resolver;

impl<T, const N: usize> Described for [T; N]
where
    T: Encode + Decode + Send + Sync,
{
    fn descriptor() -> &'static TypeDescriptor {
        static NAME: GenericNameCell = GenericNameCell::new();
        static CELL: GenericDescriptorCell = GenericDescriptorCell::new();
        CELL.get_or_insert::<Self>(|| {
            let name = NAME.get_or_insert::<Self>(|| {
                concat(&["[", T::descriptor().name(), "; ", &N.to_string(), "]"])
            });
            TypeDescriptor::Container(
                ContainerDescriptor::new::<Self>(
                    name.as_str(),
                    ContainerShape::FixedArray(N),
                    &[T::descriptor],
                )
                .with_formatter(native_formatter::<Self>),
            )
        })
    }
}

impl<T, const N: usize> Encode for [T; N]
where
    T: Encode + Decode + Send + Sync,
{
    fn encode(&self, writer: &mut Writer<'_>, resolver: &Resolver) -> Result<(), EncodeError> {
        writer.write_array_header(N)?;
        for item in self {
            resolver.encode_value(item, writer)?;
        }
        Ok(())
    }
}

impl<T, const N: usize> Decode for [T; N]
where
    T: Encode + Decode + Send + Sync,
{
    fn decode(reader: &mut Reader<'_>, resolver: &Resolver) -> Result<[T; N], DecodeError> {
        let len = reader.read_array_len()?;
        if len != N {
            return Err(DecodeError::custom(format!(
                "expected an array of {N} items, found {len}"
            )));
        }
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(resolver.decode_value::<T>(reader)?);
        }
        <[T; N]>::try_from(items)
            .map_err(|_| DecodeError::custom("array length changed during collection"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve;

    #[test]
    fn arrays_carry_their_length_in_the_name() {
        assert_eq!(<[u8; 4]>::descriptor().name(), "[u8; 4]");
    }

    #[test]
    fn length_mismatches_are_rejected() {
        let resolver = resolve::Resolver::standard();
        let bytes = resolve::serialize(&[1_u8, 2, 3], &resolver).unwrap();
        let err = resolve::deserialize::<[u8; 4]>(&bytes, &resolver).unwrap_err();
        assert!(matches!(err, DecodeError::Message(_)));
    }
}
