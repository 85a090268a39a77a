use alloc::vec::Vec;

use mopack_wire::{Reader, Writer};

use crate::formatter::{Decode, DecodeError, Encode, EncodeError};
use crate::impls::{GenericDescriptorCell, GenericNameCell, concat, native_formatter};
use crate::info::{ContainerDescriptor, ContainerShape, Described, TypeDescriptor};
use crate::resolve::Resolver;

impl<T> Described for Vec<T>
where
    T: Encode + Decode + Send + Sync,
{
    fn descriptor() -> &'static TypeDescriptor {
        static NAME: GenericNameCell = GenericNameCell::new();
        static CELL: GenericDescriptorCell = GenericDescriptorCell::new();
        CELL.get_or_insert::<Self>(|| {
            let name =
                NAME.get_or_insert::<Self>(|| concat(&["Vec<", T::descriptor().name(), ">"]));
            TypeDescriptor::Container(
                ContainerDescriptor::new::<Self>(
                    name.as_str(),
                    ContainerShape::List,
                    &[T::descriptor],
                )
                .with_formatter(native_formatter::<Self>),
            )
        })
    }
}

impl<T> Encode for Vec<T>
where
    T: Encode + Decode + Send + Sync,
{
    fn encode(&self, writer: &mut Writer<'_>, resolver: &Resolver) -> Result<(), EncodeError> {
        writer.write_array_header(self.len())?;
        for item in self {
            resolver.encode_value(item, writer)?;
        }
        Ok(())
    }
}

impl<T> Decode for Vec<T>
where
    T: Encode + Decode + Send + Sync,
{
    fn decode(reader: &mut Reader<'_>, resolver: &Resolver) -> Result<Vec<T>, DecodeError> {
        let len = reader.read_array_len()?;
        // A length claim cannot exceed the bytes backing it.
        let mut items = Vec::with_capacity(len.min(reader.remaining()));
        for _ in 0..len {
            items.push(resolver.decode_value::<T>(reader)?);
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec;

    use super::*;
    use crate::resolve;

    #[test]
    fn lists_round_trip_in_order() {
        let resolver = resolve::Resolver::standard();
        let values = vec![String::from("a"), String::from("bc")];
        let bytes = resolve::serialize(&values, &resolver).unwrap();
        assert_eq!(bytes, [0x92, 0xA1, b'a', 0xA2, b'b', b'c']);

        let back: Vec<String> = resolve::deserialize(&bytes, &resolver).unwrap();
        assert_eq!(back, values);
    }

    #[test]
    fn oversized_length_claims_fail_without_allocating() {
        let resolver = resolve::Resolver::standard();
        // Claims 65536 items backed by nothing.
        let bytes = [0xDD, 0x00, 0x01, 0x00, 0x00];
        let err = resolve::deserialize::<Vec<u8>>(&bytes, &resolver).unwrap_err();
        assert!(matches!(err, DecodeError::Wire(_)));
    }
}
