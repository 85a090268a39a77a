use mopack_wire::{Reader, Writer};

use crate::formatter::{Decode, DecodeError, Encode, EncodeError};
use crate::impls::{GenericDescriptorCell, GenericNameCell, concat, native_formatter};
use crate::info::{ContainerDescriptor, ContainerShape, Described, TypeDescriptor};
use crate::resolve::Resolver;

impl<T> Described for Option<T>
where
    T: Encode + Decode + Send + Sync,
{
    fn descriptor() -> &'static TypeDescriptor {
        static NAME: GenericNameCell = GenericNameCell::new();
        static CELL: GenericDescriptorCell = GenericDescriptorCell::new();
        CELL.get_or_insert::<Self>(|| {
            let name = NAME
                .get_or_insert::<Self>(|| concat(&["Option<", T::descriptor().name(), ">"]));
            TypeDescriptor::Container(
                ContainerDescriptor::new::<Self>(
                    name.as_str(),
                    ContainerShape::Optional,
                    &[T::descriptor],
                )
                .with_formatter(native_formatter::<Self>),
            )
        })
    }
}

impl<T> Encode for Option<T>
where
    T: Encode + Decode + Send + Sync,
{
    fn encode(&self, writer: &mut Writer<'_>, resolver: &Resolver) -> Result<(), EncodeError> {
        match self {
            Some(value) => resolver.encode_value(value, writer),
            None => {
                writer.write_nil();
                Ok(())
            }
        }
    }
}

impl<T> Decode for Option<T>
where
    T: Encode + Decode + Send + Sync,
{
    fn decode(reader: &mut Reader<'_>, resolver: &Resolver) -> Result<Option<T>, DecodeError> {
        if reader.try_read_nil()? {
            Ok(None)
        } else {
            Ok(Some(resolver.decode_value(reader)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;
    use alloc::vec::Vec;

    use super::*;
    use crate::resolve;

    #[test]
    fn absent_values_are_a_single_nil() {
        let resolver = resolve::Resolver::standard();
        let bytes = resolve::serialize(&None::<String>, &resolver).unwrap();
        assert_eq!(bytes, [0xC0]);
    }

    #[test]
    fn present_values_are_transparent() {
        let resolver = resolve::Resolver::standard();
        let wrapped = resolve::serialize(&Some(17_u32), &resolver).unwrap();
        let plain = resolve::serialize(&17_u32, &resolver).unwrap();
        assert_eq!(wrapped, plain);

        let back: Option<u32> = resolve::deserialize(&wrapped, &resolver).unwrap();
        assert_eq!(back, Some(17));
    }

    #[test]
    fn optionals_nest_inside_containers() {
        let resolver = resolve::Resolver::standard();
        let values = alloc::vec![Some(1_u8), None, Some(3)];
        let bytes = resolve::serialize(&values, &resolver).unwrap();
        let back: Vec<Option<u8>> = resolve::deserialize(&bytes, &resolver).unwrap();
        assert_eq!(back, values);
    }
}
