use mopack_wire::{Reader, Writer};

use crate::formatter::{Decode, DecodeError, Encode, EncodeError};
use crate::impls::{GenericDescriptorCell, GenericNameCell, concat, native_formatter};
use crate::info::{ContainerDescriptor, ContainerShape, Described, TypeDescriptor};
use crate::resolve::Resolver;

impl<T> Described for ::alloc::collections::BTreeSet<T>
where
    T: Encode + Decode + Ord + Send + Sync,
{
    fn descriptor() -> &'static TypeDescriptor {
        static NAME: GenericNameCell = GenericNameCell::new();
        static CELL: GenericDescriptorCell = GenericDescriptorCell::new();
        CELL.get_or_insert::<Self>(|| {
            let name = NAME
                .get_or_insert::<Self>(|| concat(&["BTreeSet<", T::descriptor().name(), ">"]));
            TypeDescriptor::Container(
                ContainerDescriptor::new::<Self>(
                    name.as_str(),
                    ContainerShape::Set,
                    &[T::descriptor],
                )
                .with_formatter(native_formatter::<Self>),
            )
        })
    }
}

impl<T> Encode for ::alloc::collections::BTreeSet<T>
where
    T: Encode + Decode + Ord + Send + Sync,
{
    fn encode(&self, writer: &mut Writer<'_>, resolver: &Resolver) -> Result<(), EncodeError> {
        writer.write_array_header(Self::len(self))?;
        for item in Self::iter(self) {
            resolver.encode_value(item, writer)?;
        }
        Ok(())
    }
}

impl<T> Decode for ::alloc::collections::BTreeSet<T>
where
    T: Encode + Decode + Ord + Send + Sync,
{
    fn decode(reader: &mut Reader<'_>, resolver: &Resolver) -> Result<Self, DecodeError> {
        let len = reader.read_array_len()?;
        let mut set = Self::new();
        for _ in 0..len {
            set.insert(resolver.decode_value::<T>(reader)?);
        }
        Ok(set)
    }
}
