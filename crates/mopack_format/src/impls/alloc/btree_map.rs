use mopack_wire::{Reader, Writer};

use crate::formatter::{Decode, DecodeError, Encode, EncodeError};
use crate::impls::{GenericDescriptorCell, GenericNameCell, concat, native_formatter};
use crate::info::{ContainerDescriptor, ContainerShape, Described, TypeDescriptor};
use crate::resolve::Resolver;

impl<K, V> Described for ::alloc::collections::BTreeMap<K, V>
where
    K: Encode + Decode + Ord + Send + Sync,
    V: Encode + Decode + Send + Sync,
{
    fn descriptor() -> &'static TypeDescriptor {
        static NAME: GenericNameCell = GenericNameCell::new();
        static CELL: GenericDescriptorCell = GenericDescriptorCell::new();
        CELL.get_or_insert::<Self>(|| {
            let name = NAME.get_or_insert::<Self>(|| {
                concat(&[
                    "BTreeMap<",
                    K::descriptor().name(),
                    ", ",
                    V::descriptor().name(),
                    ">",
                ])
            });
            TypeDescriptor::Container(
                ContainerDescriptor::new::<Self>(
                    name.as_str(),
                    ContainerShape::Map,
                    &[K::descriptor, V::descriptor],
                )
                .with_formatter(native_formatter::<Self>),
            )
        })
    }
}

impl<K, V> Encode for ::alloc::collections::BTreeMap<K, V>
where
    K: Encode + Decode + Ord + Send + Sync,
    V: Encode + Decode + Send + Sync,
{
    fn encode(&self, writer: &mut Writer<'_>, resolver: &Resolver) -> Result<(), EncodeError> {
        writer.write_map_header(Self::len(self))?;
        for (key, value) in Self::iter(self) {
            resolver.encode_value(key, writer)?;
            resolver.encode_value(value, writer)?;
        }
        Ok(())
    }
}

impl<K, V> Decode for ::alloc::collections::BTreeMap<K, V>
where
    K: Encode + Decode + Ord + Send + Sync,
    V: Encode + Decode + Send + Sync,
{
    fn decode(reader: &mut Reader<'_>, resolver: &Resolver) -> Result<Self, DecodeError> {
        let len = reader.read_map_len()?;
        let mut map = Self::new();
        for _ in 0..len {
            let key = resolver.decode_value::<K>(reader)?;
            let value = resolver.decode_value::<V>(reader)?;
            map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeMap;
    use alloc::string::String;

    use crate::resolve;

    #[test]
    fn maps_round_trip_their_entries() {
        let resolver = resolve::Resolver::standard();
        let mut map = BTreeMap::new();
        map.insert(String::from("a"), 1_u8);
        map.insert(String::from("b"), 2);

        let bytes = resolve::serialize(&map, &resolver).unwrap();
        assert_eq!(bytes, [0x82, 0xA1, b'a', 0x01, 0xA1, b'b', 0x02]);

        let back: BTreeMap<String, u8> = resolve::deserialize(&bytes, &resolver).unwrap();
        assert_eq!(back, map);
    }
}
