// -----------------------------------------------------------------------------
// For normal HashMap

macro_rules! impl_codec_for_hashmap {
    ($ty:path $(,)?) => {
        impl<K, V, S> $crate::info::Described for $ty
        where
            K: $crate::formatter::Encode
                + $crate::formatter::Decode
                + Eq
                + ::core::hash::Hash
                + Send
                + Sync,
            V: $crate::formatter::Encode + $crate::formatter::Decode + Send + Sync,
            S: ::core::hash::BuildHasher + Default + Send + Sync + 'static,
        {
            fn descriptor() -> &'static $crate::info::TypeDescriptor {
                static NAME: $crate::impls::GenericNameCell = $crate::impls::GenericNameCell::new();
                static CELL: $crate::impls::GenericDescriptorCell =
                    $crate::impls::GenericDescriptorCell::new();
                CELL.get_or_insert::<Self>(|| {
                    let name = NAME.get_or_insert::<Self>(|| {
                        $crate::impls::concat(&[
                            "HashMap<",
                            <K as $crate::info::Described>::descriptor().name(),
                            ", ",
                            <V as $crate::info::Described>::descriptor().name(),
                            ">",
                        ])
                    });
                    $crate::info::TypeDescriptor::Container(
                        $crate::info::ContainerDescriptor::new::<Self>(
                            name.as_str(),
                            $crate::info::ContainerShape::Map,
                            &[
                                <K as $crate::info::Described>::descriptor,
                                <V as $crate::info::Described>::descriptor,
                            ],
                        )
                        .with_formatter($crate::impls::native_formatter::<Self>),
                    )
                })
            }
        }

        impl<K, V, S> $crate::formatter::Encode for $ty
        where
            K: $crate::formatter::Encode
                + $crate::formatter::Decode
                + Eq
                + ::core::hash::Hash
                + Send
                + Sync,
            V: $crate::formatter::Encode + $crate::formatter::Decode + Send + Sync,
            S: ::core::hash::BuildHasher + Default + Send + Sync + 'static,
        {
            fn encode(
                &self,
                writer: &mut ::mopack_wire::Writer<'_>,
                resolver: &$crate::resolve::Resolver,
            ) -> Result<(), $crate::formatter::EncodeError> {
                writer.write_map_header(Self::len(self))?;
                for (key, value) in Self::iter(self) {
                    resolver.encode_value(key, writer)?;
                    resolver.encode_value(value, writer)?;
                }
                Ok(())
            }
        }

        impl<K, V, S> $crate::formatter::Decode for $ty
        where
            K: $crate::formatter::Encode
                + $crate::formatter::Decode
                + Eq
                + ::core::hash::Hash
                + Send
                + Sync,
            V: $crate::formatter::Encode + $crate::formatter::Decode + Send + Sync,
            S: ::core::hash::BuildHasher + Default + Send + Sync + 'static,
        {
            fn decode(
                reader: &mut ::mopack_wire::Reader<'_>,
                resolver: &$crate::resolve::Resolver,
            ) -> Result<Self, $crate::formatter::DecodeError> {
                let len = reader.read_map_len()?;
                // A length claim cannot exceed the bytes backing it.
                let mut map =
                    Self::with_capacity_and_hasher(len.min(reader.remaining()), S::default());
                for _ in 0..len {
                    let key = resolver.decode_value::<K>(reader)?;
                    let value = resolver.decode_value::<V>(reader)?;
                    map.insert(key, value);
                }
                Ok(map)
            }
        }
    };
}

pub(crate) use impl_codec_for_hashmap;
