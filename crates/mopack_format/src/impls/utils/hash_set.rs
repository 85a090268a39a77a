// -----------------------------------------------------------------------------
// For normal HashSet

macro_rules! impl_codec_for_hashset {
    ($ty:path $(,)?) => {
        impl<T, S> $crate::info::Described for $ty
        where
            T: $crate::formatter::Encode
                + $crate::formatter::Decode
                + Eq
                + ::core::hash::Hash
                + Send
                + Sync,
            S: ::core::hash::BuildHasher + Default + Send + Sync + 'static,
        {
            fn descriptor() -> &'static $crate::info::TypeDescriptor {
                static NAME: $crate::impls::GenericNameCell = $crate::impls::GenericNameCell::new();
                static CELL: $crate::impls::GenericDescriptorCell =
                    $crate::impls::GenericDescriptorCell::new();
                CELL.get_or_insert::<Self>(|| {
                    let name = NAME.get_or_insert::<Self>(|| {
                        $crate::impls::concat(&[
                            "HashSet<",
                            <T as $crate::info::Described>::descriptor().name(),
                            ">",
                        ])
                    });
                    $crate::info::TypeDescriptor::Container(
                        $crate::info::ContainerDescriptor::new::<Self>(
                            name.as_str(),
                            $crate::info::ContainerShape::Set,
                            &[<T as $crate::info::Described>::descriptor],
                        )
                        .with_formatter($crate::impls::native_formatter::<Self>),
                    )
                })
            }
        }

        impl<T, S> $crate::formatter::Encode for $ty
        where
            T: $crate::formatter::Encode
                + $crate::formatter::Decode
                + Eq
                + ::core::hash::Hash
                + Send
                + Sync,
            S: ::core::hash::BuildHasher + Default + Send + Sync + 'static,
        {
            fn encode(
                &self,
                writer: &mut ::mopack_wire::Writer<'_>,
                resolver: &$crate::resolve::Resolver,
            ) -> Result<(), $crate::formatter::EncodeError> {
                writer.write_array_header(Self::len(self))?;
                for item in Self::iter(self) {
                    resolver.encode_value(item, writer)?;
                }
                Ok(())
            }
        }

        impl<T, S> $crate::formatter::Decode for $ty
        where
            T: $crate::formatter::Encode
                + $crate::formatter::Decode
                + Eq
                + ::core::hash::Hash
                + Send
                + Sync,
            S: ::core::hash::BuildHasher + Default + Send + Sync + 'static,
        {
            fn decode(
                reader: &mut ::mopack_wire::Reader<'_>,
                resolver: &$crate::resolve::Resolver,
            ) -> Result<Self, $crate::formatter::DecodeError> {
                let len = reader.read_array_len()?;
                // A length claim cannot exceed the bytes backing it.
                let mut set =
                    Self::with_capacity_and_hasher(len.min(reader.remaining()), S::default());
                for _ in 0..len {
                    set.insert(resolver.decode_value::<T>(reader)?);
                }
                Ok(set)
            }
        }
    };
}

pub(crate) use impl_codec_for_hashset;
