use ::mopack_wire::{Bytes, Reader, Writer};

use crate::formatter::{Decode, DecodeError, Encode, EncodeError};
use crate::impls::NonGenericDescriptorCell;
use crate::info::{Described, ScalarDescriptor, ScalarKind, TypeDescriptor};
use crate::resolve::Resolver;

impl Described for Bytes {
    fn descriptor() -> &'static TypeDescriptor {
        static CELL: NonGenericDescriptorCell = NonGenericDescriptorCell::new();
        CELL.get_or_init(|| {
            TypeDescriptor::Scalar(
                ScalarDescriptor::new::<Bytes>("Bytes", ScalarKind::Bytes)
                    .with_formatter(crate::impls::native_formatter::<Bytes>),
            )
        })
    }
}

impl Encode for Bytes {
    fn encode(&self, writer: &mut Writer<'_>, _resolver: &Resolver) -> Result<(), EncodeError> {
        writer.write_bin(self)?;
        Ok(())
    }
}

impl Decode for Bytes {
    fn decode(reader: &mut Reader<'_>, _resolver: &Resolver) -> Result<Bytes, DecodeError> {
        Ok(Bytes::from(reader.read_bin()?))
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::resolve;

    #[test]
    fn buffers_use_the_binary_family() {
        let resolver = resolve::Resolver::standard();
        let buffer = Bytes::new(vec![1, 2, 3]);

        let bytes = resolve::serialize(&buffer, &resolver).unwrap();
        assert_eq!(bytes, [0xC4, 0x03, 0x01, 0x02, 0x03]);

        let back: Bytes = resolve::deserialize(&bytes, &resolver).unwrap();
        assert_eq!(back, buffer);
    }

    #[test]
    fn plain_byte_vectors_stay_arrays() {
        let resolver = resolve::Resolver::standard();
        let bytes = resolve::serialize(&vec![1_u8, 2, 3], &resolver).unwrap();
        assert_eq!(bytes, [0x93, 0x01, 0x02, 0x03]);
    }
}
