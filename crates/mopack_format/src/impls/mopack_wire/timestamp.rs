use ::mopack_wire::{Reader, Timestamp, Writer};

use crate::formatter::{Decode, DecodeError, Encode, EncodeError};
use crate::impls::NonGenericDescriptorCell;
use crate::info::{Described, ScalarDescriptor, ScalarKind, TypeDescriptor};
use crate::resolve::Resolver;

impl Described for Timestamp {
    fn descriptor() -> &'static TypeDescriptor {
        static CELL: NonGenericDescriptorCell = NonGenericDescriptorCell::new();
        CELL.get_or_init(|| {
            TypeDescriptor::Scalar(
                ScalarDescriptor::new::<Timestamp>("Timestamp", ScalarKind::Timestamp)
                    .with_formatter(crate::impls::native_formatter::<Timestamp>),
            )
        })
    }
}

impl Encode for Timestamp {
    fn encode(&self, writer: &mut Writer<'_>, _resolver: &Resolver) -> Result<(), EncodeError> {
        writer.write_timestamp(*self)?;
        Ok(())
    }
}

impl Decode for Timestamp {
    fn decode(reader: &mut Reader<'_>, _resolver: &Resolver) -> Result<Timestamp, DecodeError> {
        Ok(reader.read_timestamp()?)
    }
}
