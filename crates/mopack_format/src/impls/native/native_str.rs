use alloc::string::String;

use mopack_wire::{Reader, Writer};

use crate::formatter::{Decode, DecodeError, Encode, EncodeError};
use crate::impls::NonGenericDescriptorCell;
use crate::info::{Described, ScalarDescriptor, ScalarKind, TypeDescriptor};
use crate::resolve::Resolver;

impl Described for String {
    fn descriptor() -> &'static TypeDescriptor {
        static CELL: NonGenericDescriptorCell = NonGenericDescriptorCell::new();
        CELL.get_or_init(|| {
            TypeDescriptor::Scalar(
                ScalarDescriptor::new::<String>("String", ScalarKind::Str)
                    .with_formatter(crate::impls::native_formatter::<String>),
            )
        })
    }
}

impl Encode for String {
    fn encode(&self, writer: &mut Writer<'_>, _resolver: &Resolver) -> Result<(), EncodeError> {
        writer.write_str(self)?;
        Ok(())
    }
}

impl Decode for String {
    fn decode(reader: &mut Reader<'_>, _resolver: &Resolver) -> Result<String, DecodeError> {
        Ok(reader.read_str()?.into())
    }
}
