use alloc::boxed::Box;

use mopack_wire::{Reader, Writer};

use crate::formatter::{Decode, DecodeError, Encode, EncodeError};
use crate::info::{Described, TypeDescriptor};
use crate::resolve::Resolver;

// A box is invisible on the wire: it shares the pointee's descriptor and
// forwards both codec directions through the resolver, so overrides for the
// pointee apply to boxed members too.
impl<T: Described> Described for Box<T> {
    fn descriptor() -> &'static TypeDescriptor {
        T::descriptor()
    }
}

impl<T: Encode> Encode for Box<T> {
    fn encode(&self, writer: &mut Writer<'_>, resolver: &Resolver) -> Result<(), EncodeError> {
        resolver.encode_value(&**self, writer)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(reader: &mut Reader<'_>, resolver: &Resolver) -> Result<Self, DecodeError> {
        Ok(Box::new(resolver.decode_value(reader)?))
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::*;
    use crate::resolve;

    #[test]
    fn boxes_are_invisible_on_the_wire() {
        let resolver = resolve::Resolver::standard();

        let boxed = resolve::serialize(&Box::new(7_u32), &resolver).unwrap();
        let plain = resolve::serialize(&7_u32, &resolver).unwrap();
        assert_eq!(boxed, plain);

        let back: Box<String> = resolve::deserialize(&[0xA2, b'h', b'i'], &resolver).unwrap();
        assert_eq!(*back, "hi");
    }
}
