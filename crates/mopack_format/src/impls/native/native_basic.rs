use mopack_wire::{Reader, WireError, Writer};

use crate::formatter::{Decode, DecodeError, Encode, EncodeError};
use crate::impls::impl_scalar_described;
use crate::info::Described;
use crate::resolve::Resolver;

// -----------------------------------------------------------------------------
// Integers

// Every width is widened to 64 bits on the wire; the writer then picks the
// smallest encoding for the value, so narrow and wide types interoperate.
macro_rules! impl_unsigned_codec {
    ($ty:ty, $kind:ident) => {
        impl_scalar_described!($ty, $kind);

        impl Encode for $ty {
            fn encode(
                &self,
                writer: &mut Writer<'_>,
                _resolver: &Resolver,
            ) -> Result<(), EncodeError> {
                writer.write_uint(*self as u64);
                Ok(())
            }
        }

        impl Decode for $ty {
            fn decode(reader: &mut Reader<'_>, _resolver: &Resolver) -> Result<$ty, DecodeError> {
                let offset = reader.position();
                let value = reader.read_uint()?;
                <$ty>::try_from(value).map_err(|_| {
                    WireError::OutOfRange {
                        expected: ::core::stringify!($ty),
                        offset,
                    }
                    .into()
                })
            }
        }
    };
}

macro_rules! impl_signed_codec {
    ($ty:ty, $kind:ident) => {
        impl_scalar_described!($ty, $kind);

        impl Encode for $ty {
            fn encode(
                &self,
                writer: &mut Writer<'_>,
                _resolver: &Resolver,
            ) -> Result<(), EncodeError> {
                writer.write_int(*self as i64);
                Ok(())
            }
        }

        impl Decode for $ty {
            fn decode(reader: &mut Reader<'_>, _resolver: &Resolver) -> Result<$ty, DecodeError> {
                let offset = reader.position();
                let value = reader.read_int()?;
                <$ty>::try_from(value).map_err(|_| {
                    WireError::OutOfRange {
                        expected: ::core::stringify!($ty),
                        offset,
                    }
                    .into()
                })
            }
        }
    };
}

impl_unsigned_codec!(u8, U8);
impl_unsigned_codec!(u16, U16);
impl_unsigned_codec!(u32, U32);
impl_unsigned_codec!(u64, U64);
impl_unsigned_codec!(usize, U64);

impl_signed_codec!(i8, I8);
impl_signed_codec!(i16, I16);
impl_signed_codec!(i32, I32);
impl_signed_codec!(i64, I64);
impl_signed_codec!(isize, I64);

// -----------------------------------------------------------------------------
// Floats

impl_scalar_described!(f32, F32);

impl Encode for f32 {
    fn encode(&self, writer: &mut Writer<'_>, _resolver: &Resolver) -> Result<(), EncodeError> {
        writer.write_f32(*self);
        Ok(())
    }
}

impl Decode for f32 {
    fn decode(reader: &mut Reader<'_>, _resolver: &Resolver) -> Result<f32, DecodeError> {
        Ok(reader.read_f32()?)
    }
}

impl_scalar_described!(f64, F64);

impl Encode for f64 {
    fn encode(&self, writer: &mut Writer<'_>, _resolver: &Resolver) -> Result<(), EncodeError> {
        writer.write_f64(*self);
        Ok(())
    }
}

impl Decode for f64 {
    fn decode(reader: &mut Reader<'_>, _resolver: &Resolver) -> Result<f64, DecodeError> {
        Ok(reader.read_f64()?)
    }
}

// -----------------------------------------------------------------------------
// bool, char, ()

impl_scalar_described!(bool, Bool);

impl Encode for bool {
    fn encode(&self, writer: &mut Writer<'_>, _resolver: &Resolver) -> Result<(), EncodeError> {
        writer.write_bool(*self);
        Ok(())
    }
}

impl Decode for bool {
    fn decode(reader: &mut Reader<'_>, _resolver: &Resolver) -> Result<bool, DecodeError> {
        Ok(reader.read_bool()?)
    }
}

impl_scalar_described!(char, Char);

impl Encode for char {
    fn encode(&self, writer: &mut Writer<'_>, _resolver: &Resolver) -> Result<(), EncodeError> {
        let mut buf = [0u8; 4];
        writer.write_str(self.encode_utf8(&mut buf))?;
        Ok(())
    }
}

impl Decode for char {
    fn decode(reader: &mut Reader<'_>, _resolver: &Resolver) -> Result<char, DecodeError> {
        let offset = reader.position();
        let value = reader.read_str()?;
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(value), None) => Ok(value),
            _ => Err(WireError::OutOfRange {
                expected: "char",
                offset,
            }
            .into()),
        }
    }
}

impl_scalar_described!((), Unit);

impl Encode for () {
    fn encode(&self, writer: &mut Writer<'_>, _resolver: &Resolver) -> Result<(), EncodeError> {
        writer.write_nil();
        Ok(())
    }
}

impl Decode for () {
    fn decode(reader: &mut Reader<'_>, _resolver: &Resolver) -> Result<(), DecodeError> {
        Ok(reader.read_nil()?)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    fn encode<T: Encode>(value: &T) -> Vec<u8> {
        let resolver = Resolver::standard();
        let mut out = Vec::new();
        value.encode(&mut Writer::new(&mut out), &resolver).unwrap();
        out
    }

    #[test]
    fn narrow_reads_reject_wide_values() {
        let bytes = encode(&300_u16);
        let resolver = Resolver::standard();
        let err = u8::decode(&mut Reader::new(&bytes), &resolver).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Wire(WireError::OutOfRange {
                expected: "u8",
                offset: 0,
            })
        ));
    }

    #[test]
    fn wide_reads_accept_narrow_encodings() {
        let bytes = encode(&7_u8);
        let resolver = Resolver::standard();
        assert_eq!(
            u64::decode(&mut Reader::new(&bytes), &resolver).unwrap(),
            7
        );
    }

    #[test]
    fn signed_reads_accept_positive_unsigned_encodings() {
        let bytes = encode(&200_u64);
        let resolver = Resolver::standard();
        assert_eq!(
            i16::decode(&mut Reader::new(&bytes), &resolver).unwrap(),
            200
        );
    }

    #[test]
    fn chars_round_trip_as_one_character_strings() {
        let bytes = encode(&'é');
        let resolver = Resolver::standard();
        assert_eq!(bytes[0], 0xA2);
        assert_eq!(
            char::decode(&mut Reader::new(&bytes), &resolver).unwrap(),
            'é'
        );
    }

    #[test]
    fn multi_character_strings_are_not_chars() {
        let resolver = Resolver::standard();
        let mut out = Vec::new();
        Writer::new(&mut out).write_str("ab").unwrap();
        let err = char::decode(&mut Reader::new(&out), &resolver).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Wire(WireError::OutOfRange {
                expected: "char",
                ..
            })
        ));
    }
}
