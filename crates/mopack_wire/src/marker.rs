use core::fmt;

// -----------------------------------------------------------------------------
// Marker

/// A decoded MessagePack format byte.
///
/// The fix-width variants carry the value or length packed into the marker
/// itself; everything else announces how many bytes of payload follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `0x00 ..= 0x7f`, the value itself.
    FixPos(u8),
    /// `0xe0 ..= 0xff`, the value itself.
    FixNeg(i8),
    /// `0x80 ..= 0x8f`, pair count packed into the low nibble.
    FixMap(u8),
    /// `0x90 ..= 0x9f`, element count packed into the low nibble.
    FixArray(u8),
    /// `0xa0 ..= 0xbf`, byte length packed into the low five bits.
    FixStr(u8),
    Nil,
    /// `0xc1`, never valid in well-formed data.
    Reserved,
    False,
    True,
    Bin8,
    Bin16,
    Bin32,
    Ext8,
    Ext16,
    Ext32,
    F32,
    F64,
    U8,
    U16,
    U32,
    U64,
    I8,
    I16,
    I32,
    I64,
    FixExt1,
    FixExt2,
    FixExt4,
    FixExt8,
    FixExt16,
    Str8,
    Str16,
    Str32,
    Array16,
    Array32,
    Map16,
    Map32,
}

impl Marker {
    /// Decodes a format byte.
    pub fn from_u8(byte: u8) -> Marker {
        match byte {
            0x00..=0x7f => Marker::FixPos(byte),
            0x80..=0x8f => Marker::FixMap(byte & 0x0f),
            0x90..=0x9f => Marker::FixArray(byte & 0x0f),
            0xa0..=0xbf => Marker::FixStr(byte & 0x1f),
            0xc0 => Marker::Nil,
            0xc1 => Marker::Reserved,
            0xc2 => Marker::False,
            0xc3 => Marker::True,
            0xc4 => Marker::Bin8,
            0xc5 => Marker::Bin16,
            0xc6 => Marker::Bin32,
            0xc7 => Marker::Ext8,
            0xc8 => Marker::Ext16,
            0xc9 => Marker::Ext32,
            0xca => Marker::F32,
            0xcb => Marker::F64,
            0xcc => Marker::U8,
            0xcd => Marker::U16,
            0xce => Marker::U32,
            0xcf => Marker::U64,
            0xd0 => Marker::I8,
            0xd1 => Marker::I16,
            0xd2 => Marker::I32,
            0xd3 => Marker::I64,
            0xd4 => Marker::FixExt1,
            0xd5 => Marker::FixExt2,
            0xd6 => Marker::FixExt4,
            0xd7 => Marker::FixExt8,
            0xd8 => Marker::FixExt16,
            0xd9 => Marker::Str8,
            0xda => Marker::Str16,
            0xdb => Marker::Str32,
            0xdc => Marker::Array16,
            0xdd => Marker::Array32,
            0xde => Marker::Map16,
            0xdf => Marker::Map32,
            0xe0..=0xff => Marker::FixNeg(byte as i8),
        }
    }

    /// Encodes the marker back into its format byte.
    pub fn to_u8(self) -> u8 {
        match self {
            Marker::FixPos(value) => value,
            Marker::FixNeg(value) => value as u8,
            Marker::FixMap(count) => 0x80 | (count & 0x0f),
            Marker::FixArray(count) => 0x90 | (count & 0x0f),
            Marker::FixStr(len) => 0xa0 | (len & 0x1f),
            Marker::Nil => 0xc0,
            Marker::Reserved => 0xc1,
            Marker::False => 0xc2,
            Marker::True => 0xc3,
            Marker::Bin8 => 0xc4,
            Marker::Bin16 => 0xc5,
            Marker::Bin32 => 0xc6,
            Marker::Ext8 => 0xc7,
            Marker::Ext16 => 0xc8,
            Marker::Ext32 => 0xc9,
            Marker::F32 => 0xca,
            Marker::F64 => 0xcb,
            Marker::U8 => 0xcc,
            Marker::U16 => 0xcd,
            Marker::U32 => 0xce,
            Marker::U64 => 0xcf,
            Marker::I8 => 0xd0,
            Marker::I16 => 0xd1,
            Marker::I32 => 0xd2,
            Marker::I64 => 0xd3,
            Marker::FixExt1 => 0xd4,
            Marker::FixExt2 => 0xd5,
            Marker::FixExt4 => 0xd6,
            Marker::FixExt8 => 0xd7,
            Marker::FixExt16 => 0xd8,
            Marker::Str8 => 0xd9,
            Marker::Str16 => 0xda,
            Marker::Str32 => 0xdb,
            Marker::Array16 => 0xdc,
            Marker::Array32 => 0xdd,
            Marker::Map16 => 0xde,
            Marker::Map32 => 0xdf,
        }
    }

    /// A short family name for error messages.
    pub fn family(self) -> &'static str {
        match self {
            Marker::FixPos(_) | Marker::U8 | Marker::U16 | Marker::U32 | Marker::U64 => {
                "unsigned integer"
            }
            Marker::FixNeg(_) | Marker::I8 | Marker::I16 | Marker::I32 | Marker::I64 => {
                "signed integer"
            }
            Marker::FixMap(_) | Marker::Map16 | Marker::Map32 => "map",
            Marker::FixArray(_) | Marker::Array16 | Marker::Array32 => "array",
            Marker::FixStr(_) | Marker::Str8 | Marker::Str16 | Marker::Str32 => "string",
            Marker::Nil => "nil",
            Marker::Reserved => "reserved",
            Marker::False | Marker::True => "boolean",
            Marker::Bin8 | Marker::Bin16 | Marker::Bin32 => "binary",
            Marker::F32 => "f32",
            Marker::F64 => "f64",
            Marker::Ext8
            | Marker::Ext16
            | Marker::Ext32
            | Marker::FixExt1
            | Marker::FixExt2
            | Marker::FixExt4
            | Marker::FixExt8
            | Marker::FixExt16 => "extension",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:02x})", self.family(), self.to_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_byte_round_trips() {
        for byte in 0..=u8::MAX {
            assert_eq!(Marker::from_u8(byte).to_u8(), byte);
        }
    }

    #[test]
    fn fix_ranges_carry_their_payload() {
        assert_eq!(Marker::from_u8(0x05), Marker::FixPos(5));
        assert_eq!(Marker::from_u8(0xff), Marker::FixNeg(-1));
        assert_eq!(Marker::from_u8(0x83), Marker::FixMap(3));
        assert_eq!(Marker::from_u8(0x9a), Marker::FixArray(10));
        assert_eq!(Marker::from_u8(0xbf), Marker::FixStr(31));
    }
}
