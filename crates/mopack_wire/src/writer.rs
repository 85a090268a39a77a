use alloc::vec::Vec;

use crate::error::WireError;
use crate::marker::Marker;

// -----------------------------------------------------------------------------
// Writer

/// Appends MessagePack values to a byte buffer.
///
/// Every write picks the smallest encoding that can represent the value, so
/// `7` becomes a single positive fixint byte while `7_000_000_000` takes the
/// nine-byte `u64` form. Integer writes are infallible; writes that carry a
/// length return an error when the length exceeds the format's 32-bit limit.
///
/// # Example
///
/// ```
/// use mopack_wire::Writer;
///
/// let mut buf = Vec::new();
/// let mut writer = Writer::new(&mut buf);
/// writer.write_uint(7);
/// writer.write_str("ok")?;
/// assert_eq!(buf, [0x07, 0xa2, b'o', b'k']);
/// # Ok::<(), mopack_wire::WireError>(())
/// ```
pub struct Writer<'a> {
    out: &'a mut Vec<u8>,
}

impl<'a> Writer<'a> {
    pub fn new(out: &'a mut Vec<u8>) -> Writer<'a> {
        Writer { out }
    }

    /// Number of bytes written to the underlying buffer so far.
    pub fn position(&self) -> usize {
        self.out.len()
    }

    pub fn write_nil(&mut self) {
        self.out.push(Marker::Nil.to_u8());
    }

    pub fn write_bool(&mut self, value: bool) {
        let marker = if value { Marker::True } else { Marker::False };
        self.out.push(marker.to_u8());
    }

    /// Writes an unsigned integer using the smallest encoding that fits.
    pub fn write_uint(&mut self, value: u64) {
        if value <= 0x7f {
            self.out.push(value as u8);
        } else if value <= u8::MAX as u64 {
            self.out.push(Marker::U8.to_u8());
            self.out.push(value as u8);
        } else if value <= u16::MAX as u64 {
            self.out.push(Marker::U16.to_u8());
            self.out.extend_from_slice(&(value as u16).to_be_bytes());
        } else if value <= u32::MAX as u64 {
            self.out.push(Marker::U32.to_u8());
            self.out.extend_from_slice(&(value as u32).to_be_bytes());
        } else {
            self.out.push(Marker::U64.to_u8());
            self.out.extend_from_slice(&value.to_be_bytes());
        }
    }

    /// Writes a signed integer using the smallest encoding that fits.
    ///
    /// Non-negative values take the unsigned forms, matching how compact
    /// encoders in the wild behave.
    pub fn write_int(&mut self, value: i64) {
        if value >= 0 {
            self.write_uint(value as u64);
        } else if value >= -32 {
            self.out.push(value as u8);
        } else if value >= i8::MIN as i64 {
            self.out.push(Marker::I8.to_u8());
            self.out.push(value as u8);
        } else if value >= i16::MIN as i64 {
            self.out.push(Marker::I16.to_u8());
            self.out.extend_from_slice(&(value as i16).to_be_bytes());
        } else if value >= i32::MIN as i64 {
            self.out.push(Marker::I32.to_u8());
            self.out.extend_from_slice(&(value as i32).to_be_bytes());
        } else {
            self.out.push(Marker::I64.to_u8());
            self.out.extend_from_slice(&value.to_be_bytes());
        }
    }

    pub fn write_f32(&mut self, value: f32) {
        self.out.push(Marker::F32.to_u8());
        self.out.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.out.push(Marker::F64.to_u8());
        self.out.extend_from_slice(&value.to_be_bytes());
    }

    /// Writes a UTF-8 string with the shortest header for its byte length.
    pub fn write_str(&mut self, value: &str) -> Result<(), WireError> {
        let bytes = value.as_bytes();
        let len = bytes.len();
        if len <= 31 {
            self.out.push(Marker::FixStr(len as u8).to_u8());
        } else if len <= u8::MAX as usize {
            self.out.push(Marker::Str8.to_u8());
            self.out.push(len as u8);
        } else if len <= u16::MAX as usize {
            self.out.push(Marker::Str16.to_u8());
            self.out.extend_from_slice(&(len as u16).to_be_bytes());
        } else if len <= u32::MAX as usize {
            self.out.push(Marker::Str32.to_u8());
            self.out.extend_from_slice(&(len as u32).to_be_bytes());
        } else {
            return Err(WireError::LengthOverflow {
                kind: "string",
                len,
            });
        }
        self.out.extend_from_slice(bytes);
        Ok(())
    }

    /// Writes raw bytes under a `bin` header.
    pub fn write_bin(&mut self, value: &[u8]) -> Result<(), WireError> {
        let len = value.len();
        if len <= u8::MAX as usize {
            self.out.push(Marker::Bin8.to_u8());
            self.out.push(len as u8);
        } else if len <= u16::MAX as usize {
            self.out.push(Marker::Bin16.to_u8());
            self.out.extend_from_slice(&(len as u16).to_be_bytes());
        } else if len <= u32::MAX as usize {
            self.out.push(Marker::Bin32.to_u8());
            self.out.extend_from_slice(&(len as u32).to_be_bytes());
        } else {
            return Err(WireError::LengthOverflow {
                kind: "binary",
                len,
            });
        }
        self.out.extend_from_slice(value);
        Ok(())
    }

    /// Announces an array of `len` elements. The elements follow as separate
    /// writes.
    pub fn write_array_header(&mut self, len: usize) -> Result<(), WireError> {
        if len <= 15 {
            self.out.push(Marker::FixArray(len as u8).to_u8());
        } else if len <= u16::MAX as usize {
            self.out.push(Marker::Array16.to_u8());
            self.out.extend_from_slice(&(len as u16).to_be_bytes());
        } else if len <= u32::MAX as usize {
            self.out.push(Marker::Array32.to_u8());
            self.out.extend_from_slice(&(len as u32).to_be_bytes());
        } else {
            return Err(WireError::LengthOverflow { kind: "array", len });
        }
        Ok(())
    }

    /// Announces a map of `len` key-value pairs. The `2 * len` values follow
    /// as separate writes.
    pub fn write_map_header(&mut self, len: usize) -> Result<(), WireError> {
        if len <= 15 {
            self.out.push(Marker::FixMap(len as u8).to_u8());
        } else if len <= u16::MAX as usize {
            self.out.push(Marker::Map16.to_u8());
            self.out.extend_from_slice(&(len as u16).to_be_bytes());
        } else if len <= u32::MAX as usize {
            self.out.push(Marker::Map32.to_u8());
            self.out.extend_from_slice(&(len as u32).to_be_bytes());
        } else {
            return Err(WireError::LengthOverflow { kind: "map", len });
        }
        Ok(())
    }

    /// Writes an extension value. Payloads of exactly 1, 2, 4, 8, or 16 bytes
    /// take the fixed forms.
    pub fn write_ext(&mut self, ext_type: i8, data: &[u8]) -> Result<(), WireError> {
        let len = data.len();
        match len {
            1 => self.out.push(Marker::FixExt1.to_u8()),
            2 => self.out.push(Marker::FixExt2.to_u8()),
            4 => self.out.push(Marker::FixExt4.to_u8()),
            8 => self.out.push(Marker::FixExt8.to_u8()),
            16 => self.out.push(Marker::FixExt16.to_u8()),
            _ if len <= u8::MAX as usize => {
                self.out.push(Marker::Ext8.to_u8());
                self.out.push(len as u8);
            }
            _ if len <= u16::MAX as usize => {
                self.out.push(Marker::Ext16.to_u8());
                self.out.extend_from_slice(&(len as u16).to_be_bytes());
            }
            _ if len <= u32::MAX as usize => {
                self.out.push(Marker::Ext32.to_u8());
                self.out.extend_from_slice(&(len as u32).to_be_bytes());
            }
            _ => {
                return Err(WireError::LengthOverflow {
                    kind: "extension",
                    len,
                });
            }
        }
        self.out.push(ext_type as u8);
        self.out.extend_from_slice(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;

    fn written(f: impl FnOnce(&mut Writer<'_>)) -> Vec<u8> {
        let mut buf = Vec::new();
        let mut writer = Writer::new(&mut buf);
        f(&mut writer);
        buf
    }

    #[test]
    fn uint_picks_the_smallest_form() {
        assert_eq!(written(|w| w.write_uint(0)), [0x00]);
        assert_eq!(written(|w| w.write_uint(0x7f)), [0x7f]);
        assert_eq!(written(|w| w.write_uint(0x80)), [0xcc, 0x80]);
        assert_eq!(written(|w| w.write_uint(0xff)), [0xcc, 0xff]);
        assert_eq!(written(|w| w.write_uint(0x100)), [0xcd, 0x01, 0x00]);
        assert_eq!(written(|w| w.write_uint(0xffff)), [0xcd, 0xff, 0xff]);
        assert_eq!(
            written(|w| w.write_uint(0x1_0000)),
            [0xce, 0x00, 0x01, 0x00, 0x00]
        );
        assert_eq!(
            written(|w| w.write_uint(0x1_0000_0000)),
            [0xcf, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn int_picks_the_smallest_form() {
        assert_eq!(written(|w| w.write_int(7)), [0x07]);
        assert_eq!(written(|w| w.write_int(-1)), [0xff]);
        assert_eq!(written(|w| w.write_int(-32)), [0xe0]);
        assert_eq!(written(|w| w.write_int(-33)), [0xd0, 0xdf]);
        assert_eq!(written(|w| w.write_int(-128)), [0xd0, 0x80]);
        assert_eq!(written(|w| w.write_int(-129)), [0xd1, 0xff, 0x7f]);
        assert_eq!(
            written(|w| w.write_int(-40_000)),
            [0xd2, 0xff, 0xff, 0x63, 0xc0]
        );
        assert_eq!(
            written(|w| w.write_int(i64::MIN)),
            [0xd3, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn str_headers_scale_with_length() {
        assert_eq!(written(|w| w.write_str("").unwrap()), [0xa0]);
        assert_eq!(
            written(|w| w.write_str("hi").unwrap()),
            [0xa2, b'h', b'i']
        );

        let s32 = "x".repeat(32);
        let out = written(|w| w.write_str(&s32).unwrap());
        assert_eq!(&out[..2], &[0xd9, 32]);

        let s300 = "x".repeat(300);
        let out = written(|w| w.write_str(&s300).unwrap());
        assert_eq!(&out[..3], &[0xda, 0x01, 0x2c]);
    }

    #[test]
    fn bin_always_uses_bin_headers() {
        assert_eq!(
            written(|w| w.write_bin(&[1, 2, 3]).unwrap()),
            [0xc4, 3, 1, 2, 3]
        );
        let big = vec![0u8; 256];
        let out = written(|w| w.write_bin(&big).unwrap());
        assert_eq!(&out[..3], &[0xc5, 0x01, 0x00]);
    }

    #[test]
    fn container_headers_scale_with_length() {
        assert_eq!(written(|w| w.write_array_header(0).unwrap()), [0x90]);
        assert_eq!(written(|w| w.write_array_header(15).unwrap()), [0x9f]);
        assert_eq!(
            written(|w| w.write_array_header(16).unwrap()),
            [0xdc, 0x00, 0x10]
        );
        assert_eq!(written(|w| w.write_map_header(2).unwrap()), [0x82]);
        assert_eq!(
            written(|w| w.write_map_header(70_000).unwrap()),
            [0xdf, 0x00, 0x01, 0x11, 0x70]
        );
    }

    #[test]
    fn ext_prefers_fixed_forms() {
        assert_eq!(
            written(|w| w.write_ext(5, &[0xaa]).unwrap()),
            [0xd4, 5, 0xaa]
        );
        assert_eq!(
            written(|w| w.write_ext(-1, &[1, 2, 3, 4]).unwrap()),
            [0xd6, 0xff, 1, 2, 3, 4]
        );
        assert_eq!(
            written(|w| w.write_ext(7, &[9, 9, 9]).unwrap()),
            [0xc7, 3, 7, 9, 9, 9]
        );
    }

    #[test]
    fn floats_keep_their_width() {
        assert_eq!(
            written(|w| w.write_f32(1.0)),
            [0xca, 0x3f, 0x80, 0x00, 0x00]
        );
        assert_eq!(
            written(|w| w.write_f64(1.0)),
            [0xcb, 0x3f, 0xf0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
    }
}
