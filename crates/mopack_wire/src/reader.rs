use crate::error::WireError;
use crate::marker::Marker;

// -----------------------------------------------------------------------------
// Reader

/// Decodes MessagePack values from a byte slice.
///
/// Reads advance an internal cursor. String and binary reads borrow from the
/// input slice instead of copying. Integer reads accept any integer encoding
/// whose value fits the requested Rust type, so a field written as a fixint
/// still decodes into a `u64`, and [`read_f64`](Reader::read_f64) widens a
/// 32-bit float.
///
/// # Example
///
/// ```
/// use mopack_wire::{Reader, Writer};
///
/// let mut buf = Vec::new();
/// let mut writer = Writer::new(&mut buf);
/// writer.write_array_header(2)?;
/// writer.write_str("id")?;
/// writer.write_uint(42);
///
/// let mut reader = Reader::new(&buf);
/// assert_eq!(reader.read_array_len()?, 2);
/// assert_eq!(reader.read_str()?, "id");
/// assert_eq!(reader.read_uint()?, 42);
/// assert!(reader.is_finished());
/// # Ok::<(), mopack_wire::WireError>(())
/// ```
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8]) -> Reader<'a> {
        Reader { buf, pos: 0 }
    }

    /// Byte offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left in the input.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_finished(&self) -> bool {
        self.pos == self.buf.len()
    }

    /// Decodes the next format byte without consuming it.
    pub fn peek_marker(&self) -> Result<Marker, WireError> {
        self.buf
            .get(self.pos)
            .map(|&byte| Marker::from_u8(byte))
            .ok_or(WireError::UnexpectedEof { offset: self.pos })
    }

    fn take_marker(&mut self) -> Result<Marker, WireError> {
        let marker = self.peek_marker()?;
        self.pos += 1;
        Ok(marker)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        if self.remaining() < n {
            return Err(WireError::UnexpectedEof { offset: self.pos });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn take_arr<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        if self.remaining() < N {
            return Err(WireError::UnexpectedEof { offset: self.pos });
        }
        let mut arr = [0u8; N];
        arr.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(arr)
    }

    fn advance(&mut self, n: usize) -> Result<(), WireError> {
        if self.remaining() < n {
            return Err(WireError::UnexpectedEof { offset: self.pos });
        }
        self.pos += n;
        Ok(())
    }

    pub fn read_nil(&mut self) -> Result<(), WireError> {
        let offset = self.pos;
        match self.take_marker()? {
            Marker::Nil => Ok(()),
            other => Err(WireError::Mismatch {
                expected: "nil",
                found: other,
                offset,
            }),
        }
    }

    /// Consumes a nil marker if one is next and reports whether it did.
    ///
    /// This is the dispatch step for optional values: nil means absent, any
    /// other marker is left in place for the payload read.
    pub fn try_read_nil(&mut self) -> Result<bool, WireError> {
        if self.peek_marker()? == Marker::Nil {
            self.pos += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn read_bool(&mut self) -> Result<bool, WireError> {
        let offset = self.pos;
        match self.take_marker()? {
            Marker::True => Ok(true),
            Marker::False => Ok(false),
            other => Err(WireError::Mismatch {
                expected: "boolean",
                found: other,
                offset,
            }),
        }
    }

    /// Reads any integer encoding whose value is non-negative.
    pub fn read_uint(&mut self) -> Result<u64, WireError> {
        let offset = self.pos;
        let out_of_range = || WireError::OutOfRange {
            expected: "unsigned integer",
            offset,
        };
        match self.take_marker()? {
            Marker::FixPos(value) => Ok(value as u64),
            Marker::U8 => Ok(self.take_arr::<1>()?[0] as u64),
            Marker::U16 => Ok(u16::from_be_bytes(self.take_arr()?) as u64),
            Marker::U32 => Ok(u32::from_be_bytes(self.take_arr()?) as u64),
            Marker::U64 => Ok(u64::from_be_bytes(self.take_arr()?)),
            Marker::FixNeg(_) => Err(out_of_range()),
            Marker::I8 => {
                let value = self.take_arr::<1>()?[0] as i8;
                u64::try_from(value).map_err(|_| out_of_range())
            }
            Marker::I16 => {
                let value = i16::from_be_bytes(self.take_arr()?);
                u64::try_from(value).map_err(|_| out_of_range())
            }
            Marker::I32 => {
                let value = i32::from_be_bytes(self.take_arr()?);
                u64::try_from(value).map_err(|_| out_of_range())
            }
            Marker::I64 => {
                let value = i64::from_be_bytes(self.take_arr()?);
                u64::try_from(value).map_err(|_| out_of_range())
            }
            other => Err(WireError::Mismatch {
                expected: "unsigned integer",
                found: other,
                offset,
            }),
        }
    }

    /// Reads any integer encoding whose value fits an `i64`.
    pub fn read_int(&mut self) -> Result<i64, WireError> {
        let offset = self.pos;
        match self.take_marker()? {
            Marker::FixPos(value) => Ok(value as i64),
            Marker::FixNeg(value) => Ok(value as i64),
            Marker::U8 => Ok(self.take_arr::<1>()?[0] as i64),
            Marker::U16 => Ok(u16::from_be_bytes(self.take_arr()?) as i64),
            Marker::U32 => Ok(u32::from_be_bytes(self.take_arr()?) as i64),
            Marker::U64 => {
                let value = u64::from_be_bytes(self.take_arr()?);
                i64::try_from(value).map_err(|_| WireError::OutOfRange {
                    expected: "signed integer",
                    offset,
                })
            }
            Marker::I8 => Ok(self.take_arr::<1>()?[0] as i8 as i64),
            Marker::I16 => Ok(i16::from_be_bytes(self.take_arr()?) as i64),
            Marker::I32 => Ok(i32::from_be_bytes(self.take_arr()?) as i64),
            Marker::I64 => Ok(i64::from_be_bytes(self.take_arr()?)),
            other => Err(WireError::Mismatch {
                expected: "signed integer",
                found: other,
                offset,
            }),
        }
    }

    pub fn read_f32(&mut self) -> Result<f32, WireError> {
        let offset = self.pos;
        match self.take_marker()? {
            Marker::F32 => Ok(f32::from_be_bytes(self.take_arr()?)),
            other => Err(WireError::Mismatch {
                expected: "f32",
                found: other,
                offset,
            }),
        }
    }

    /// Reads a float, widening a 32-bit encoding when one is found.
    pub fn read_f64(&mut self) -> Result<f64, WireError> {
        let offset = self.pos;
        match self.take_marker()? {
            Marker::F64 => Ok(f64::from_be_bytes(self.take_arr()?)),
            Marker::F32 => Ok(f32::from_be_bytes(self.take_arr()?) as f64),
            other => Err(WireError::Mismatch {
                expected: "float",
                found: other,
                offset,
            }),
        }
    }

    fn read_str_len(&mut self) -> Result<usize, WireError> {
        let offset = self.pos;
        match self.take_marker()? {
            Marker::FixStr(len) => Ok(len as usize),
            Marker::Str8 => Ok(self.take_arr::<1>()?[0] as usize),
            Marker::Str16 => Ok(u16::from_be_bytes(self.take_arr()?) as usize),
            Marker::Str32 => Ok(u32::from_be_bytes(self.take_arr()?) as usize),
            other => Err(WireError::Mismatch {
                expected: "string",
                found: other,
                offset,
            }),
        }
    }

    /// Reads a string, borrowing its bytes from the input.
    pub fn read_str(&mut self) -> Result<&'a str, WireError> {
        let len = self.read_str_len()?;
        let offset = self.pos;
        let bytes = self.take(len)?;
        core::str::from_utf8(bytes).map_err(|_| WireError::Utf8 { offset })
    }

    /// Reads a string's raw bytes without UTF-8 validation.
    ///
    /// Key comparison only needs byte equality, so map decoders use this to
    /// avoid validating every key they merely want to match or skip.
    pub fn read_str_bytes(&mut self) -> Result<&'a [u8], WireError> {
        let len = self.read_str_len()?;
        self.take(len)
    }

    /// Reads a binary payload, borrowing it from the input.
    pub fn read_bin(&mut self) -> Result<&'a [u8], WireError> {
        let offset = self.pos;
        let len = match self.take_marker()? {
            Marker::Bin8 => self.take_arr::<1>()?[0] as usize,
            Marker::Bin16 => u16::from_be_bytes(self.take_arr()?) as usize,
            Marker::Bin32 => u32::from_be_bytes(self.take_arr()?) as usize,
            other => {
                return Err(WireError::Mismatch {
                    expected: "binary",
                    found: other,
                    offset,
                });
            }
        };
        self.take(len)
    }

    pub fn read_array_len(&mut self) -> Result<usize, WireError> {
        let offset = self.pos;
        match self.take_marker()? {
            Marker::FixArray(len) => Ok(len as usize),
            Marker::Array16 => Ok(u16::from_be_bytes(self.take_arr()?) as usize),
            Marker::Array32 => Ok(u32::from_be_bytes(self.take_arr()?) as usize),
            other => Err(WireError::Mismatch {
                expected: "array",
                found: other,
                offset,
            }),
        }
    }

    pub fn read_map_len(&mut self) -> Result<usize, WireError> {
        let offset = self.pos;
        match self.take_marker()? {
            Marker::FixMap(len) => Ok(len as usize),
            Marker::Map16 => Ok(u16::from_be_bytes(self.take_arr()?) as usize),
            Marker::Map32 => Ok(u32::from_be_bytes(self.take_arr()?) as usize),
            other => Err(WireError::Mismatch {
                expected: "map",
                found: other,
                offset,
            }),
        }
    }

    /// Reads an extension header, returning the application type tag and the
    /// payload length. The payload follows via [`read_exact`](Reader::read_exact).
    pub fn read_ext_header(&mut self) -> Result<(i8, usize), WireError> {
        let offset = self.pos;
        let len = match self.take_marker()? {
            Marker::FixExt1 => 1,
            Marker::FixExt2 => 2,
            Marker::FixExt4 => 4,
            Marker::FixExt8 => 8,
            Marker::FixExt16 => 16,
            Marker::Ext8 => self.take_arr::<1>()?[0] as usize,
            Marker::Ext16 => u16::from_be_bytes(self.take_arr()?) as usize,
            Marker::Ext32 => u32::from_be_bytes(self.take_arr()?) as usize,
            other => {
                return Err(WireError::Mismatch {
                    expected: "extension",
                    found: other,
                    offset,
                });
            }
        };
        let ext_type = self.take_arr::<1>()?[0] as i8;
        Ok((ext_type, len))
    }

    /// Takes `len` raw bytes from the input.
    pub fn read_exact(&mut self, len: usize) -> Result<&'a [u8], WireError> {
        self.take(len)
    }

    /// Skips one complete value, however deeply nested.
    ///
    /// Containers are walked with a pending-value counter instead of
    /// recursion, so adversarially deep input cannot overflow the stack. This
    /// is what lets a decoder ignore fields it does not recognize.
    pub fn skip_value(&mut self) -> Result<(), WireError> {
        let mut pending: u64 = 1;
        while pending > 0 {
            pending -= 1;
            let offset = self.pos;
            match self.take_marker()? {
                Marker::Nil
                | Marker::False
                | Marker::True
                | Marker::FixPos(_)
                | Marker::FixNeg(_) => {}
                Marker::U8 | Marker::I8 => self.advance(1)?,
                Marker::U16 | Marker::I16 => self.advance(2)?,
                Marker::U32 | Marker::I32 | Marker::F32 => self.advance(4)?,
                Marker::U64 | Marker::I64 | Marker::F64 => self.advance(8)?,
                Marker::FixStr(len) => self.advance(len as usize)?,
                Marker::Str8 | Marker::Bin8 => {
                    let len = self.take_arr::<1>()?[0] as usize;
                    self.advance(len)?;
                }
                Marker::Str16 | Marker::Bin16 => {
                    let len = u16::from_be_bytes(self.take_arr()?) as usize;
                    self.advance(len)?;
                }
                Marker::Str32 | Marker::Bin32 => {
                    let len = u32::from_be_bytes(self.take_arr()?) as usize;
                    self.advance(len)?;
                }
                Marker::FixExt1 => self.advance(1 + 1)?,
                Marker::FixExt2 => self.advance(1 + 2)?,
                Marker::FixExt4 => self.advance(1 + 4)?,
                Marker::FixExt8 => self.advance(1 + 8)?,
                Marker::FixExt16 => self.advance(1 + 16)?,
                Marker::Ext8 => {
                    let len = self.take_arr::<1>()?[0] as usize;
                    self.advance(1)?;
                    self.advance(len)?;
                }
                Marker::Ext16 => {
                    let len = u16::from_be_bytes(self.take_arr()?) as usize;
                    self.advance(1)?;
                    self.advance(len)?;
                }
                Marker::Ext32 => {
                    let len = u32::from_be_bytes(self.take_arr()?) as usize;
                    self.advance(1)?;
                    self.advance(len)?;
                }
                Marker::FixArray(len) => {
                    pending = pending.saturating_add(len as u64);
                }
                Marker::Array16 => {
                    let len = u16::from_be_bytes(self.take_arr()?) as u64;
                    pending = pending.saturating_add(len);
                }
                Marker::Array32 => {
                    let len = u32::from_be_bytes(self.take_arr()?) as u64;
                    pending = pending.saturating_add(len);
                }
                Marker::FixMap(len) => {
                    pending = pending.saturating_add(2 * len as u64);
                }
                Marker::Map16 => {
                    let len = u16::from_be_bytes(self.take_arr()?) as u64;
                    pending = pending.saturating_add(2 * len);
                }
                Marker::Map32 => {
                    let len = u32::from_be_bytes(self.take_arr()?) as u64;
                    pending = pending.saturating_add(2 * len);
                }
                Marker::Reserved => return Err(WireError::Reserved { offset }),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;
    use crate::writer::Writer;

    #[test]
    fn integers_widen_across_encodings() {
        let mut buf = Vec::new();
        let mut writer = Writer::new(&mut buf);
        writer.write_uint(7);
        writer.write_uint(300);
        writer.write_int(-5);
        writer.write_int(-70_000);

        let mut reader = Reader::new(&buf);
        assert_eq!(reader.read_int().unwrap(), 7);
        assert_eq!(reader.read_uint().unwrap(), 300);
        assert_eq!(reader.read_int().unwrap(), -5);
        assert_eq!(reader.read_int().unwrap(), -70_000);
        assert!(reader.is_finished());
    }

    #[test]
    fn negative_value_does_not_fit_unsigned() {
        let mut buf = Vec::new();
        Writer::new(&mut buf).write_int(-5);

        let err = Reader::new(&buf).read_uint().unwrap_err();
        assert_eq!(
            err,
            WireError::OutOfRange {
                expected: "unsigned integer",
                offset: 0,
            }
        );
    }

    #[test]
    fn huge_unsigned_does_not_fit_signed() {
        let mut buf = Vec::new();
        Writer::new(&mut buf).write_uint(u64::MAX);

        let err = Reader::new(&buf).read_int().unwrap_err();
        assert_eq!(
            err,
            WireError::OutOfRange {
                expected: "signed integer",
                offset: 0,
            }
        );
    }

    #[test]
    fn f64_read_widens_f32() {
        let mut buf = Vec::new();
        Writer::new(&mut buf).write_f32(1.5);
        assert_eq!(Reader::new(&buf).read_f64().unwrap(), 1.5);
    }

    #[test]
    fn strings_borrow_from_the_input() {
        let mut buf = Vec::new();
        Writer::new(&mut buf).write_str("hello").unwrap();

        let mut reader = Reader::new(&buf);
        let s = reader.read_str().unwrap();
        assert_eq!(s, "hello");
        assert_eq!(s.as_ptr(), buf[1..].as_ptr());
    }

    #[test]
    fn invalid_utf8_is_rejected_with_payload_offset() {
        let buf = [0xa2, 0xff, 0xfe];
        let err = Reader::new(&buf).read_str().unwrap_err();
        assert_eq!(err, WireError::Utf8 { offset: 1 });
    }

    #[test]
    fn bin_round_trips() {
        let mut buf = Vec::new();
        Writer::new(&mut buf).write_bin(&[1, 2, 3]).unwrap();
        assert_eq!(Reader::new(&buf).read_bin().unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn try_read_nil_peeks_without_consuming_values() {
        let mut buf = Vec::new();
        let mut writer = Writer::new(&mut buf);
        writer.write_nil();
        writer.write_uint(9);

        let mut reader = Reader::new(&buf);
        assert!(reader.try_read_nil().unwrap());
        assert!(!reader.try_read_nil().unwrap());
        assert_eq!(reader.read_uint().unwrap(), 9);
    }

    #[test]
    fn mismatch_reports_the_marker_offset() {
        let mut buf = Vec::new();
        let mut writer = Writer::new(&mut buf);
        writer.write_uint(1);
        writer.write_str("x").unwrap();

        let mut reader = Reader::new(&buf);
        reader.read_uint().unwrap();
        let err = reader.read_array_len().unwrap_err();
        assert_eq!(
            err,
            WireError::Mismatch {
                expected: "array",
                found: Marker::FixStr(1),
                offset: 1,
            }
        );
    }

    #[test]
    fn truncated_input_reports_eof() {
        let buf = [0xcd, 0x01];
        let err = Reader::new(&buf).read_uint().unwrap_err();
        assert_eq!(err, WireError::UnexpectedEof { offset: 1 });
    }

    #[test]
    fn skip_steps_over_one_nested_value() {
        let mut buf = Vec::new();
        let mut writer = Writer::new(&mut buf);
        // [1, "two", {"k": [3, 4]}, bin, ext, nil]
        writer.write_array_header(6).unwrap();
        writer.write_uint(1);
        writer.write_str("two").unwrap();
        writer.write_map_header(1).unwrap();
        writer.write_str("k").unwrap();
        writer.write_array_header(2).unwrap();
        writer.write_uint(3);
        writer.write_uint(4);
        writer.write_bin(&[9, 8]).unwrap();
        writer.write_ext(-1, &[0, 0, 0, 0]).unwrap();
        writer.write_nil();
        writer.write_uint(77);

        let mut reader = Reader::new(&buf);
        reader.skip_value().unwrap();
        assert_eq!(reader.read_uint().unwrap(), 77);
        assert!(reader.is_finished());
    }

    #[test]
    fn skip_can_target_a_single_element() {
        let mut buf = Vec::new();
        let mut writer = Writer::new(&mut buf);
        writer.write_array_header(2).unwrap();
        writer.write_map_header(1).unwrap();
        writer.write_str("skipped").unwrap();
        writer.write_uint(1);
        writer.write_uint(5);

        let mut reader = Reader::new(&buf);
        assert_eq!(reader.read_array_len().unwrap(), 2);
        reader.skip_value().unwrap();
        assert_eq!(reader.read_uint().unwrap(), 5);
    }

    #[test]
    fn skip_rejects_truncated_containers() {
        let mut buf = Vec::new();
        let mut writer = Writer::new(&mut buf);
        writer.write_array_header(3).unwrap();
        writer.write_uint(1);

        let err = Reader::new(&buf).skip_value().unwrap_err();
        assert!(matches!(err, WireError::UnexpectedEof { .. }));
    }

    #[test]
    fn skip_rejects_the_reserved_byte() {
        let buf = [0xc1];
        let err = Reader::new(&buf).skip_value().unwrap_err();
        assert_eq!(err, WireError::Reserved { offset: 0 });
    }
}
