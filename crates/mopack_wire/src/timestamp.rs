use crate::TIMESTAMP_EXT_TYPE;
use crate::error::WireError;
use crate::reader::Reader;
use crate::writer::Writer;

const MAX_NANOS: u32 = 999_999_999;

// -----------------------------------------------------------------------------
// Timestamp

/// An instant as seconds since the Unix epoch plus a nanosecond part.
///
/// Encoded as the predefined extension type `-1`. Writes pick the smallest of
/// the three layouts: four bytes when the value is a plain non-negative
/// 32-bit second count, eight bytes when the seconds fit 34 bits, and twelve
/// bytes otherwise (the only layout that can carry pre-epoch instants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    seconds: i64,
    nanos: u32,
}

impl Timestamp {
    /// Builds a timestamp, rejecting a nanosecond part of a full second or
    /// more.
    pub const fn new(seconds: i64, nanos: u32) -> Option<Timestamp> {
        if nanos > MAX_NANOS {
            None
        } else {
            Some(Timestamp { seconds, nanos })
        }
    }

    pub const fn from_seconds(seconds: i64) -> Timestamp {
        Timestamp { seconds, nanos: 0 }
    }

    pub const fn seconds(&self) -> i64 {
        self.seconds
    }

    pub const fn nanos(&self) -> u32 {
        self.nanos
    }
}

impl Writer<'_> {
    /// Writes a timestamp in the smallest of its three extension layouts.
    pub fn write_timestamp(&mut self, value: Timestamp) -> Result<(), WireError> {
        let seconds = value.seconds;
        let nanos = value.nanos;
        if nanos == 0 && seconds >= 0 && seconds <= u32::MAX as i64 {
            self.write_ext(TIMESTAMP_EXT_TYPE, &(seconds as u32).to_be_bytes())
        } else if seconds >= 0 && seconds < (1 << 34) {
            let packed = ((nanos as u64) << 34) | (seconds as u64);
            self.write_ext(TIMESTAMP_EXT_TYPE, &packed.to_be_bytes())
        } else {
            let mut data = [0u8; 12];
            data[..4].copy_from_slice(&nanos.to_be_bytes());
            data[4..].copy_from_slice(&seconds.to_be_bytes());
            self.write_ext(TIMESTAMP_EXT_TYPE, &data)
        }
    }
}

impl Reader<'_> {
    /// Reads a timestamp in any of its three extension layouts.
    pub fn read_timestamp(&mut self) -> Result<Timestamp, WireError> {
        let offset = self.position();
        let (ext_type, len) = self.read_ext_header()?;
        if ext_type != TIMESTAMP_EXT_TYPE {
            return Err(WireError::ExtType {
                expected: TIMESTAMP_EXT_TYPE,
                found: ext_type,
                offset,
            });
        }
        let data = self.read_exact(len)?;
        let out_of_range = || WireError::OutOfRange {
            expected: "timestamp",
            offset,
        };
        match len {
            4 => {
                let mut raw = [0u8; 4];
                raw.copy_from_slice(data);
                Ok(Timestamp {
                    seconds: u32::from_be_bytes(raw) as i64,
                    nanos: 0,
                })
            }
            8 => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(data);
                let packed = u64::from_be_bytes(raw);
                let nanos = (packed >> 34) as u32;
                if nanos > MAX_NANOS {
                    return Err(out_of_range());
                }
                Ok(Timestamp {
                    seconds: (packed & ((1 << 34) - 1)) as i64,
                    nanos,
                })
            }
            12 => {
                let mut nanos_raw = [0u8; 4];
                nanos_raw.copy_from_slice(&data[..4]);
                let mut seconds_raw = [0u8; 8];
                seconds_raw.copy_from_slice(&data[4..]);
                let nanos = u32::from_be_bytes(nanos_raw);
                if nanos > MAX_NANOS {
                    return Err(out_of_range());
                }
                Ok(Timestamp {
                    seconds: i64::from_be_bytes(seconds_raw),
                    nanos,
                })
            }
            _ => Err(out_of_range()),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    fn round_trip(value: Timestamp) -> (Vec<u8>, Timestamp) {
        let mut buf = Vec::new();
        Writer::new(&mut buf).write_timestamp(value).unwrap();
        let back = Reader::new(&buf).read_timestamp().unwrap();
        (buf, back)
    }

    #[test]
    fn whole_seconds_take_four_bytes() {
        let ts = Timestamp::from_seconds(1_000_000);
        let (buf, back) = round_trip(ts);
        assert_eq!(buf, [0xd6, 0xff, 0x00, 0x0f, 0x42, 0x40]);
        assert_eq!(back, ts);
    }

    #[test]
    fn nanos_force_the_eight_byte_layout() {
        let ts = Timestamp::new(1, 1).unwrap();
        let (buf, back) = round_trip(ts);
        assert_eq!(buf, [0xd7, 0xff, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x01]);
        assert_eq!(back, ts);
    }

    #[test]
    fn large_seconds_fall_back_to_eight_bytes() {
        let ts = Timestamp::from_seconds((1 << 34) - 1);
        let (buf, back) = round_trip(ts);
        assert_eq!(buf[0], 0xd7);
        assert_eq!(back, ts);
    }

    #[test]
    fn pre_epoch_instants_take_twelve_bytes() {
        let ts = Timestamp::new(-1, 5).unwrap();
        let (buf, back) = round_trip(ts);
        assert_eq!(buf[..2], [0xc7, 12]);
        assert_eq!(back, ts);
    }

    #[test]
    fn far_future_takes_twelve_bytes() {
        let ts = Timestamp::from_seconds(1 << 34);
        let (buf, back) = round_trip(ts);
        assert_eq!(buf[..2], [0xc7, 12]);
        assert_eq!(back, ts);
    }

    #[test]
    fn overlong_nanos_are_rejected() {
        assert!(Timestamp::new(0, MAX_NANOS).is_some());
        assert!(Timestamp::new(0, MAX_NANOS + 1).is_none());
    }

    #[test]
    fn foreign_extension_type_is_rejected() {
        let mut buf = Vec::new();
        Writer::new(&mut buf).write_ext(7, &[0, 0, 0, 1]).unwrap();

        let err = Reader::new(&buf).read_timestamp().unwrap_err();
        assert_eq!(
            err,
            WireError::ExtType {
                expected: -1,
                found: 7,
                offset: 0,
            }
        );
    }

    #[test]
    fn unknown_payload_length_is_rejected() {
        let mut buf = Vec::new();
        Writer::new(&mut buf).write_ext(-1, &[0, 0]).unwrap();

        let err = Reader::new(&buf).read_timestamp().unwrap_err();
        assert_eq!(
            err,
            WireError::OutOfRange {
                expected: "timestamp",
                offset: 0,
            }
        );
    }
}
