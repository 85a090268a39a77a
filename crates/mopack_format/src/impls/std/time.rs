use std::time::{Duration, SystemTime, UNIX_EPOCH};

use mopack_wire::{Reader, Timestamp, Writer};

use crate::formatter::{Decode, DecodeError, Encode, EncodeError};
use crate::impls::NonGenericDescriptorCell;
use crate::info::{Described, ScalarDescriptor, ScalarKind, TypeDescriptor};
use crate::resolve::Resolver;

const NANOS_PER_SEC: u32 = 1_000_000_000;

impl Described for SystemTime {
    fn descriptor() -> &'static TypeDescriptor {
        static CELL: NonGenericDescriptorCell = NonGenericDescriptorCell::new();
        CELL.get_or_init(|| {
            TypeDescriptor::Scalar(
                ScalarDescriptor::new::<SystemTime>("SystemTime", ScalarKind::Timestamp)
                    .with_formatter(crate::impls::native_formatter::<SystemTime>),
            )
        })
    }
}

impl Encode for SystemTime {
    fn encode(&self, writer: &mut Writer<'_>, _resolver: &Resolver) -> Result<(), EncodeError> {
        let out_of_range = || EncodeError::custom("system time exceeds the timestamp range");
        let timestamp = match self.duration_since(UNIX_EPOCH) {
            Ok(since) => {
                let seconds = i64::try_from(since.as_secs()).map_err(|_| out_of_range())?;
                Timestamp::new(seconds, since.subsec_nanos())
            }
            Err(err) => {
                // Pre-epoch instants carry their distance as a positive
                // duration; fold the nanosecond part into the second below.
                let before = err.duration();
                let seconds = i64::try_from(before.as_secs()).map_err(|_| out_of_range())?;
                let nanos = before.subsec_nanos();
                if nanos == 0 {
                    Timestamp::new(-seconds, 0)
                } else {
                    Timestamp::new(-seconds - 1, NANOS_PER_SEC - nanos)
                }
            }
        };
        writer.write_timestamp(timestamp.ok_or_else(out_of_range)?)?;
        Ok(())
    }
}

impl Decode for SystemTime {
    fn decode(reader: &mut Reader<'_>, _resolver: &Resolver) -> Result<SystemTime, DecodeError> {
        let timestamp = reader.read_timestamp()?;
        let seconds = timestamp.seconds();
        let nanos = timestamp.nanos();

        let instant = if seconds >= 0 {
            UNIX_EPOCH.checked_add(Duration::new(seconds.unsigned_abs(), nanos))
        } else if nanos == 0 {
            UNIX_EPOCH.checked_sub(Duration::from_secs(seconds.unsigned_abs()))
        } else {
            UNIX_EPOCH.checked_sub(Duration::new(
                seconds.unsigned_abs() - 1,
                NANOS_PER_SEC - nanos,
            ))
        };
        instant.ok_or_else(|| DecodeError::custom("timestamp exceeds the system time range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve;

    #[test]
    fn post_epoch_times_round_trip() {
        let resolver = resolve::Resolver::standard();
        let time = UNIX_EPOCH + Duration::new(1_700_000_000, 123);
        let bytes = resolve::serialize(&time, &resolver).unwrap();
        let back: SystemTime = resolve::deserialize(&bytes, &resolver).unwrap();
        assert_eq!(back, time);
    }

    #[test]
    fn pre_epoch_times_round_trip() {
        let resolver = resolve::Resolver::standard();
        let time = UNIX_EPOCH - Duration::new(5, 250_000_000);
        let bytes = resolve::serialize(&time, &resolver).unwrap();
        let back: SystemTime = resolve::deserialize(&bytes, &resolver).unwrap();
        assert_eq!(back, time);
    }

    #[test]
    fn system_times_and_timestamps_share_bytes() {
        let resolver = resolve::Resolver::standard();
        let time = UNIX_EPOCH + Duration::from_secs(42);
        let stamp = Timestamp::from_seconds(42);
        assert_eq!(
            resolve::serialize(&time, &resolver).unwrap(),
            resolve::serialize(&stamp, &resolver).unwrap(),
        );
    }
}
