//! Descriptor-interpreting codec for union descriptors.
//!
//! A union value travels as a two-element array of `[key, payload]`. Unit
//! arms carry nil in the payload slot.

use alloc::boxed::Box;

use mopack_wire::{Reader, WireError, Writer};

use crate::formatter::{AnyPack, DecodeError, EncodeError, Formatter};
use crate::resolve::Resolver;

pub(super) fn encode_union(
    formatter: &Formatter,
    value: &dyn AnyPack,
    writer: &mut Writer<'_>,
    resolver: &Resolver,
) -> Result<(), EncodeError> {
    let descriptor = formatter
        .descriptor()
        .as_union()
        .map_err(EncodeError::custom)?;

    let Some((arm_index, payload)) = (descriptor.access().select)(value) else {
        return Err(EncodeError::ValueType {
            expected: descriptor.ty().name(),
            found: value.descriptor().name(),
        });
    };
    let Some(arm) = descriptor.arm(arm_index) else {
        return Err(EncodeError::custom(alloc::format!(
            "selector of `{}` returned arm index {arm_index}, which does not exist",
            descriptor.ty().name()
        )));
    };

    writer.write_array_header(2)?;
    writer.write_uint(u64::from(arm.key()));
    match payload {
        Some(payload) => resolver.encode_erased(payload, writer),
        None => {
            writer.write_nil();
            Ok(())
        }
    }
}

pub(super) fn decode_union(
    formatter: &Formatter,
    reader: &mut Reader<'_>,
    resolver: &Resolver,
) -> Result<Box<dyn AnyPack>, DecodeError> {
    let descriptor = formatter
        .descriptor()
        .as_union()
        .map_err(DecodeError::custom)?;

    let len = reader.read_array_len()?;
    if len != 2 {
        return Err(DecodeError::UnionArity {
            type_name: descriptor.ty().name(),
            found: len,
        });
    }

    let offset = reader.position();
    let raw_key = reader.read_uint()?;
    let Ok(key) = u32::try_from(raw_key) else {
        return Err(WireError::OutOfRange {
            expected: "u32",
            offset,
        }
        .into());
    };

    let (arm_index, payload) = match descriptor.arm_index_for_key(key) {
        Some(arm_index) => {
            let Some(arm) = descriptor.arm(arm_index) else {
                return Err(DecodeError::custom(alloc::format!(
                    "key table of `{}` maps key {key} out of bounds",
                    descriptor.ty().name()
                )));
            };
            match arm.descriptor() {
                Some(payload_descriptor) => {
                    let payload = resolver.decode_erased(payload_descriptor, reader)?;
                    (arm_index, Some(payload))
                }
                None => {
                    reader.read_nil()?;
                    (arm_index, None)
                }
            }
        }
        None => match descriptor.fallback() {
            // Tolerant mode: unknown arms collapse into the fallback arm and
            // their payload is skipped without being interpreted.
            Some(fallback) => {
                reader.skip_value()?;
                (fallback, None)
            }
            None => {
                return Err(DecodeError::UnknownUnionKey {
                    type_name: descriptor.ty().name(),
                    key,
                });
            }
        },
    };

    let instance = (descriptor.access().assemble)(arm_index, payload)?;
    Ok(instance)
}
