//! Descriptor-interpreting codec for object descriptors.
//!
//! Runs off an [`ObjectDescriptor`] and its member accessors alone, which is
//! what hand-built descriptors for foreign types use. Derived types never
//! come through here; their generated codecs carry the same wire layout in
//! static form.

use alloc::boxed::Box;
use alloc::vec::Vec;

use mopack_wire::{Reader, Writer};

use crate::formatter::{AnyPack, DecodeError, EncodeError, Formatter};
use crate::info::{ConstructorBinding, KeyMode, MemberDescriptor, MemberKey, ObjectDescriptor};
use crate::resolve::Resolver;

pub(super) fn encode_object(
    formatter: &Formatter,
    value: &dyn AnyPack,
    writer: &mut Writer<'_>,
    resolver: &Resolver,
) -> Result<(), EncodeError> {
    let descriptor = formatter
        .descriptor()
        .as_object()
        .map_err(EncodeError::custom)?;

    if value.ty_id() != descriptor.ty().id() {
        return Err(EncodeError::ValueType {
            expected: descriptor.ty().name(),
            found: value.descriptor().name(),
        });
    }

    if let Some(hooks) = descriptor.hooks() {
        (hooks.before_encode)(value);
    }

    match descriptor.key_mode() {
        KeyMode::Int => encode_array_mode(descriptor, value, writer, resolver),
        KeyMode::Str => encode_map_mode(descriptor, value, writer, resolver),
    }
}

fn encode_array_mode(
    descriptor: &ObjectDescriptor,
    value: &dyn AnyPack,
    writer: &mut Writer<'_>,
    resolver: &Resolver,
) -> Result<(), EncodeError> {
    writer.write_array_header(descriptor.array_len())?;

    // Members are sorted by key; one cursor covers all claimed positions.
    let mut members = descriptor.members().iter().peekable();
    for position in 0..descriptor.array_len() {
        let key = u32::try_from(position).ok().map(MemberKey::Int);
        match members.next_if(|member| Some(member.key()) == key) {
            Some(member) => match read_member(descriptor, member, value)? {
                Some(member_value) => encode_member(member, member_value, writer, resolver)?,
                None => writer.write_nil(),
            },
            // A gap between claimed keys encodes as a nil hole.
            None => writer.write_nil(),
        }
    }
    Ok(())
}

fn encode_map_mode(
    descriptor: &ObjectDescriptor,
    value: &dyn AnyPack,
    writer: &mut Writer<'_>,
    resolver: &Resolver,
) -> Result<(), EncodeError> {
    let emitted = descriptor
        .members()
        .iter()
        .filter(|member| member.readable() && matches!(member.key(), MemberKey::Name(_)))
        .count();
    writer.write_map_header(emitted)?;

    for member in descriptor.members() {
        let MemberKey::Name(key) = member.key() else {
            continue;
        };
        if !member.readable() {
            continue;
        }
        writer.write_str(key)?;
        match read_member(descriptor, member, value)? {
            Some(member_value) => encode_member(member, member_value, writer, resolver)?,
            None => writer.write_nil(),
        }
    }
    Ok(())
}

/// Borrows a member value out of the container. `Ok(None)` stands for a
/// member that cannot be read and encodes as nil.
fn read_member<'a>(
    descriptor: &ObjectDescriptor,
    member: &MemberDescriptor,
    value: &'a dyn AnyPack,
) -> Result<Option<&'a dyn AnyPack>, EncodeError> {
    if !member.readable() {
        return Ok(None);
    }
    let member_value = member.access().get.and_then(|get| get(value));
    match member_value {
        Some(member_value) => Ok(Some(member_value)),
        None => Err(EncodeError::Access {
            type_name: descriptor.ty().name(),
            member: member.name(),
        }),
    }
}

fn encode_member(
    member: &MemberDescriptor,
    value: &dyn AnyPack,
    writer: &mut Writer<'_>,
    resolver: &Resolver,
) -> Result<(), EncodeError> {
    match member.custom_formatter() {
        Some(formatter) => formatter().encode(value, writer, resolver),
        None => resolver.encode_erased(value, writer),
    }
}

pub(super) fn decode_object(
    formatter: &Formatter,
    reader: &mut Reader<'_>,
    resolver: &Resolver,
) -> Result<Box<dyn AnyPack>, DecodeError> {
    let descriptor = formatter
        .descriptor()
        .as_object()
        .map_err(DecodeError::custom)?;
    let Some(constructor) = descriptor.constructor() else {
        return Err(DecodeError::custom(alloc::format!(
            "object `{}` has no constructor binding",
            descriptor.ty().name()
        )));
    };

    let mut slots: Vec<Option<Box<dyn AnyPack>>> =
        (0..descriptor.member_len()).map(|_| None).collect();

    match descriptor.key_mode() {
        KeyMode::Int => decode_array_mode(descriptor, &mut slots, reader, resolver)?,
        KeyMode::Str => decode_map_mode(descriptor, &mut slots, reader, resolver)?,
    }

    // Absent members fall back to their declared default.
    for (member, slot) in descriptor.members().iter().zip(slots.iter_mut()) {
        if slot.is_none()
            && let Some(make_default) = member.access().make_default
        {
            *slot = Some(make_default());
        }
    }

    let mut instance = match *constructor {
        ConstructorBinding::Positional { construct } => {
            for (member, slot) in descriptor.members().iter().zip(slots.iter()) {
                if slot.is_none() {
                    return Err(DecodeError::MissingMember {
                        type_name: descriptor.ty().name(),
                        member: member.name(),
                    });
                }
            }
            construct(&mut slots)?
        }
        ConstructorBinding::DefaultAndAssign { make } => {
            let mut instance = make();
            for (member, slot) in descriptor.members().iter().zip(slots.iter_mut()) {
                let Some(member_value) = slot.take() else {
                    continue;
                };
                let Some(assign) = member.access().assign else {
                    return Err(DecodeError::custom(alloc::format!(
                        "member `{}` of `{}` has no assign accessor",
                        member.name(),
                        descriptor.ty().name()
                    )));
                };
                let found = member_value.descriptor().name();
                if assign(&mut *instance, member_value).is_err() {
                    return Err(DecodeError::ValueType {
                        expected: member.descriptor().name(),
                        found,
                    });
                }
            }
            instance
        }
    };

    if let Some(hooks) = descriptor.hooks() {
        (hooks.after_decode)(&mut *instance);
    }
    Ok(instance)
}

fn decode_array_mode(
    descriptor: &ObjectDescriptor,
    slots: &mut [Option<Box<dyn AnyPack>>],
    reader: &mut Reader<'_>,
    resolver: &Resolver,
) -> Result<(), DecodeError> {
    let len = reader.read_array_len()?;

    let mut cursor = 0usize;
    for position in 0..len {
        let key = u32::try_from(position).ok().map(MemberKey::Int);
        match descriptor.members().get(cursor) {
            Some(member) if Some(member.key()) == key => {
                if member.writable() {
                    slots[cursor] = Some(decode_member(member, reader, resolver)?);
                } else {
                    reader.skip_value()?;
                }
                cursor += 1;
            }
            // A gap position, or data written by a wider schema.
            _ => reader.skip_value()?,
        }
    }
    Ok(())
}

fn decode_map_mode(
    descriptor: &ObjectDescriptor,
    slots: &mut [Option<Box<dyn AnyPack>>],
    reader: &mut Reader<'_>,
    resolver: &Resolver,
) -> Result<(), DecodeError> {
    let len = reader.read_map_len()?;

    for _ in 0..len {
        let key = reader.read_str_bytes()?;
        match descriptor.member_index_for_name(key) {
            Some(index) if descriptor.members()[index].writable() => {
                let member = &descriptor.members()[index];
                slots[index] = Some(decode_member(member, reader, resolver)?);
            }
            // Unknown and read-only keys are tolerated and skipped.
            _ => reader.skip_value()?,
        }
    }
    Ok(())
}

fn decode_member(
    member: &MemberDescriptor,
    reader: &mut Reader<'_>,
    resolver: &Resolver,
) -> Result<Box<dyn AnyPack>, DecodeError> {
    match member.custom_formatter() {
        Some(formatter) => formatter().decode(reader, resolver),
        None => resolver.decode_erased(member.descriptor(), reader),
    }
}
