use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use mopack_utils::hash::HashMap;

use crate::formatter::{AnyPack, Formatter};
use crate::info::{ConstructorBinding, DescType, Generics, MemberDescriptor, MemberKey};

// -----------------------------------------------------------------------------
// KeyMode

/// Which wire representation an object uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyMode {
    /// Integer keys, encoded as a positional array.
    Int,
    /// String keys, encoded as a map.
    Str,
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyMode::Int => "int-keyed",
            KeyMode::Str => "string-keyed",
        };
        f.pad(name)
    }
}

// -----------------------------------------------------------------------------
// HookTable

/// Serialization lifecycle callbacks, invoked by descriptor-interpreting
/// formatters. Typed codecs call the hooks directly without this table.
#[derive(Clone, Copy)]
pub struct HookTable {
    pub before_encode: fn(&dyn AnyPack),
    pub after_decode: fn(&mut dyn AnyPack),
}

impl fmt::Debug for HookTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("HookTable")
    }
}

// -----------------------------------------------------------------------------
// ObjectDescriptor

/// A struct-like type with keyed members.
///
/// Members of an int-keyed object are held sorted by key, so the positional
/// encoder can walk them with a single cursor. String-keyed objects keep
/// declaration order and carry a byte-keyed index for map decoding.
#[derive(Clone, Debug)]
pub struct ObjectDescriptor {
    ty: DescType,
    key_mode: KeyMode,
    members: Box<[MemberDescriptor]>,
    name_index: HashMap<&'static [u8], usize>,
    max_key: Option<u32>,
    generics: Generics,
    constructor: Option<ConstructorBinding>,
    hooks: Option<HookTable>,
    formatter: Option<fn() -> &'static Formatter>,
}

impl ObjectDescriptor {
    /// Creates the descriptor for `T` with the given members.
    ///
    /// Key-flavor mismatches and duplicate keys are not rejected here; the
    /// graph collector reports them as diagnostics so that one pass can
    /// surface every problem in a type at once.
    pub fn new<T: Any>(name: &'static str, key_mode: KeyMode, members: &[MemberDescriptor]) -> Self {
        let mut members: Vec<MemberDescriptor> = members.to_vec();
        if key_mode == KeyMode::Int {
            members.sort_by_key(|member| match member.key() {
                MemberKey::Int(key) => key,
                MemberKey::Name(_) => u32::MAX,
            });
        }

        let mut name_index = HashMap::default();
        let mut max_key = None;
        for (index, member) in members.iter().enumerate() {
            match member.key() {
                MemberKey::Int(key) => {
                    max_key = Some(max_key.map_or(key, |max: u32| max.max(key)));
                }
                MemberKey::Name(key) => {
                    name_index.insert(key.as_bytes(), index);
                }
            }
        }

        ObjectDescriptor {
            ty: DescType::of::<T>(name),
            key_mode,
            members: members.into_boxed_slice(),
            name_index,
            max_key,
            generics: Generics::new(),
            constructor: None,
            hooks: None,
            formatter: None,
        }
    }

    pub fn with_constructor(mut self, constructor: ConstructorBinding) -> Self {
        self.constructor = Some(constructor);
        self
    }

    pub fn with_hooks(mut self, hooks: HookTable) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn with_generics(mut self, generics: Generics) -> Self {
        self.generics = generics;
        self
    }

    /// Sets the hook returning the canonical formatter for the described type.
    pub fn with_formatter(mut self, formatter: fn() -> &'static Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    #[inline]
    pub const fn ty(&self) -> &DescType {
        &self.ty
    }

    #[inline]
    pub const fn key_mode(&self) -> KeyMode {
        self.key_mode
    }

    #[inline]
    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    #[inline]
    pub fn member_len(&self) -> usize {
        self.members.len()
    }

    /// The largest integer key, if any member carries one.
    #[inline]
    pub const fn max_key(&self) -> Option<u32> {
        self.max_key
    }

    /// The array length an int-keyed encoder must emit: highest key plus one,
    /// with unclaimed positions padded as nil.
    pub fn array_len(&self) -> usize {
        match self.max_key {
            Some(max) => max as usize + 1,
            None => 0,
        }
    }

    /// Looks up the member holding the given integer key.
    pub fn member_for_int(&self, key: u32) -> Option<&MemberDescriptor> {
        let index = self
            .members
            .binary_search_by_key(&key, |member| match member.key() {
                MemberKey::Int(key) => key,
                MemberKey::Name(_) => u32::MAX,
            })
            .ok()?;
        self.members.get(index)
    }

    /// Looks up a member by the raw bytes of its name key. Decoders pass the
    /// undecoded wire bytes straight through, skipping UTF-8 validation.
    pub fn member_for_name(&self, key: &[u8]) -> Option<&MemberDescriptor> {
        let index = *self.name_index.get(key)?;
        self.members.get(index)
    }

    pub fn member_index_for_name(&self, key: &[u8]) -> Option<usize> {
        self.name_index.get(key).copied()
    }

    #[inline]
    pub const fn generics(&self) -> &Generics {
        &self.generics
    }

    #[inline]
    pub const fn constructor(&self) -> Option<&ConstructorBinding> {
        self.constructor.as_ref()
    }

    #[inline]
    pub const fn hooks(&self) -> Option<&HookTable> {
        self.hooks.as_ref()
    }

    #[inline]
    pub const fn native_formatter(&self) -> Option<fn() -> &'static Formatter> {
        self.formatter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::Described;

    struct Sample;

    fn desc_of_u32() -> &'static crate::info::TypeDescriptor {
        <u32 as Described>::descriptor()
    }

    #[test]
    fn int_members_are_sorted_and_padded() {
        let object = ObjectDescriptor::new::<Sample>(
            "Sample",
            KeyMode::Int,
            &[
                MemberDescriptor::new("c", MemberKey::Int(4), desc_of_u32),
                MemberDescriptor::new("a", MemberKey::Int(0), desc_of_u32),
                MemberDescriptor::new("b", MemberKey::Int(2), desc_of_u32),
            ],
        );

        let names: Vec<_> = object.members().iter().map(|m| m.name()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(object.max_key(), Some(4));
        assert_eq!(object.array_len(), 5);
        assert_eq!(object.member_for_int(2).map(|m| m.name()), Some("b"));
        assert_eq!(object.member_for_int(1).map(|m| m.name()), None);
    }

    #[test]
    fn name_lookup_goes_through_raw_bytes() {
        let object = ObjectDescriptor::new::<Sample>(
            "Sample",
            KeyMode::Str,
            &[
                MemberDescriptor::new("id", MemberKey::Name("id"), desc_of_u32),
                MemberDescriptor::new("count", MemberKey::Name("n"), desc_of_u32),
            ],
        );

        assert_eq!(object.member_for_name(b"n").map(|m| m.name()), Some("count"));
        assert_eq!(object.member_for_name(b"count").map(|m| m.name()), None);
        assert_eq!(object.max_key(), None);
        assert_eq!(object.array_len(), 0);
    }
}
