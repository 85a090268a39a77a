use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::formatter::{AnyPack, Formatter};
use crate::info::TypeDescriptor;

// -----------------------------------------------------------------------------
// MemberKey

/// The wire identity of an object member.
///
/// All members of one object carry the same flavor; mixing `Int` and `Name`
/// keys in a single object is a modeling error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberKey {
    /// Position in the array representation.
    Int(u32),
    /// Key string in the map representation.
    Name(&'static str),
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberKey::Int(key) => write!(f, "{key}"),
            MemberKey::Name(name) => f.pad(name),
        }
    }
}

// -----------------------------------------------------------------------------
// MemberAccess

/// Erased accessors for one member, used by descriptor-interpreting
/// formatters. Typed codecs never go through these.
#[derive(Clone, Copy, Default)]
pub struct MemberAccess {
    /// Borrows the member value out of its container.
    pub get: Option<fn(&dyn AnyPack) -> Option<&dyn AnyPack>>,
    /// Moves a decoded value into place. Returns the value when the container
    /// or value type does not match, like [`Box::downcast`].
    pub assign: Option<fn(&mut dyn AnyPack, Box<dyn AnyPack>) -> Result<(), Box<dyn Any>>>,
    /// Produces the fallback value used when the wire omits this member.
    pub make_default: Option<fn() -> Box<dyn AnyPack>>,
}

impl MemberAccess {
    pub const fn new() -> Self {
        MemberAccess {
            get: None,
            assign: None,
            make_default: None,
        }
    }
}

impl fmt::Debug for MemberAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberAccess")
            .field("get", &self.get.is_some())
            .field("assign", &self.assign.is_some())
            .field("make_default", &self.make_default.is_some())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// MemberDescriptor

/// One serializable member of an object.
#[derive(Clone, Debug)]
pub struct MemberDescriptor {
    name: &'static str,
    key: MemberKey,
    ty: fn() -> &'static TypeDescriptor,
    readable: bool,
    writable: bool,
    formatter: Option<fn() -> &'static Formatter>,
    access: MemberAccess,
}

impl MemberDescriptor {
    /// Creates a member that is both readable and writable and has no
    /// per-member formatter override.
    pub fn new(name: &'static str, key: MemberKey, ty: fn() -> &'static TypeDescriptor) -> Self {
        MemberDescriptor {
            name,
            key,
            ty,
            readable: true,
            writable: true,
            formatter: None,
            access: MemberAccess::new(),
        }
    }

    pub fn with_access(mut self, access: MemberAccess) -> Self {
        self.access = access;
        self
    }

    /// Pins this member to a formatter, bypassing resolver lookup for it.
    pub fn with_formatter(mut self, formatter: fn() -> &'static Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn with_readable(mut self, readable: bool) -> Self {
        self.readable = readable;
        self
    }

    pub fn with_writable(mut self, writable: bool) -> Self {
        self.writable = writable;
        self
    }

    /// The declared Rust name, independent of the wire key.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub const fn key(&self) -> MemberKey {
        self.key
    }

    /// The descriptor of the member's type.
    ///
    /// Member types resolve lazily through a hook so that cyclic object
    /// graphs can be described.
    #[inline]
    pub fn descriptor(&self) -> &'static TypeDescriptor {
        (self.ty)()
    }

    #[inline]
    pub const fn readable(&self) -> bool {
        self.readable
    }

    #[inline]
    pub const fn writable(&self) -> bool {
        self.writable
    }

    #[inline]
    pub const fn custom_formatter(&self) -> Option<fn() -> &'static Formatter> {
        self.formatter
    }

    #[inline]
    pub const fn access(&self) -> &MemberAccess {
        &self.access
    }
}

// -----------------------------------------------------------------------------
// ConstructorBinding

/// How a descriptor-interpreting decoder produces an instance.
#[derive(Clone, Copy)]
pub enum ConstructorBinding {
    /// All members are collected first, then handed to a positional
    /// constructor in member order.
    Positional {
        construct: fn(&mut [Option<Box<dyn AnyPack>>]) -> Result<Box<dyn AnyPack>, ConstructError>,
    },
    /// A default instance is created first and members are assigned into it
    /// as they decode. Requires `assign` access on every writable member.
    DefaultAndAssign { make: fn() -> Box<dyn AnyPack> },
}

impl fmt::Debug for ConstructorBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstructorBinding::Positional { .. } => "Positional",
            ConstructorBinding::DefaultAndAssign { .. } => "DefaultAndAssign",
        };
        f.pad(name)
    }
}

/// A positional constructor rejected its collected members.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConstructError {
    pub type_name: &'static str,
    pub member: &'static str,
}

impl fmt::Display for ConstructError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "constructor of `{}` rejected member `{}`",
            self.type_name, self.member
        )
    }
}

impl core::error::Error for ConstructError {}
