use alloc::boxed::Box;
use core::any::Any;
use core::fmt;

use crate::formatter::Formatter;
use crate::info::{DescType, TypeDescriptor};

// -----------------------------------------------------------------------------
// ContainerShape

/// The wire layout of a homogeneous or positional container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContainerShape {
    /// Sequence of one item type, encoded as an array.
    List,
    /// Unordered collection of one item type, encoded as an array.
    Set,
    /// Key/value pairs, encoded as a map.
    Map,
    /// Fixed-arity sequence of independent item types, encoded as an array.
    Tuple,
    /// Presence-or-absence of one item, encoded as nil or the item itself.
    Optional,
    /// Exactly `N` items of one type, encoded as an array.
    FixedArray(usize),
}

impl fmt::Display for ContainerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerShape::List => f.pad("list"),
            ContainerShape::Set => f.pad("set"),
            ContainerShape::Map => f.pad("map"),
            ContainerShape::Tuple => f.pad("tuple"),
            ContainerShape::Optional => f.pad("optional"),
            ContainerShape::FixedArray(len) => write!(f, "array of {len}"),
        }
    }
}

// -----------------------------------------------------------------------------
// ContainerDescriptor

/// A container instantiation, described by its shape and item types.
///
/// The descriptor feeds graph traversal and diagnostics; the codecs for
/// containers are the typed implementations on the container types
/// themselves.
#[derive(Clone, Debug)]
pub struct ContainerDescriptor {
    ty: DescType,
    shape: ContainerShape,
    items: Box<[fn() -> &'static TypeDescriptor]>,
    formatter: Option<fn() -> &'static Formatter>,
}

impl ContainerDescriptor {
    pub fn new<T: Any>(
        name: &'static str,
        shape: ContainerShape,
        items: &[fn() -> &'static TypeDescriptor],
    ) -> Self {
        ContainerDescriptor {
            ty: DescType::of::<T>(name),
            shape,
            items: items.into(),
            formatter: None,
        }
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
    pub const fn shape(&self) -> ContainerShape {
        self.shape
    }

    #[inline]
    pub fn item_len(&self) -> usize {
        self.items.len()
    }

    /// The descriptor of the item at `index`, resolved through its hook.
    pub fn item(&self, index: usize) -> Option<&'static TypeDescriptor> {
        self.items.get(index).map(|ty| ty())
    }

    pub fn items(&self) -> impl Iterator<Item = &'static TypeDescriptor> + '_ {
        self.items.iter().map(|ty| ty())
    }

    #[inline]
    pub const fn native_formatter(&self) -> Option<fn() -> &'static Formatter> {
        self.formatter
    }
}
