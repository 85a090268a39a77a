use alloc::boxed::Box;
use core::fmt::{self, Display};

use mopack_wire::WireError;

use crate::info::ConstructError;
use crate::resolve::ResolveError;

// -----------------------------------------------------------------------------
// EncodeError

/// An enumeration of all error outcomes that might happen while encoding a
/// value tree.
#[derive(Debug)]
pub enum EncodeError {
    /// The wire writer rejected a value.
    Wire(WireError),
    /// No formatter could be resolved for a type in the tree.
    Unresolved(ResolveError),
    /// An erased value was not of the type its formatter serves.
    ValueType {
        expected: &'static str,
        found: &'static str,
    },
    /// A readable member could not be borrowed out of its container.
    Access {
        type_name: &'static str,
        member: &'static str,
    },
    /// A custom failure, usually built through [`EncodeError::custom`].
    Message(Box<str>),
}

impl EncodeError {
    /// Builds a [`Message`](EncodeError::Message) error.
    ///
    /// Prefer this over constructing the variant directly: in debug builds
    /// it appends the descriptor stack of the value currently being encoded.
    pub fn custom(msg: impl Display) -> Self {
        crate::cfg::debug! {
            if {
                super::stack::DESCRIPTOR_STACK.with_borrow(|stack| {
                    EncodeError::Message(
                        alloc::format!("{msg} (stack:\n{stack:?})").into_boxed_str(),
                    )
                })
            } else {
                EncodeError::Message(alloc::format!("{msg}").into_boxed_str())
            }
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire(error) => Display::fmt(error, f),
            Self::Unresolved(error) => Display::fmt(error, f),
            Self::ValueType { expected, found } => {
                write!(f, "expected a value of type `{expected}`, found `{found}`")
            }
            Self::Access { type_name, member } => {
                write!(f, "cannot read member `{member}` of `{type_name}`")
            }
            Self::Message(msg) => f.write_str(msg),
        }
    }
}

impl core::error::Error for EncodeError {}

impl From<WireError> for EncodeError {
    #[inline]
    fn from(value: WireError) -> Self {
        Self::Wire(value)
    }
}

impl From<ResolveError> for EncodeError {
    #[inline]
    fn from(value: ResolveError) -> Self {
        Self::Unresolved(value)
    }
}

// -----------------------------------------------------------------------------
// DecodeError

/// An enumeration of all error outcomes that might happen while decoding a
/// value tree.
#[derive(Debug)]
pub enum DecodeError {
    /// The wire reader hit malformed or truncated input.
    Wire(WireError),
    /// No formatter could be resolved for a type in the tree.
    Unresolved(ResolveError),
    /// An enum read a value no variant carries.
    UnknownEnumValue { type_name: &'static str, value: i64 },
    /// A union without a fallback arm read a key it does not know.
    UnknownUnionKey { type_name: &'static str, key: u32 },
    /// A union envelope was not a 2-element array.
    UnionArity { type_name: &'static str, found: usize },
    /// A member was absent from the wire and has no default.
    MissingMember {
        type_name: &'static str,
        member: &'static str,
    },
    /// A decoded erased value could not be moved into its destination.
    ValueType {
        expected: &'static str,
        found: &'static str,
    },
    /// A positional constructor rejected the collected members.
    Construct(ConstructError),
    /// Input bytes remained after the value was fully decoded.
    Trailing { remaining: usize },
    /// A custom failure, usually built through [`DecodeError::custom`].
    Message(Box<str>),
}

impl DecodeError {
    /// Builds a [`Message`](DecodeError::Message) error.
    ///
    /// Prefer this over constructing the variant directly: in debug builds
    /// it appends the descriptor stack of the value currently being decoded.
    pub fn custom(msg: impl Display) -> Self {
        crate::cfg::debug! {
            if {
                super::stack::DESCRIPTOR_STACK.with_borrow(|stack| {
                    DecodeError::Message(
                        alloc::format!("{msg} (stack:\n{stack:?})").into_boxed_str(),
                    )
                })
            } else {
                DecodeError::Message(alloc::format!("{msg}").into_boxed_str())
            }
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire(error) => Display::fmt(error, f),
            Self::Unresolved(error) => Display::fmt(error, f),
            Self::UnknownEnumValue { type_name, value } => {
                write!(f, "no variant of `{type_name}` carries the value {value}")
            }
            Self::UnknownUnionKey { type_name, key } => {
                write!(f, "union `{type_name}` has no arm keyed {key}")
            }
            Self::UnionArity { type_name, found } => {
                write!(
                    f,
                    "union `{type_name}` expects a 2-element array, found {found} elements"
                )
            }
            Self::MissingMember { type_name, member } => {
                write!(
                    f,
                    "member `{member}` of `{type_name}` is missing and has no default"
                )
            }
            Self::ValueType { expected, found } => {
                write!(f, "expected a value of type `{expected}`, found `{found}`")
            }
            Self::Construct(error) => Display::fmt(error, f),
            Self::Trailing { remaining } => {
                write!(f, "{remaining} bytes of trailing input after the decoded value")
            }
            Self::Message(msg) => f.write_str(msg),
        }
    }
}

impl core::error::Error for DecodeError {}

impl From<WireError> for DecodeError {
    #[inline]
    fn from(value: WireError) -> Self {
        Self::Wire(value)
    }
}

impl From<ResolveError> for DecodeError {
    #[inline]
    fn from(value: ResolveError) -> Self {
        Self::Unresolved(value)
    }
}

impl From<ConstructError> for DecodeError {
    #[inline]
    fn from(value: ConstructError) -> Self {
        Self::Construct(value)
    }
}
