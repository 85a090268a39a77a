use core::any::Any;
use core::fmt;

use crate::formatter::Formatter;
use crate::info::DescType;

// -----------------------------------------------------------------------------
// ScalarKind

/// The wire shape of a scalar type.
///
/// Integer kinds carry the declared width of the Rust type, not the width the
/// encoder picks on the wire. Encoders always emit the smallest representation
/// that holds the value; decoders accept any integer representation that fits
/// the declared width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Unit,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
    Str,
    Bytes,
    Timestamp,
}

impl ScalarKind {
    /// Whether values of this kind travel as integer representations.
    pub const fn is_integer(&self) -> bool {
        matches!(
            self,
            ScalarKind::I8
                | ScalarKind::I16
                | ScalarKind::I32
                | ScalarKind::I64
                | ScalarKind::U8
                | ScalarKind::U16
                | ScalarKind::U32
                | ScalarKind::U64
        )
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Unit => "unit",
            ScalarKind::Bool => "bool",
            ScalarKind::I8 => "i8",
            ScalarKind::I16 => "i16",
            ScalarKind::I32 => "i32",
            ScalarKind::I64 => "i64",
            ScalarKind::U8 => "u8",
            ScalarKind::U16 => "u16",
            ScalarKind::U32 => "u32",
            ScalarKind::U64 => "u64",
            ScalarKind::F32 => "f32",
            ScalarKind::F64 => "f64",
            ScalarKind::Char => "char",
            ScalarKind::Str => "str",
            ScalarKind::Bytes => "bytes",
            ScalarKind::Timestamp => "timestamp",
        };
        f.pad(name)
    }
}

// -----------------------------------------------------------------------------
// ScalarDescriptor

/// A type that encodes as a single wire value.
#[derive(Clone, Debug)]
pub struct ScalarDescriptor {
    ty: DescType,
    kind: ScalarKind,
    formatter: Option<fn() -> &'static Formatter>,
}

impl ScalarDescriptor {
    pub fn new<T: Any>(name: &'static str, kind: ScalarKind) -> Self {
        ScalarDescriptor {
            ty: DescType::of::<T>(name),
            kind,
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
    pub const fn kind(&self) -> ScalarKind {
        self.kind
    }

    #[inline]
    pub const fn native_formatter(&self) -> Option<fn() -> &'static Formatter> {
        self.formatter
    }
}
