use alloc::boxed::Box;

use crate::info::TypeDescriptor;

// -----------------------------------------------------------------------------
// GenericArg

/// One type argument of a generic instantiation.
#[derive(Clone, Copy, Debug)]
pub struct GenericArg {
    name: &'static str,
    ty: fn() -> &'static TypeDescriptor,
}

impl GenericArg {
    pub const fn new(name: &'static str, ty: fn() -> &'static TypeDescriptor) -> Self {
        GenericArg { name, ty }
    }

    /// The parameter name as declared (`"T"`).
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The descriptor of the concrete argument.
    #[inline]
    pub fn descriptor(&self) -> &'static TypeDescriptor {
        (self.ty)()
    }
}

// -----------------------------------------------------------------------------
// Generics

/// The type arguments a generic object was instantiated with.
///
/// Empty for non-generic objects. Each closed instantiation owns its own
/// descriptor, so the arguments here are always concrete.
#[derive(Clone, Debug, Default)]
pub struct Generics(Box<[GenericArg]>);

impl Generics {
    pub fn new() -> Self {
        Generics(Box::from([]))
    }

    pub fn from_args(args: &[GenericArg]) -> Self {
        Generics(args.into())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&GenericArg> {
        self.0.get(index)
    }

    /// Finds an argument by parameter name.
    pub fn find(&self, name: &str) -> Option<&GenericArg> {
        self.0.iter().find(|arg| arg.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GenericArg> {
        self.0.iter()
    }
}
