use mopack_utils::TypeIdMap;

use crate::formatter::{Formatter, interpreting_formatter};
use crate::info::TypeDescriptor;

// -----------------------------------------------------------------------------
// ResolveStrategy

/// One link in a resolver's strategy chain.
///
/// The chain is walked front to back; the first strategy that answers wins
/// and its formatter is cached for the type. Returning `None` passes the
/// descriptor on to the next link.
pub trait ResolveStrategy: Send + Sync {
    fn resolve(&self, descriptor: &'static TypeDescriptor) -> Option<&'static Formatter>;
}

// -----------------------------------------------------------------------------
// Standard strategies

/// Answers with the formatters explicitly registered on the builder.
///
/// Always the first link of a built resolver, so overrides shadow every
/// other source.
pub struct OverrideStrategy {
    overrides: TypeIdMap<&'static Formatter>,
}

impl OverrideStrategy {
    pub(crate) fn new(overrides: TypeIdMap<&'static Formatter>) -> Self {
        OverrideStrategy { overrides }
    }
}

impl ResolveStrategy for OverrideStrategy {
    fn resolve(&self, descriptor: &'static TypeDescriptor) -> Option<&'static Formatter> {
        self.overrides.get(&descriptor.ty().id()).copied()
    }
}

/// Resolves scalar descriptors through their canonical formatter hook.
pub struct ScalarStrategy;

impl ResolveStrategy for ScalarStrategy {
    fn resolve(&self, descriptor: &'static TypeDescriptor) -> Option<&'static Formatter> {
        if !descriptor.is_scalar() {
            return None;
        }
        Some(descriptor.native_formatter()?())
    }
}

/// Resolves enum descriptors, interpreting the descriptor when the type has
/// no canonical formatter of its own.
pub struct EnumStrategy;

impl ResolveStrategy for EnumStrategy {
    fn resolve(&self, descriptor: &'static TypeDescriptor) -> Option<&'static Formatter> {
        if !descriptor.is_enum() {
            return None;
        }
        match descriptor.native_formatter() {
            Some(native) => Some(native()),
            None => interpreting_formatter(descriptor),
        }
    }
}

/// Resolves container descriptors through their canonical formatter hook.
///
/// Containers have no interpreting fallback: an erased container cannot be
/// rebuilt element by element, so a container type without a canonical
/// formatter stays unresolved.
pub struct ContainerStrategy;

impl ResolveStrategy for ContainerStrategy {
    fn resolve(&self, descriptor: &'static TypeDescriptor) -> Option<&'static Formatter> {
        if !descriptor.is_container() {
            return None;
        }
        Some(descriptor.native_formatter()?())
    }
}

/// Resolves union descriptors, interpreting the descriptor when the type has
/// no canonical formatter of its own.
pub struct UnionStrategy;

impl ResolveStrategy for UnionStrategy {
    fn resolve(&self, descriptor: &'static TypeDescriptor) -> Option<&'static Formatter> {
        if !descriptor.is_union() {
            return None;
        }
        match descriptor.native_formatter() {
            Some(native) => Some(native()),
            None => interpreting_formatter(descriptor),
        }
    }
}

/// Resolves object descriptors, interpreting the descriptor when the type
/// has no canonical formatter of its own.
pub struct ObjectStrategy;

impl ResolveStrategy for ObjectStrategy {
    fn resolve(&self, descriptor: &'static TypeDescriptor) -> Option<&'static Formatter> {
        if !descriptor.is_object() {
            return None;
        }
        match descriptor.native_formatter() {
            Some(native) => Some(native()),
            None => interpreting_formatter(descriptor),
        }
    }
}

/// Resolves any descriptor that carries a canonical formatter hook,
/// regardless of kind.
///
/// Sits at the end of the standard chain as the net under custom chains
/// that dropped one of the kind strategies.
pub struct AnyFallbackStrategy;

impl ResolveStrategy for AnyFallbackStrategy {
    fn resolve(&self, descriptor: &'static TypeDescriptor) -> Option<&'static Formatter> {
        Some(descriptor.native_formatter()?())
    }
}
