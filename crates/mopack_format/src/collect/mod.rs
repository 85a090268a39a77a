//! Type graph collection and model validation.
//!
//! [`collect`] walks a root [`TypeDescriptor`](crate::info::TypeDescriptor)
//! and every descriptor reachable through member, item and arm edges,
//! visiting each type once even when the graph is cyclic. Every visited
//! descriptor is validated against the model invariants (one keying mode per
//! object, unique keys, a usable constructor binding, unique union arm
//! keys); findings accumulate as a batch of [`Diagnostics`] instead of
//! aborting the run, and a type that fails validation is excluded from the
//! resulting [`ModelSet`] while the rest of the graph still resolves.
//!
//! Derived types cannot trip most of these checks (the macro rejects mixed
//! and duplicate keys at compile time); this pass exists so hand-built
//! descriptors get the same answers as batch diagnostics rather than
//! panics at first use.

mod collector;
mod diagnostic;

pub use collector::{ModelSet, collect};
pub use diagnostic::{Diagnostic, Diagnostics, Severity};
