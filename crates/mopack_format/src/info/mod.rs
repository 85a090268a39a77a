//! The immutable type model.
//!
//! Every serializable type is summarized by one [`TypeDescriptor`], built
//! once and shared as a `'static` reference:
//!
//! | Kind | Descriptor | Wire shape |
//! | - | - | - |
//! | [`Scalar`](TypeDescriptor::Scalar) | [`ScalarDescriptor`] | single value |
//! | [`Object`](TypeDescriptor::Object) | [`ObjectDescriptor`] | array or map of members |
//! | [`Enum`](TypeDescriptor::Enum) | [`EnumDescriptor`] | integer discriminant |
//! | [`Container`](TypeDescriptor::Container) | [`ContainerDescriptor`] | array or map of items |
//! | [`Union`](TypeDescriptor::Union) | [`UnionDescriptor`] | `[key, payload]` pair |
//!
//! Types advertise their descriptor through [`Described`]; the
//! [`derive(Pack)`](mopack_format_derive::Pack) macro generates both.

mod container;
mod described;
mod descriptor;
mod enum_info;
mod generics;
mod member;
mod object;
mod scalar;
mod ty;
mod union_info;

pub use container::{ContainerDescriptor, ContainerShape};
pub use described::Described;
pub use descriptor::{DescriptorKind, DescriptorKindError, TypeDescriptor};
pub use enum_info::{EnumDescriptor, EnumVariant};
pub use generics::{GenericArg, Generics};
pub use member::{ConstructError, ConstructorBinding, MemberAccess, MemberDescriptor, MemberKey};
pub use object::{HookTable, KeyMode, ObjectDescriptor};
pub use scalar::{ScalarDescriptor, ScalarKind};
pub use ty::DescType;
pub use union_info::{UnionAccess, UnionArm, UnionDescriptor};
