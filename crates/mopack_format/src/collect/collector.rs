use alloc::vec::Vec;
use core::any::TypeId;

use mopack_utils::TypeIdMap;
use mopack_utils::hash::HashSet;

use crate::collect::{Diagnostic, Diagnostics};
use crate::info::{
    ConstructorBinding, ContainerDescriptor, ContainerShape, EnumDescriptor, MemberKey,
    ObjectDescriptor, ScalarKind, TypeDescriptor, UnionDescriptor,
};

// -----------------------------------------------------------------------------
// ModelSet

/// The outcome of one collection run: every descriptor that survived
/// validation, in deterministic first-visit order, plus the batched findings.
#[derive(Debug)]
pub struct ModelSet {
    descriptors: Vec<&'static TypeDescriptor>,
    diagnostics: Diagnostics,
}

impl ModelSet {
    /// The validated descriptors, ordered by first visit (depth-first from
    /// the root). Two runs over the same root produce the same order.
    #[inline]
    pub fn descriptors(&self) -> &[&'static TypeDescriptor] {
        &self.descriptors
    }

    #[inline]
    pub const fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// The display names of the collected types, in set order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.descriptors.iter().map(|descriptor| descriptor.name())
    }

    /// Finds a collected descriptor by the [`TypeId`] of its type.
    pub fn find(&self, type_id: TypeId) -> Option<&'static TypeDescriptor> {
        self.descriptors
            .iter()
            .copied()
            .find(|descriptor| descriptor.ty().id() == type_id)
    }

    /// Whether the type `T` survived validation.
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.find(TypeId::of::<T>()).is_some()
    }
}

// -----------------------------------------------------------------------------
// collect

/// Collects and validates every type reachable from `root`.
///
/// Single-threaded and one-shot; the visited map lives only for the duration
/// of the call. Failed types are reported through the returned diagnostics
/// and left out of the set; everything else resolves normally, including
/// types only reachable through a failed one.
///
/// ```
/// use mopack_format::collect;
/// use mopack_format::info::Described;
///
/// let set = collect::collect(<Vec<Option<u32>> as Described>::descriptor());
///
/// let names: Vec<_> = set.names().collect();
/// assert_eq!(names, ["Vec<Option<u32>>", "Option<u32>", "u32"]);
/// assert!(!set.diagnostics().has_errors());
/// ```
pub fn collect(root: &'static TypeDescriptor) -> ModelSet {
    let mut collector = Collector {
        visited: TypeIdMap::new(),
        order: Vec::new(),
        diagnostics: Diagnostics::new(),
    };
    collector.visit(root);
    collector.finish()
}

// -----------------------------------------------------------------------------
// Collector

/// Where one type stands in the traversal.
///
/// A member edge reaching an `InProgress` type is a cycle; the edge is
/// accepted optimistically and the final set filters on the state the type
/// ended up in, so a failing cycle participant is still excluded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum VisitState {
    InProgress,
    Resolved,
    Failed,
}

struct Collector {
    visited: TypeIdMap<VisitState>,
    order: Vec<&'static TypeDescriptor>,
    diagnostics: Diagnostics,
}

impl Collector {
    fn visit(&mut self, descriptor: &'static TypeDescriptor) {
        let type_id = descriptor.ty().id();
        if self.visited.contains(&type_id) {
            return;
        }
        self.visited.insert(type_id, VisitState::InProgress);
        self.order.push(descriptor);

        // Errors raised while this type is current decide its fate; errors
        // raised for types visited below belong to those types.
        let errors_before = self.diagnostics.error_len();
        match descriptor {
            TypeDescriptor::Scalar(_) => {}
            TypeDescriptor::Enum(inner) => self.check_enum(inner),
            TypeDescriptor::Container(inner) => self.check_container(inner),
            TypeDescriptor::Object(inner) => self.check_object(inner),
            TypeDescriptor::Union(inner) => self.check_union(inner),
        }
        let failed = self.diagnostics.error_len() > errors_before;

        self.visited.insert(
            type_id,
            if failed {
                VisitState::Failed
            } else {
                VisitState::Resolved
            },
        );

        match descriptor {
            TypeDescriptor::Scalar(_) | TypeDescriptor::Enum(_) => {}
            TypeDescriptor::Container(inner) => {
                for item in inner.items() {
                    self.visit(item);
                }
            }
            TypeDescriptor::Object(inner) => {
                for member in inner.members() {
                    self.visit(member.descriptor());
                }
            }
            TypeDescriptor::Union(inner) => {
                for arm in inner.arms() {
                    if let Some(payload) = arm.descriptor() {
                        self.visit(payload);
                    }
                }
            }
        }
    }

    fn finish(self) -> ModelSet {
        let Collector {
            visited,
            order,
            diagnostics,
        } = self;
        let descriptors = order
            .into_iter()
            .filter(|descriptor| {
                visited.get(&descriptor.ty().id()) == Some(&VisitState::Resolved)
            })
            .collect();
        ModelSet {
            descriptors,
            diagnostics,
        }
    }

    fn check_enum(&mut self, descriptor: &EnumDescriptor) {
        let type_name = descriptor.ty().name();

        if !descriptor.repr().is_integer() {
            self.diagnostics.push(Diagnostic::error(
                type_name,
                alloc::format!("enum representation `{}` is not an integer", descriptor.repr()),
            ));
            return;
        }

        let mut seen: HashSet<i64> = HashSet::default();
        for variant in descriptor.variants() {
            let value = variant.value();
            if !seen.insert(value) {
                self.diagnostics.push(
                    Diagnostic::error(type_name, alloc::format!("duplicate value {value}"))
                        .with_member(variant.name()),
                );
            }
            if !value_fits(value, descriptor.repr()) {
                self.diagnostics.push(
                    Diagnostic::error(
                        type_name,
                        alloc::format!(
                            "value {value} does not fit the `{}` representation",
                            descriptor.repr()
                        ),
                    )
                    .with_member(variant.name()),
                );
            }
        }
    }

    fn check_container(&mut self, descriptor: &ContainerDescriptor) {
        let expected = match descriptor.shape() {
            ContainerShape::List
            | ContainerShape::Set
            | ContainerShape::Optional
            | ContainerShape::FixedArray(_) => 1,
            ContainerShape::Map => 2,
            // Tuples carry one item per position.
            ContainerShape::Tuple => descriptor.item_len(),
        };
        if descriptor.item_len() != expected {
            self.diagnostics.push(Diagnostic::error(
                descriptor.ty().name(),
                alloc::format!(
                    "a {} container takes {expected} item type(s), this one describes {}",
                    descriptor.shape(),
                    descriptor.item_len()
                ),
            ));
        }
    }

    fn check_object(&mut self, descriptor: &ObjectDescriptor) {
        let type_name = descriptor.ty().name();

        let mut last_int_key: Option<u32> = None;
        let mut seen_names: HashSet<&'static str> = HashSet::default();
        for member in descriptor.members() {
            match (descriptor.key_mode(), member.key()) {
                (crate::info::KeyMode::Int, MemberKey::Int(key)) => {
                    // Members are key-sorted, so duplicates are adjacent.
                    if last_int_key == Some(key) {
                        self.diagnostics.push(
                            Diagnostic::error(
                                type_name,
                                alloc::format!("duplicate int key {key}"),
                            )
                            .with_member(member.name()),
                        );
                    }
                    last_int_key = Some(key);
                }
                (crate::info::KeyMode::Str, MemberKey::Name(name)) => {
                    if !seen_names.insert(name) {
                        self.diagnostics.push(
                            Diagnostic::error(
                                type_name,
                                alloc::format!("duplicate string key `{name}`"),
                            )
                            .with_member(member.name()),
                        );
                    }
                }
                (mode, _) => {
                    self.diagnostics.push(
                        Diagnostic::error(
                            type_name,
                            alloc::format!("key does not match the {mode} object"),
                        )
                        .with_member(member.name()),
                    );
                }
            }

            if !member.readable() && !member.writable() {
                self.diagnostics.push(
                    Diagnostic::warning(type_name, "member is neither readable nor writable")
                        .with_member(member.name()),
                );
            }
        }

        match descriptor.constructor() {
            None => self.diagnostics.push(Diagnostic::error(
                type_name,
                "no constructor binding; decode cannot rebuild this type",
            )),
            Some(ConstructorBinding::DefaultAndAssign { .. }) => {
                for member in descriptor.members() {
                    if member.writable() && member.access().assign.is_none() {
                        self.diagnostics.push(
                            Diagnostic::error(
                                type_name,
                                "writable member has no assign accessor",
                            )
                            .with_member(member.name()),
                        );
                    }
                }
            }
            Some(ConstructorBinding::Positional { .. }) => {}
        }
    }

    fn check_union(&mut self, descriptor: &UnionDescriptor) {
        let type_name = descriptor.ty().name();

        let mut seen: HashSet<u32> = HashSet::default();
        for arm in descriptor.arms() {
            if !seen.insert(arm.key()) {
                self.diagnostics.push(
                    Diagnostic::error(
                        type_name,
                        alloc::format!("duplicate discriminator key {}", arm.key()),
                    )
                    .with_member(arm.name()),
                );
            }
        }

        if let Some(fallback) = descriptor.fallback() {
            match descriptor.arm(fallback) {
                None => self.diagnostics.push(Diagnostic::error(
                    type_name,
                    alloc::format!("fallback arm index {fallback} does not exist"),
                )),
                Some(arm) if arm.descriptor().is_some() => {
                    self.diagnostics.push(
                        Diagnostic::error(
                            type_name,
                            "fallback arm carries a payload; unknown-key payloads are skipped, \
                             so the fallback must be a unit arm",
                        )
                        .with_member(arm.name()),
                    );
                }
                Some(_) => {}
            }
        }
    }
}

fn value_fits(value: i64, repr: ScalarKind) -> bool {
    match repr {
        ScalarKind::I8 => i8::try_from(value).is_ok(),
        ScalarKind::I16 => i16::try_from(value).is_ok(),
        ScalarKind::I32 => i32::try_from(value).is_ok(),
        ScalarKind::U8 => u8::try_from(value).is_ok(),
        ScalarKind::U16 => u16::try_from(value).is_ok(),
        ScalarKind::U32 => u32::try_from(value).is_ok(),
        ScalarKind::U64 => value >= 0,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec::Vec;

    use super::*;
    use crate::collect::Severity;
    use crate::formatter::AnyPack;
    use crate::impls::NonGenericDescriptorCell;
    use crate::info::{
        ConstructError, Described, KeyMode, MemberDescriptor, UnionAccess, UnionArm,
    };

    // Collection never decodes; the binding only has to exist.
    fn positional_stub(
        _slots: &mut [Option<Box<dyn AnyPack>>],
    ) -> Result<Box<dyn AnyPack>, ConstructError> {
        Err(ConstructError {
            type_name: "stub",
            member: "stub",
        })
    }

    struct Node;

    impl Described for Node {
        fn descriptor() -> &'static TypeDescriptor {
            static CELL: NonGenericDescriptorCell = NonGenericDescriptorCell::new();
            CELL.get_or_init(|| {
                TypeDescriptor::Object(
                    ObjectDescriptor::new::<Node>(
                        "Node",
                        KeyMode::Int,
                        &[
                            MemberDescriptor::new("value", MemberKey::Int(0), <u32 as Described>::descriptor),
                            // The graph loops back into itself here.
                            MemberDescriptor::new("next", MemberKey::Int(1), <Node as Described>::descriptor),
                        ],
                    )
                    .with_constructor(ConstructorBinding::Positional {
                        construct: positional_stub,
                    }),
                )
            })
        }
    }

    #[test]
    fn cyclic_graphs_collect_each_type_once() {
        let set = collect(<Node as Described>::descriptor());

        let names: Vec<_> = set.names().collect();
        assert_eq!(names, ["Node", "u32"]);
        assert!(set.diagnostics().is_empty());
        assert!(set.contains::<Node>());
    }

    #[test]
    fn modeling_is_idempotent() {
        let first = collect(<Node as Described>::descriptor());
        let second = collect(<Node as Described>::descriptor());

        assert_eq!(
            first.names().collect::<Vec<_>>(),
            second.names().collect::<Vec<_>>()
        );
        // Descriptors are cached statics, so the runs see identical instances.
        assert!(
            first
                .descriptors()
                .iter()
                .zip(second.descriptors())
                .all(|(a, b)| core::ptr::eq(*a, *b))
        );
    }

    struct MixedKeys;

    impl Described for MixedKeys {
        fn descriptor() -> &'static TypeDescriptor {
            static CELL: NonGenericDescriptorCell = NonGenericDescriptorCell::new();
            CELL.get_or_init(|| {
                TypeDescriptor::Object(
                    ObjectDescriptor::new::<MixedKeys>(
                        "MixedKeys",
                        KeyMode::Int,
                        &[
                            MemberDescriptor::new("a", MemberKey::Int(0), <u32 as Described>::descriptor),
                            MemberDescriptor::new("b", MemberKey::Name("b"), <bool as Described>::descriptor),
                        ],
                    )
                    .with_constructor(ConstructorBinding::Positional {
                        construct: positional_stub,
                    }),
                )
            })
        }
    }

    #[test]
    fn mixed_keys_exclude_the_type_but_not_its_members() {
        let set = collect(<MixedKeys as Described>::descriptor());

        assert!(!set.contains::<MixedKeys>());
        // Member types reached through the failed object still resolve.
        assert!(set.contains::<u32>());
        assert!(set.contains::<bool>());

        let finding = set.diagnostics().errors().next().unwrap();
        assert_eq!(finding.type_name(), "MixedKeys");
        assert_eq!(finding.member(), Some("b"));
    }

    struct DuplicateKeys;

    impl Described for DuplicateKeys {
        fn descriptor() -> &'static TypeDescriptor {
            static CELL: NonGenericDescriptorCell = NonGenericDescriptorCell::new();
            CELL.get_or_init(|| {
                TypeDescriptor::Object(
                    ObjectDescriptor::new::<DuplicateKeys>(
                        "DuplicateKeys",
                        KeyMode::Int,
                        &[
                            MemberDescriptor::new("a", MemberKey::Int(3), <u32 as Described>::descriptor),
                            MemberDescriptor::new("b", MemberKey::Int(3), <u32 as Described>::descriptor),
                        ],
                    )
                    .with_constructor(ConstructorBinding::Positional {
                        construct: positional_stub,
                    }),
                )
            })
        }
    }

    #[test]
    fn duplicate_int_keys_are_an_error() {
        let set = collect(<DuplicateKeys as Described>::descriptor());

        assert!(!set.contains::<DuplicateKeys>());
        let finding = set.diagnostics().errors().next().unwrap();
        assert_eq!(finding.type_name(), "DuplicateKeys");
        assert!(finding.message().contains("duplicate int key 3"));
    }

    struct NoConstructor;

    impl Described for NoConstructor {
        fn descriptor() -> &'static TypeDescriptor {
            static CELL: NonGenericDescriptorCell = NonGenericDescriptorCell::new();
            CELL.get_or_init(|| {
                TypeDescriptor::Object(ObjectDescriptor::new::<NoConstructor>(
                    "NoConstructor",
                    KeyMode::Int,
                    &[MemberDescriptor::new("a", MemberKey::Int(0), <u32 as Described>::descriptor)],
                ))
            })
        }
    }

    #[test]
    fn a_missing_constructor_binding_is_an_error() {
        let set = collect(<NoConstructor as Described>::descriptor());

        assert!(!set.contains::<NoConstructor>());
        let finding = set.diagnostics().errors().next().unwrap();
        assert!(finding.message().contains("no constructor binding"));
    }

    struct ReadOnlyMember;

    impl Described for ReadOnlyMember {
        fn descriptor() -> &'static TypeDescriptor {
            static CELL: NonGenericDescriptorCell = NonGenericDescriptorCell::new();
            CELL.get_or_init(|| {
                TypeDescriptor::Object(
                    ObjectDescriptor::new::<ReadOnlyMember>(
                        "ReadOnlyMember",
                        KeyMode::Str,
                        &[MemberDescriptor::new("a", MemberKey::Name("a"), <u32 as Described>::descriptor)
                            .with_readable(false)
                            .with_writable(false)],
                    )
                    .with_constructor(ConstructorBinding::Positional {
                        construct: positional_stub,
                    }),
                )
            })
        }
    }

    #[test]
    fn inert_members_warn_without_excluding_the_type() {
        let set = collect(<ReadOnlyMember as Described>::descriptor());

        assert!(set.contains::<ReadOnlyMember>());
        let finding = set.diagnostics().iter().next().unwrap();
        assert_eq!(finding.severity(), Severity::Warning);
        assert_eq!(finding.member(), Some("a"));
    }

    struct BadUnion;

    impl Described for BadUnion {
        fn descriptor() -> &'static TypeDescriptor {
            static CELL: NonGenericDescriptorCell = NonGenericDescriptorCell::new();
            CELL.get_or_init(|| {
                TypeDescriptor::Union(
                    UnionDescriptor::new::<BadUnion>(
                        "BadUnion",
                        &[
                            UnionArm::new(0, "First", <u32 as Described>::descriptor),
                            UnionArm::new(0, "Second", <bool as Described>::descriptor),
                        ],
                        UnionAccess {
                            select: |_| None,
                            assemble: |_, _| {
                                Err(ConstructError {
                                    type_name: "BadUnion",
                                    member: "arm",
                                })
                            },
                        },
                    )
                    // Arm 0 has a payload, so it cannot absorb unknown keys.
                    .with_fallback(0),
                )
            })
        }
    }

    #[test]
    fn union_duplicate_keys_and_payload_fallbacks_are_errors() {
        let set = collect(<BadUnion as Described>::descriptor());

        assert!(!set.contains::<BadUnion>());
        let messages: Vec<_> = set
            .diagnostics()
            .errors()
            .map(Diagnostic::message)
            .collect();
        assert!(messages.iter().any(|m| m.contains("duplicate discriminator key 0")));
        assert!(messages.iter().any(|m| m.contains("fallback arm carries a payload")));
        // Arm payload types still resolve on their own.
        assert!(set.contains::<u32>());
    }

    enum Narrow {}

    impl Described for Narrow {
        fn descriptor() -> &'static TypeDescriptor {
            static CELL: NonGenericDescriptorCell = NonGenericDescriptorCell::new();
            CELL.get_or_init(|| {
                TypeDescriptor::Enum(EnumDescriptor::new::<Narrow>(
                    "Narrow",
                    ScalarKind::U8,
                    &[crate::info::EnumVariant::new("Big", 300)],
                    |_| None,
                    |_| None,
                ))
            })
        }
    }

    #[test]
    fn enum_values_must_fit_their_representation() {
        let set = collect(<Narrow as Described>::descriptor());

        assert!(!set.contains::<Narrow>());
        let finding = set.diagnostics().errors().next().unwrap();
        assert_eq!(finding.member(), Some("Big"));
        assert!(finding.message().contains("does not fit"));
    }
}
