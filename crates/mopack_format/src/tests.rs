//! End-to-end coverage of the derived codecs: wire layout, schema drift,
//! unions, hooks, member overrides and the derived/interpreting equivalence.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

use mopack_wire::{Reader, WireError, Writer};

use crate::collect;
use crate::derive::{Pack, Union};
use crate::formatter::{
    DecodeError, EncodeError, Formatter, PackHooks, interpreting_formatter,
};
use crate::info::Described;
use crate::resolve::{self, Resolver};

// -----------------------------------------------------------------------------
// Array mode

#[derive(Pack, Clone, Debug, Default, PartialEq)]
struct Point {
    #[pack(key = 0)]
    x: i32,
    #[pack(key = 1)]
    y: i32,
}

#[test]
fn array_mode_encodes_members_by_key_order() {
    let resolver = Resolver::standard();
    let value = Point { x: 3, y: -4 };

    let bytes = resolve::serialize(&value, &resolver).unwrap();
    assert_eq!(bytes, [0x92, 0x03, 0xFC]);

    let back: Point = resolve::deserialize(&bytes, &resolver).unwrap();
    assert_eq!(back, value);
}

#[derive(Pack, Debug, Default, PartialEq)]
struct Sparse {
    #[pack(key = 0)]
    first: u8,
    #[pack(key = 3)]
    last: u8,
}

#[test]
fn unclaimed_array_positions_travel_as_nil_holes() {
    let resolver = Resolver::standard();
    let value = Sparse { first: 1, last: 2 };

    let bytes = resolve::serialize(&value, &resolver).unwrap();
    assert_eq!(bytes, [0x94, 0x01, 0xC0, 0xC0, 0x02]);

    let back: Sparse = resolve::deserialize(&bytes, &resolver).unwrap();
    assert_eq!(back, value);
}

#[derive(Pack, Debug, Default, PartialEq)]
struct Pair(u8, u8);

#[test]
fn tuple_structs_are_keyed_by_position() {
    let resolver = Resolver::standard();
    let bytes = resolve::serialize(&Pair(1, 2), &resolver).unwrap();
    assert_eq!(bytes, [0x92, 0x01, 0x02]);

    let back: Pair = resolve::deserialize(&bytes, &resolver).unwrap();
    assert_eq!(back, Pair(1, 2));
}

// -----------------------------------------------------------------------------
// Map mode

#[derive(Pack, Clone, Debug, Default, PartialEq)]
#[pack(map)]
struct User {
    id: u32,
    #[pack(name = "n")]
    name: String,
}

#[test]
fn map_mode_encodes_members_under_their_wire_names() {
    let resolver = Resolver::standard();
    let value = User {
        id: 7,
        name: String::from("ab"),
    };

    let bytes = resolve::serialize(&value, &resolver).unwrap();
    assert_eq!(
        bytes,
        [0x82, 0xA2, b'i', b'd', 0x07, 0xA1, b'n', 0xA2, b'a', b'b'],
    );

    let back: User = resolve::deserialize(&bytes, &resolver).unwrap();
    assert_eq!(back, value);
}

// -----------------------------------------------------------------------------
// Schema drift

#[derive(Pack, Debug, Default, PartialEq)]
struct RecordV1 {
    #[pack(key = 0)]
    id: u32,
    #[pack(key = 1)]
    score: u32,
}

#[derive(Pack, Debug, Default, PartialEq)]
struct RecordV2 {
    #[pack(key = 0)]
    id: u32,
    #[pack(key = 1)]
    score: u32,
    #[pack(key = 2)]
    verified: bool,
}

#[test]
fn an_old_reader_skips_members_it_does_not_know() {
    let resolver = Resolver::standard();
    let wide = RecordV2 {
        id: 1,
        score: 2,
        verified: true,
    };

    let bytes = resolve::serialize(&wide, &resolver).unwrap();
    let narrow: RecordV1 = resolve::deserialize(&bytes, &resolver).unwrap();
    assert_eq!(narrow, RecordV1 { id: 1, score: 2 });
}

#[test]
fn a_new_reader_defaults_members_the_wire_omits() {
    let resolver = Resolver::standard();
    let narrow = RecordV1 { id: 1, score: 2 };

    let bytes = resolve::serialize(&narrow, &resolver).unwrap();
    let wide: RecordV2 = resolve::deserialize(&bytes, &resolver).unwrap();
    assert_eq!(
        wide,
        RecordV2 {
            id: 1,
            score: 2,
            verified: false,
        },
    );
}

#[derive(Pack, Debug, Default, PartialEq)]
#[pack(map)]
struct MetaV1 {
    id: u32,
}

#[derive(Pack, Debug, Default, PartialEq)]
#[pack(map)]
struct MetaV2 {
    id: u32,
    label: String,
}

#[test]
fn map_mode_drift_works_in_both_directions() {
    let resolver = Resolver::standard();

    let wide = MetaV2 {
        id: 5,
        label: String::from("x"),
    };
    let bytes = resolve::serialize(&wide, &resolver).unwrap();
    let narrow: MetaV1 = resolve::deserialize(&bytes, &resolver).unwrap();
    assert_eq!(narrow, MetaV1 { id: 5 });

    let bytes = resolve::serialize(&MetaV1 { id: 5 }, &resolver).unwrap();
    let wide: MetaV2 = resolve::deserialize(&bytes, &resolver).unwrap();
    assert_eq!(
        wide,
        MetaV2 {
            id: 5,
            label: String::new(),
        },
    );
}

// -----------------------------------------------------------------------------
// Unit enums

#[derive(Pack, Clone, Copy, Debug, PartialEq)]
#[repr(u8)]
enum Suit {
    Clubs,
    Diamonds,
    Hearts = 10,
    Spades,
}

#[test]
fn unit_enums_travel_as_their_discriminant() {
    let resolver = Resolver::standard();

    let bytes = resolve::serialize(&Suit::Hearts, &resolver).unwrap();
    assert_eq!(bytes, [0x0A]);
    let back: Suit = resolve::deserialize(&bytes, &resolver).unwrap();
    assert_eq!(back, Suit::Hearts);

    let bytes = resolve::serialize(&Suit::Spades, &resolver).unwrap();
    assert_eq!(bytes, [0x0B]);
}

#[test]
fn unknown_enum_values_are_a_decode_error() {
    let resolver = Resolver::standard();
    let err = resolve::deserialize::<Suit>(&[0x05], &resolver).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::UnknownEnumValue {
            type_name: "Suit",
            value: 5,
        },
    ));
}

#[test]
fn enum_values_outside_the_representation_fail_before_matching() {
    let resolver = Resolver::standard();
    // uint16 300 cannot be a `u8` discriminant.
    let err = resolve::deserialize::<Suit>(&[0xCD, 0x01, 0x2C], &resolver).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Wire(WireError::OutOfRange {
            expected: "u8",
            offset: 0,
        }),
    ));
}

// -----------------------------------------------------------------------------
// Unions

#[derive(Pack, Clone, Debug, Default, PartialEq)]
struct Move {
    #[pack(key = 0)]
    dx: i32,
    #[pack(key = 1)]
    dy: i32,
}

#[derive(Union, Clone, Debug, PartialEq)]
enum Event {
    #[pack(key = 0)]
    Move(Move),
    #[pack(key = 5)]
    Quit,
}

#[test]
fn union_arms_encode_as_a_key_payload_pair() {
    let resolver = Resolver::standard();

    let value = Event::Move(Move { dx: 1, dy: 2 });
    let bytes = resolve::serialize(&value, &resolver).unwrap();
    assert_eq!(bytes, [0x92, 0x00, 0x92, 0x01, 0x02]);
    let back: Event = resolve::deserialize(&bytes, &resolver).unwrap();
    assert_eq!(back, value);

    let bytes = resolve::serialize(&Event::Quit, &resolver).unwrap();
    assert_eq!(bytes, [0x92, 0x05, 0xC0]);
    let back: Event = resolve::deserialize(&bytes, &resolver).unwrap();
    assert_eq!(back, Event::Quit);
}

#[test]
fn unions_without_a_fallback_reject_unknown_keys() {
    let resolver = Resolver::standard();
    let err = resolve::deserialize::<Event>(&[0x92, 0x63, 0xC0], &resolver).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::UnknownUnionKey {
            type_name: "Event",
            key: 99,
        },
    ));
}

#[test]
fn a_union_envelope_must_be_a_pair() {
    let resolver = Resolver::standard();
    let err = resolve::deserialize::<Event>(&[0x91, 0x00], &resolver).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::UnionArity {
            type_name: "Event",
            found: 1,
        },
    ));
}

#[derive(Union, Debug, PartialEq)]
enum Frame {
    #[pack(key = 0)]
    Data(Vec<u8>),
    #[pack(tolerant)]
    Unsupported,
}

#[test]
fn a_tolerant_arm_absorbs_unknown_keys_and_skips_their_payload() {
    let resolver = Resolver::standard();

    // Key 7 does not exist; its array payload is skipped whole.
    let back: Frame =
        resolve::deserialize(&[0x92, 0x07, 0x92, 0x01, 0x02], &resolver).unwrap();
    assert_eq!(back, Frame::Unsupported);

    // Known keys still decode normally.
    let bytes = resolve::serialize(&Frame::Data(vec![1, 2]), &resolver).unwrap();
    assert_eq!(bytes, [0x92, 0x00, 0x92, 0x01, 0x02]);
    let back: Frame = resolve::deserialize(&bytes, &resolver).unwrap();
    assert_eq!(back, Frame::Data(vec![1, 2]));

    // The tolerant arm itself is an ordinary unit arm on the wire.
    let bytes = resolve::serialize(&Frame::Unsupported, &resolver).unwrap();
    assert_eq!(bytes, [0x92, 0x01, 0xC0]);
}

// -----------------------------------------------------------------------------
// Derived and interpreting codecs agree

#[test]
fn interpreting_codecs_match_the_derived_bytes() {
    let resolver = Resolver::standard();

    fn check<T>(value: &T, resolver: &Resolver)
    where
        T: crate::Encode + Described + PartialEq + core::fmt::Debug + Send + Sync + 'static,
    {
        let typed = resolve::serialize(value, resolver).unwrap();

        let formatter = interpreting_formatter(T::descriptor()).unwrap();
        let mut erased = Vec::new();
        formatter
            .encode(value, &mut Writer::new(&mut erased), resolver)
            .unwrap();
        assert_eq!(typed, erased);

        let decoded = formatter
            .decode(&mut Reader::new(&typed), resolver)
            .unwrap();
        assert_eq!(decoded.downcast_ref::<T>(), Some(value));
    }

    check(&Point { x: 3, y: -4 }, &resolver);
    check(
        &User {
            id: 7,
            name: String::from("ab"),
        },
        &resolver,
    );
    check(&Event::Move(Move { dx: 1, dy: 2 }), &resolver);
    check(&Suit::Hearts, &resolver);
}

#[test]
fn erased_entry_points_match_the_typed_ones() {
    let resolver = Resolver::standard();
    let value = Point { x: 3, y: -4 };

    let typed = resolve::serialize(&value, &resolver).unwrap();
    let erased = resolve::serialize_erased(&value, &resolver).unwrap();
    assert_eq!(typed, erased);

    let back = resolve::deserialize_erased(Point::descriptor(), &typed, &resolver).unwrap();
    assert_eq!(back.downcast_ref::<Point>(), Some(&value));
}

// -----------------------------------------------------------------------------
// Generics

#[derive(Pack, Debug, Default, PartialEq)]
struct Wrapper<T> {
    #[pack(key = 0)]
    value: T,
    #[pack(key = 1)]
    count: u32,
}

#[test]
fn each_generic_instantiation_owns_its_descriptor() {
    let ints = <Wrapper<u32>>::descriptor();
    let strings = <Wrapper<String>>::descriptor();

    assert_eq!(ints.name(), "Wrapper<u32>");
    assert_eq!(strings.name(), "Wrapper<String>");
    assert!(!core::ptr::eq(ints, strings));

    // Asking again lands on the cached instance.
    assert!(core::ptr::eq(ints, <Wrapper<u32>>::descriptor()));
}

#[test]
fn generic_objects_round_trip() {
    let resolver = Resolver::standard();
    let value = Wrapper {
        value: String::from("hi"),
        count: 2,
    };

    let bytes = resolve::serialize(&value, &resolver).unwrap();
    assert_eq!(bytes, [0x92, 0xA2, b'h', b'i', 0x02]);

    let back: Wrapper<String> = resolve::deserialize(&bytes, &resolver).unwrap();
    assert_eq!(back, value);
}

// -----------------------------------------------------------------------------
// Hooks

static BEFORE_ENCODE_RUNS: AtomicUsize = AtomicUsize::new(0);

#[derive(Pack, Debug, Default, PartialEq)]
#[pack(hooks)]
struct Canonical {
    #[pack(key = 0)]
    text: String,
}

impl PackHooks for Canonical {
    fn before_encode(&self) {
        BEFORE_ENCODE_RUNS.fetch_add(1, Ordering::Relaxed);
    }

    fn after_decode(&mut self) {
        self.text.make_ascii_uppercase();
    }
}

#[test]
fn hooks_run_on_both_sides_of_the_wire() {
    let resolver = Resolver::standard();
    let value = Canonical {
        text: String::from("ok"),
    };

    let runs_before = BEFORE_ENCODE_RUNS.load(Ordering::Relaxed);
    let bytes = resolve::serialize(&value, &resolver).unwrap();
    assert!(BEFORE_ENCODE_RUNS.load(Ordering::Relaxed) > runs_before);

    let back: Canonical = resolve::deserialize(&bytes, &resolver).unwrap();
    assert_eq!(back.text, "OK");

    // The interpreting codec reaches the same hooks through the descriptor.
    let formatter = interpreting_formatter(Canonical::descriptor()).unwrap();
    let decoded = formatter
        .decode(&mut Reader::new(&bytes), &resolver)
        .unwrap();
    assert_eq!(decoded.downcast_ref::<Canonical>().unwrap().text, "OK");
}

// -----------------------------------------------------------------------------
// Field attributes

#[derive(Pack, Debug, Default, PartialEq)]
struct Cached {
    #[pack(key = 0)]
    id: u32,
    #[pack(ignore)]
    scratch: Vec<u8>,
}

#[test]
fn ignored_fields_never_touch_the_wire() {
    let resolver = Resolver::standard();
    let value = Cached {
        id: 5,
        scratch: vec![1, 2, 3],
    };

    let bytes = resolve::serialize(&value, &resolver).unwrap();
    assert_eq!(bytes, [0x91, 0x05]);

    let back: Cached = resolve::deserialize(&bytes, &resolver).unwrap();
    assert_eq!(back.id, 5);
    assert!(back.scratch.is_empty());
}

fn hex_formatter() -> &'static Formatter {
    fn encode(value: &u32, writer: &mut Writer<'_>, _: &Resolver) -> Result<(), EncodeError> {
        writer.write_str(&alloc::format!("{value:x}"))?;
        Ok(())
    }
    fn decode(reader: &mut Reader<'_>, _: &Resolver) -> Result<u32, DecodeError> {
        let text = reader.read_str()?;
        u32::from_str_radix(text, 16).map_err(DecodeError::custom)
    }
    static CELL: OnceLock<Formatter> = OnceLock::new();
    CELL.get_or_init(|| Formatter::from_fns::<u32>(encode, decode))
}

#[derive(Pack, Debug, Default, PartialEq)]
struct Styled {
    #[pack(key = 0, with = hex_formatter)]
    color: u32,
}

#[test]
fn member_formatter_overrides_replace_resolver_lookup() {
    let resolver = Resolver::standard();
    let value = Styled { color: 0xFF };

    let bytes = resolve::serialize(&value, &resolver).unwrap();
    assert_eq!(bytes, [0x91, 0xA2, b'f', b'f']);

    let back: Styled = resolve::deserialize(&bytes, &resolver).unwrap();
    assert_eq!(back, value);

    // Other `u32` members are untouched by the member-scoped override.
    let bytes = resolve::serialize(&Cached { id: 0xFF, scratch: Vec::new() }, &resolver).unwrap();
    assert_eq!(bytes, [0x91, 0xCC, 0xFF]);
}

#[derive(Pack, Clone, Debug, Default, PartialEq)]
#[pack(default)]
struct Settings {
    #[pack(key = 0)]
    volume: u8,
    #[pack(key = 1)]
    muted: bool,
}

#[test]
fn default_and_assign_types_rebuild_through_their_default() {
    let resolver = Resolver::standard();
    let value = Settings {
        volume: 9,
        muted: true,
    };

    let bytes = resolve::serialize(&value, &resolver).unwrap();
    assert_eq!(bytes, [0x92, 0x09, 0xC3]);
    let back: Settings = resolve::deserialize(&bytes, &resolver).unwrap();
    assert_eq!(back, value);

    // The interpreting codec rebuilds through `Default` plus assignment.
    let formatter = interpreting_formatter(Settings::descriptor()).unwrap();
    let decoded = formatter
        .decode(&mut Reader::new(&bytes), &resolver)
        .unwrap();
    assert_eq!(decoded.downcast_ref::<Settings>(), Some(&value));
}

// -----------------------------------------------------------------------------
// Collection over derived graphs

#[test]
fn derived_graphs_collect_without_findings() {
    let set = collect::collect(Event::descriptor());

    assert!(set.diagnostics().is_empty());
    assert!(set.contains::<Event>());
    assert!(set.contains::<Move>());
    assert!(set.contains::<i32>());
}

// -----------------------------------------------------------------------------
// Auto-registration

crate::cfg::auto_register! {
    #[derive(Pack, Debug, PartialEq)]
    #[pack(auto_register)]
    struct Registered {
        #[pack(key = 0)]
        id: u32,
    }

    #[test]
    fn annotated_types_are_swept_into_the_builder() {
        let mut builder = crate::resolve::ResolverBuilder::standard();
        assert!(builder.auto_register());
        let resolver = builder.build();

        assert!(resolver.formatter_of::<Registered>().is_ok());
    }
}
