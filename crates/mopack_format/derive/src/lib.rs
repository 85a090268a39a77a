//! Derive macros for the `mopack_format` codec model:
//!
//! - [`Pack`]: structs and unit enums
//! - [`Union`]: keyed polymorphic enums
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

// -----------------------------------------------------------------------------
// Modules

mod meta;
mod pack_enum;
mod pack_struct;
mod union_enum;

// -----------------------------------------------------------------------------
// Macros

/// # Serialization Derivation
///
/// `#[derive(Pack)]` implements the full codec surface for a type:
///
/// - `Described` (the static `TypeDescriptor`, with accessor tables)
/// - `Encode`
/// - `Decode`
///
/// A struct models as an object, a unit enum as its integer discriminant.
/// Enums whose variants carry payloads derive [`Union`] instead.
///
/// ## Keying
///
/// Every serialized member needs a wire key. Named structs pick one mode:
///
/// ```rust, ignore
/// // Array mode: integer keys, encoded as a dense positional array.
/// #[derive(Pack)]
/// struct Point {
///     #[pack(key = 0)]
///     x: f64,
///     #[pack(key = 1)]
///     y: f64,
/// }
///
/// // Map mode: string keys from the field names.
/// #[derive(Pack)]
/// #[pack(map)]
/// struct User {
///     id: u64,
///     #[pack(name = "display_name")]
///     name: String,
/// }
/// ```
///
/// Tuple structs are always array mode, keyed by position; `key` can
/// override a position. Mixing modes or reusing a key is a compile error on
/// the offending field. Keys may be sparse: unclaimed array positions
/// travel as nil holes, which is what lets a schema retire a field without
/// renumbering the rest.
///
/// ## Compatibility
///
/// Decoding tolerates both directions of schema drift: members the wire
/// carries but the type does not know are skipped, and members the type
/// declares but the wire omits fall back to `Default::default()`. Member
/// types therefore have to implement `Default` (as do generic type
/// parameters, which also need the codec traits and `Send + Sync`).
///
/// ## Field attributes
///
/// - `#[pack(key = <int>)]`: the array-mode key.
/// - `#[pack(name = "<str>")]`: the map-mode key, when the field name is
///   not the wire name.
/// - `#[pack(ignore)]`: leave the field out of the model; decode fills it
///   with `Default`.
/// - `#[pack(with = <path>)]`: pin the member to a custom formatter.
///   `path` is a `fn() -> &'static Formatter` and replaces resolver lookup
///   for this member only.
///
/// ## Type attributes
///
/// - `#[pack(map)]`: string-keyed mode (named structs only).
/// - `#[pack(default)]`: decode through `Default::default()` plus member
///   assignment instead of a positional constructor; requires the type
///   itself to implement `Default`.
/// - `#[pack(hooks)]`: call the type's `PackHooks` implementation before
///   encode and after decode.
/// - `#[pack(auto_register)]`: submit the type's formatter to the
///   inventory sweep picked up by `ResolverBuilder::auto_register`. A no-op
///   without the `auto_register` feature, and an error on generic types
///   (there is no way to know which instantiations exist).
///
/// ## Unit enums
///
/// A unit enum travels as its discriminant, range-checked against the
/// declared `#[repr(..)]` width (`i32` when unspecified). Discriminants
/// must be integer literals; unknown wire values are a decode error.
///
/// ```rust, ignore
/// #[derive(Pack)]
/// #[repr(u8)]
/// enum Suit {
///     Clubs,
///     Diamonds,
///     Hearts = 10,
///     Spades,
/// }
/// ```
#[proc_macro_derive(Pack, attributes(pack))]
pub fn derive_pack(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let expanded = match &ast.data {
        syn::Data::Struct(data) => pack_struct::expand(&ast, data),
        syn::Data::Enum(data) => pack_enum::expand(&ast, data),
        syn::Data::Union(_) => Err(syn::Error::new_spanned(
            &ast.ident,
            "C unions cannot derive `Pack`",
        )),
    };

    match expanded {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}

/// # Union Derivation
///
/// `#[derive(Union)]` models an enum as a closed set of keyed alternatives,
/// encoded as a `[key, payload]` pair. Arms are unit variants or
/// single-payload tuple variants:
///
/// ```rust, ignore
/// #[derive(Union)]
/// enum Shape {
///     #[pack(key = 0)]
///     Circle(Circle),
///     #[pack(key = 1)]
///     Rect(Rect),
///     #[pack(tolerant)]
///     Unknown,
/// }
/// ```
///
/// Without an explicit `#[pack(key = ..)]` an arm is keyed by its variant
/// index. Duplicate keys are a compile error.
///
/// ## Tolerant decode
///
/// By default an unknown wire key is a decode error (the closed-world
/// reading). Marking one unit arm `#[pack(tolerant)]` turns it into the
/// fallback: unknown keys decode into that arm and the unknown payload is
/// skipped, not captured.
///
/// `#[pack(auto_register)]` works as it does for [`Pack`].
#[proc_macro_derive(Union, attributes(pack))]
pub fn derive_union(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    let expanded = match &ast.data {
        syn::Data::Enum(data) => union_enum::expand(&ast, data),
        syn::Data::Struct(_) | syn::Data::Union(_) => Err(syn::Error::new_spanned(
            &ast.ident,
            "`Union` is derived on enums; structs derive `Pack`",
        )),
    };

    match expanded {
        Ok(tokens) => tokens.into(),
        Err(err) => err.into_compile_error().into(),
    }
}
