//! Attribute parsing and shared helpers for the `Pack` and `Union` derives.

use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `mopack_format` crate.
///
/// Generated code cannot assume the invoking crate depends on
/// `mopack_format` directly; it may only see the facade. The caller's
/// `Cargo.toml` decides:
///
/// 1. For crates that depend on `mopack_format`, `::mopack_format` is returned.
/// 2. For crates that depend on `mopack`, `::mopack::format` is returned.
/// 3. For other situations, `::mopack_format` is returned, but this may be incorrect.
///
/// The cost of this function is relatively high (accessing files, obtaining
/// read-write lock permissions, querying content...), so the crate path is
/// obtained once per macro invocation and passed by parameter afterwards.
pub(crate) fn mopack_format() -> syn::Path {
    mopack_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("mopack_format"))
}

#[inline(always)]
pub(crate) fn alloc_(format: &syn::Path) -> TokenStream {
    quote! { #format::__macro_exports::alloc }
}

#[inline(always)]
pub(crate) fn wire_(format: &syn::Path) -> TokenStream {
    quote! { #format::__macro_exports::wire }
}

// -----------------------------------------------------------------------------
// Type-level attributes

/// `#[pack(..)]` flags that apply to the whole type.
#[derive(Default)]
pub(crate) struct TypeAttrs {
    /// String-keyed (map) wire mode. Structs with named fields only.
    pub map: bool,
    /// Invoke the type's `PackHooks` implementation around the codec.
    pub hooks: bool,
    /// Decode through `Default::default()` plus per-member assignment
    /// instead of a positional constructor.
    pub default: bool,
    /// Submit the type's formatter to the inventory sweep.
    pub auto_register: bool,
}

pub(crate) fn parse_type_attrs(attrs: &[syn::Attribute]) -> syn::Result<TypeAttrs> {
    let mut out = TypeAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("pack") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("map") {
                out.map = true;
            } else if meta.path.is_ident("hooks") {
                out.hooks = true;
            } else if meta.path.is_ident("default") {
                out.default = true;
            } else if meta.path.is_ident("auto_register") {
                out.auto_register = true;
            } else {
                return Err(meta.error(
                    "unknown type attribute; expected `map`, `hooks`, `default` or `auto_register`",
                ));
            }
            Ok(())
        })?;
    }
    Ok(out)
}

// -----------------------------------------------------------------------------
// Field-level attributes

/// `#[pack(..)]` flags on one struct field.
#[derive(Default)]
pub(crate) struct FieldAttrs {
    /// Explicit integer key (array mode).
    pub key: Option<syn::LitInt>,
    /// Explicit wire name (map mode); defaults to the field name.
    pub name: Option<syn::LitStr>,
    /// Leave the field out of the model; decode fills it with `Default`.
    pub ignore: bool,
    /// Path to a `fn() -> &'static Formatter` pinned to this member.
    pub with: Option<syn::Path>,
}

pub(crate) fn parse_field_attrs(attrs: &[syn::Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("pack") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("key") {
                out.key = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("name") {
                out.name = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("ignore") {
                out.ignore = true;
            } else if meta.path.is_ident("with") {
                out.with = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error(
                    "unknown field attribute; expected `key`, `name`, `ignore` or `with`",
                ));
            }
            Ok(())
        })?;
    }
    Ok(out)
}

// -----------------------------------------------------------------------------
// Variant-level attributes

/// `#[pack(..)]` flags on one union arm.
#[derive(Default)]
pub(crate) struct ArmAttrs {
    /// Explicit wire key; defaults to the variant index.
    pub key: Option<syn::LitInt>,
    /// Designates the fallback arm unknown keys decode into.
    pub tolerant: bool,
}

pub(crate) fn parse_arm_attrs(attrs: &[syn::Attribute]) -> syn::Result<ArmAttrs> {
    let mut out = ArmAttrs::default();
    for attr in attrs {
        if !attr.path().is_ident("pack") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("key") {
                out.key = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("tolerant") {
                out.tolerant = true;
            } else {
                return Err(meta.error("unknown arm attribute; expected `key` or `tolerant`"));
            }
            Ok(())
        })?;
    }
    Ok(out)
}

// -----------------------------------------------------------------------------
// Generics

/// Rejects parameter kinds the codec model cannot carry.
///
/// Described types are `Any`, so lifetime parameters are out; const
/// parameters have no place in a rendered type name.
pub(crate) fn check_type_params(generics: &syn::Generics) -> syn::Result<()> {
    if let Some(lifetime) = generics.lifetimes().next() {
        return Err(syn::Error::new(
            lifetime.span(),
            "types with lifetime parameters cannot derive `Pack`",
        ));
    }
    if let Some(param) = generics.const_params().next() {
        return Err(syn::Error::new(
            param.span(),
            "types with const parameters cannot derive `Pack`",
        ));
    }
    Ok(())
}

/// Clones the declaration generics with the codec bounds every parameter
/// needs: the codec traits for nesting, `Send + Sync` for erasure, and
/// `Default` for absent-member fallback.
pub(crate) fn codec_generics(generics: &syn::Generics, format: &syn::Path) -> syn::Generics {
    let mut generics = generics.clone();
    let predicates: Vec<syn::WherePredicate> = generics
        .type_params()
        .map(|param| {
            let ident = &param.ident;
            syn::parse_quote! {
                #ident: #format::formatter::Encode
                    + #format::formatter::Decode
                    + ::core::marker::Send
                    + ::core::marker::Sync
                    + ::core::default::Default
            }
        })
        .collect();
    generics
        .make_where_clause()
        .predicates
        .extend(predicates);
    generics
}

// -----------------------------------------------------------------------------
// Auto registration

/// Emits the inventory submission for `#[pack(auto_register)]`.
///
/// A no-op when the derive is built without the `auto_register` feature, so
/// the attribute can stay in user code unconditionally.
pub(crate) fn auto_register_tokens(
    format: &syn::Path,
    ident: &syn::Ident,
    generics: &syn::Generics,
    requested: bool,
) -> syn::Result<TokenStream> {
    if !requested {
        return Ok(TokenStream::new());
    }
    if let Some(param) = generics.type_params().next() {
        return Err(syn::Error::new(
            param.span(),
            "cannot auto-register a generic type; register each instantiation \
             on the builder instead",
        ));
    }

    #[cfg(not(feature = "auto_register"))]
    {
        let _ = (format, ident);
        Ok(TokenStream::new())
    }

    #[cfg(feature = "auto_register")]
    {
        let auto_register_ = quote! { #format::__macro_exports::auto_register };
        Ok(quote! {
            impl #auto_register_::__RegisterType for #ident {
                fn __register(builder: &mut #format::resolve::ResolverBuilder) {
                    builder.register::<#ident>();
                }
            }
            #auto_register_::inventory::submit! {
                #auto_register_::__AutoRegisterFunc(
                    <#ident as #auto_register_::__RegisterType>::__register
                )
            }
        })
    }
}

// -----------------------------------------------------------------------------
// Discriminants

/// Evaluates an enum discriminant expression to its integer value.
///
/// Only literal forms are supported; anything needing const evaluation is
/// rejected at the expression.
pub(crate) fn eval_discriminant(expr: &syn::Expr) -> syn::Result<i64> {
    match expr {
        syn::Expr::Lit(syn::ExprLit {
            lit: syn::Lit::Int(lit),
            ..
        }) => lit.base10_parse(),
        syn::Expr::Unary(syn::ExprUnary {
            op: syn::UnOp::Neg(_),
            expr,
            ..
        }) => Ok(-eval_discriminant(expr)?),
        syn::Expr::Group(group) => eval_discriminant(&group.expr),
        _ => Err(syn::Error::new_spanned(
            expr,
            "discriminant must be an integer literal",
        )),
    }
}

/// The integer representation of a unit enum, from its `#[repr(..)]`.
pub(crate) struct EnumRepr {
    /// `ScalarKind` variant name.
    pub kind: syn::Ident,
    /// The Rust integer type, for range checks.
    pub ty: syn::Ident,
    /// Display name used in out-of-range errors.
    pub name: &'static str,
}

pub(crate) fn parse_repr(attrs: &[syn::Attribute]) -> syn::Result<EnumRepr> {
    const KNOWN: &[(&str, &str)] = &[
        ("i8", "I8"),
        ("i16", "I16"),
        ("i32", "I32"),
        ("i64", "I64"),
        ("u8", "U8"),
        ("u16", "U16"),
        ("u32", "U32"),
        ("u64", "U64"),
    ];

    let mut found: Option<(&'static str, &'static str)> = None;
    for attr in attrs {
        if !attr.path().is_ident("repr") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            for &(ty, kind) in KNOWN {
                if meta.path.is_ident(ty) {
                    found = Some((ty, kind));
                    return Ok(());
                }
            }
            // repr(C), alignment and the like do not affect the wire model.
            Ok(())
        })?;
    }

    // Enums without an integer repr model as i32, matching their widest
    // portable discriminant range in practice.
    let (ty, kind) = found.unwrap_or(("i32", "I32"));
    Ok(EnumRepr {
        kind: syn::Ident::new(kind, proc_macro2::Span::call_site()),
        ty: syn::Ident::new(ty, proc_macro2::Span::call_site()),
        name: ty,
    })
}
