//! `derive(Pack)` expansion for structs.
//!
//! A struct becomes an object: `Described` publishes an `ObjectDescriptor`
//! with member accessor tables, and the generated `Encode`/`Decode` impls
//! carry the same wire layout in static form, so the typed and the
//! descriptor-interpreting paths produce identical bytes.

use proc_macro2::{Literal, Span, TokenStream};
use quote::{format_ident, quote};
use syn::spanned::Spanned;

use crate::meta;

/// One serialized member after key resolution.
struct Member {
    access: syn::Member,
    rust_name: String,
    ty: syn::Type,
    with: Option<syn::Path>,
    key: WireKey,
    span: Span,
}

enum WireKey {
    Int(u32),
    Name(String),
}

pub(crate) fn expand(
    input: &syn::DeriveInput,
    data: &syn::DataStruct,
) -> syn::Result<TokenStream> {
    let format = meta::mopack_format();
    let alloc_ = meta::alloc_(&format);
    let wire_ = meta::wire_(&format);

    meta::check_type_params(&input.generics)?;
    let type_attrs = meta::parse_type_attrs(&input.attrs)?;

    let ident = &input.ident;
    let ident_str = ident.to_string();

    let named = matches!(data.fields, syn::Fields::Named(_));
    if type_attrs.map && !named {
        return Err(syn::Error::new(
            ident.span(),
            "`#[pack(map)]` requires named fields",
        ));
    }

    // ------------------------------------------------------------------
    // Key resolution

    let mut members: Vec<Member> = Vec::new();
    // Declaration order; `Some(id)` indexes `members` before sorting.
    let mut declared: Vec<(syn::Member, Option<usize>)> = Vec::new();

    for (index, field) in data.fields.iter().enumerate() {
        let attrs = meta::parse_field_attrs(&field.attrs)?;
        let (access, rust_name) = match &field.ident {
            Some(ident) => (syn::Member::Named(ident.clone()), ident.to_string()),
            None => (
                syn::Member::Unnamed(syn::Index::from(index)),
                index.to_string(),
            ),
        };

        if attrs.ignore {
            if attrs.key.is_some() || attrs.name.is_some() || attrs.with.is_some() {
                return Err(syn::Error::new(
                    field.span(),
                    "an ignored field takes no other `pack` attributes",
                ));
            }
            declared.push((access, None));
            continue;
        }

        let key = if !named {
            if let Some(name) = &attrs.name {
                return Err(syn::Error::new(
                    name.span(),
                    "tuple struct fields are keyed by position, not by name",
                ));
            }
            match &attrs.key {
                Some(lit) => WireKey::Int(lit.base10_parse()?),
                None => WireKey::Int(index as u32),
            }
        } else if type_attrs.map {
            if let Some(key) = &attrs.key {
                return Err(syn::Error::new(
                    key.span(),
                    "integer keys are not allowed in string-keyed mode",
                ));
            }
            let name = attrs
                .name
                .as_ref()
                .map_or_else(|| rust_name.clone(), syn::LitStr::value);
            if name.is_empty() {
                return Err(syn::Error::new(field.span(), "member name must not be empty"));
            }
            WireKey::Name(name)
        } else {
            if let Some(name) = &attrs.name {
                return Err(syn::Error::new(
                    name.span(),
                    "`name` requires the type to be `#[pack(map)]`",
                ));
            }
            let Some(key) = &attrs.key else {
                return Err(syn::Error::new(
                    field.span(),
                    "missing `#[pack(key = ..)]`; key every field or mark the type `#[pack(map)]`",
                ));
            };
            WireKey::Int(key.base10_parse()?)
        };

        declared.push((access.clone(), Some(members.len())));
        members.push(Member {
            access,
            rust_name,
            ty: field.ty.clone(),
            with: attrs.with,
            key,
            span: field.span(),
        });
    }

    // Duplicates point at the later field.
    {
        let mut ints = std::collections::HashMap::new();
        let mut names = std::collections::HashMap::new();
        for member in &members {
            let clash = match &member.key {
                WireKey::Int(key) => ints.insert(*key, ()).map(|()| key.to_string()),
                WireKey::Name(name) => names.insert(name.clone(), ()).map(|()| name.clone()),
            };
            if let Some(key) = clash {
                return Err(syn::Error::new(
                    member.span,
                    format!("duplicate key `{key}`"),
                ));
            }
        }
    }

    // Members travel in slot order: key order for arrays, declaration order
    // for maps. Mirrors the descriptor's own member ordering.
    let mut order: Vec<usize> = (0..members.len()).collect();
    if !type_attrs.map {
        order.sort_by_key(|&id| match members[id].key {
            WireKey::Int(key) => key,
            WireKey::Name(_) => u32::MAX,
        });
    }
    let mut slot_of_id = vec![0usize; members.len()];
    for (slot, &id) in order.iter().enumerate() {
        slot_of_id[id] = slot;
    }
    let slots: Vec<&Member> = order.iter().map(|&id| &members[id]).collect();

    // ------------------------------------------------------------------
    // Shared pieces

    let is_generic = input.generics.type_params().next().is_some();
    let codec_generics = meta::codec_generics(&input.generics, &format);
    let (impl_generics, ty_generics, where_clause) = codec_generics.split_for_impl();

    let member_tokens: Vec<TokenStream> = slots
        .iter()
        .map(|member| member_descriptor(&format, &alloc_, member))
        .collect();

    let constructor = if type_attrs.default {
        quote! {
            #format::info::ConstructorBinding::DefaultAndAssign {
                make: || #alloc_::boxed::Box::new(
                    <Self as ::core::default::Default>::default(),
                ),
            }
        }
    } else {
        positional_constructor(&format, &alloc_, &declared, &slots, &slot_of_id)
    };

    let hooks = type_attrs.hooks.then(|| {
        quote! {
            .with_hooks(#format::info::HookTable {
                before_encode: |value| {
                    if let ::core::option::Option::Some(value) = value.downcast_ref::<Self>() {
                        #format::formatter::PackHooks::before_encode(value);
                    }
                },
                after_decode: |value| {
                    if let ::core::option::Option::Some(value) = value.downcast_mut::<Self>() {
                        #format::formatter::PackHooks::after_decode(value);
                    }
                },
            })
        }
    });

    let key_mode = if type_attrs.map {
        quote!(#format::info::KeyMode::Str)
    } else {
        quote!(#format::info::KeyMode::Int)
    };

    let object = |name_expr: TokenStream, generics_tokens: Option<TokenStream>| {
        quote! {
            #format::info::TypeDescriptor::Object(
                #format::info::ObjectDescriptor::new::<Self>(
                    #name_expr,
                    #key_mode,
                    &[#(#member_tokens),*],
                )
                #generics_tokens
                .with_constructor(#constructor)
                #hooks
                .with_formatter(#format::impls::native_formatter::<Self>),
            )
        }
    };

    let descriptor_fn = if is_generic {
        let params: Vec<&syn::Ident> = input
            .generics
            .type_params()
            .map(|param| &param.ident)
            .collect();
        let param_strs: Vec<String> = params.iter().map(|param| param.to_string()).collect();
        let mut name_parts = vec![quote!(#ident_str), quote!("<")];
        for (index, param) in params.iter().enumerate() {
            if index > 0 {
                name_parts.push(quote!(", "));
            }
            name_parts
                .push(quote!(<#param as #format::info::Described>::descriptor().name()));
        }
        name_parts.push(quote!(">"));
        let generics_tokens = quote! {
            .with_generics(#format::info::Generics::from_args(&[
                #(#format::info::GenericArg::new(
                    #param_strs,
                    <#params as #format::info::Described>::descriptor,
                )),*
            ]))
        };
        let object = object(quote!(name.as_str()), Some(generics_tokens));
        quote! {
            fn descriptor() -> &'static #format::info::TypeDescriptor {
                static NAME: #format::impls::GenericNameCell =
                    #format::impls::GenericNameCell::new();
                static CELL: #format::impls::GenericDescriptorCell =
                    #format::impls::GenericDescriptorCell::new();
                CELL.get_or_insert::<Self>(|| {
                    let name = NAME.get_or_insert::<Self>(|| {
                        #format::impls::concat(&[#(#name_parts),*])
                    });
                    #object
                })
            }
        }
    } else {
        let object = object(quote!(#ident_str), None);
        quote! {
            fn descriptor() -> &'static #format::info::TypeDescriptor {
                static CELL: #format::impls::NonGenericDescriptorCell =
                    #format::impls::NonGenericDescriptorCell::new();
                CELL.get_or_init(|| #object)
            }
        }
    };

    // ------------------------------------------------------------------
    // Typed codec

    let before_hook = type_attrs
        .hooks
        .then(|| quote! { #format::formatter::PackHooks::before_encode(self); });
    let after_hook = type_attrs
        .hooks
        .then(|| quote! { #format::formatter::PackHooks::after_decode(&mut __value); });

    let encode_body = if type_attrs.map {
        encode_map_mode(&format, &slots, &before_hook)
    } else {
        encode_array_mode(&format, &slots, &before_hook)
    };

    let decode_body = decode_body(
        &format,
        &type_attrs,
        &declared,
        &slots,
        &slot_of_id,
        &after_hook,
    );

    let auto_register = meta::auto_register_tokens(
        &format,
        ident,
        &input.generics,
        type_attrs.auto_register,
    )?;

    // Objects with no serialized members never touch the resolver.
    let resolver_param = if slots.is_empty() {
        quote!(_resolver)
    } else {
        quote!(resolver)
    };

    Ok(quote! {
        const _: () = {
            #[automatically_derived]
            impl #impl_generics #format::info::Described for #ident #ty_generics #where_clause {
                #descriptor_fn
            }

            #[automatically_derived]
            impl #impl_generics #format::formatter::Encode for #ident #ty_generics #where_clause {
                fn encode(
                    &self,
                    writer: &mut #wire_::Writer<'_>,
                    #resolver_param: &#format::resolve::Resolver,
                ) -> ::core::result::Result<(), #format::formatter::EncodeError> {
                    #encode_body
                }
            }

            #[automatically_derived]
            impl #impl_generics #format::formatter::Decode for #ident #ty_generics #where_clause {
                fn decode(
                    reader: &mut #wire_::Reader<'_>,
                    #resolver_param: &#format::resolve::Resolver,
                ) -> ::core::result::Result<Self, #format::formatter::DecodeError> {
                    #decode_body
                }
            }

            #auto_register
        };
    })
}

// -----------------------------------------------------------------------------
// Descriptor pieces

fn member_descriptor(format: &syn::Path, alloc_: &TokenStream, member: &Member) -> TokenStream {
    let rust_name = &member.rust_name;
    let ty = &member.ty;
    let access = &member.access;

    let key = match &member.key {
        WireKey::Int(key) => quote!(#format::info::MemberKey::Int(#key)),
        WireKey::Name(name) => quote!(#format::info::MemberKey::Name(#name)),
    };
    let formatter = member
        .with
        .as_ref()
        .map(|with| quote!(.with_formatter(#with)));

    quote! {
        #format::info::MemberDescriptor::new(
            #rust_name,
            #key,
            <#ty as #format::info::Described>::descriptor,
        )
        #formatter
        .with_access(#format::info::MemberAccess {
            get: ::core::option::Option::Some(|value| {
                let value = value.downcast_ref::<Self>()?;
                ::core::option::Option::Some(&value.#access)
            }),
            assign: ::core::option::Option::Some(|target, value| {
                let ::core::option::Option::Some(target) = target.downcast_mut::<Self>() else {
                    let value: #alloc_::boxed::Box<dyn ::core::any::Any> = value;
                    return ::core::result::Result::Err(value);
                };
                match value.take::<#ty>() {
                    ::core::result::Result::Ok(value) => {
                        target.#access = value;
                        ::core::result::Result::Ok(())
                    }
                    ::core::result::Result::Err(value) => {
                        let value: #alloc_::boxed::Box<dyn ::core::any::Any> = value;
                        ::core::result::Result::Err(value)
                    }
                }
            }),
            make_default: ::core::option::Option::Some(|| {
                #alloc_::boxed::Box::new(<#ty as ::core::default::Default>::default())
            }),
        })
    }
}

fn positional_constructor(
    format: &syn::Path,
    alloc_: &TokenStream,
    declared: &[(syn::Member, Option<usize>)],
    slots: &[&Member],
    slot_of_id: &[usize],
) -> TokenStream {
    let named = declared
        .first()
        .is_none_or(|(access, _)| matches!(access, syn::Member::Named(_)));

    let inits: Vec<TokenStream> = declared
        .iter()
        .map(|(access, id)| {
            let value = match id {
                Some(id) => {
                    let slot = slot_of_id[*id];
                    let member = slots[slot];
                    let ty = &member.ty;
                    let rust_name = &member.rust_name;
                    quote! {
                        match slots.get_mut(#slot).and_then(::core::option::Option::take) {
                            ::core::option::Option::Some(value) => match value.take::<#ty>() {
                                ::core::result::Result::Ok(value) => value,
                                ::core::result::Result::Err(_) => {
                                    return ::core::result::Result::Err(
                                        #format::info::ConstructError {
                                            type_name:
                                                <Self as #format::info::Described>::descriptor()
                                                    .name(),
                                            member: #rust_name,
                                        },
                                    );
                                }
                            },
                            ::core::option::Option::None => ::core::default::Default::default(),
                        }
                    }
                }
                None => quote!(::core::default::Default::default()),
            };
            if named {
                quote!(#access: #value)
            } else {
                value
            }
        })
        .collect();

    let literal = if declared.is_empty() {
        if named {
            quote!(Self {})
        } else {
            quote!(Self)
        }
    } else if named {
        quote!(Self { #(#inits),* })
    } else {
        quote!(Self(#(#inits),*))
    };

    quote! {
        #format::info::ConstructorBinding::Positional {
            construct: |slots| {
                ::core::result::Result::Ok(#alloc_::boxed::Box::new(#literal))
            },
        }
    }
}

// -----------------------------------------------------------------------------
// Encode

/// Primitive numeric and boolean members skip resolver dispatch entirely;
/// their own codec impl is the whole fast path. Syntactic match only, so a
/// renamed alias falls back to the resolver route, which is still correct.
fn is_shortcut_scalar(ty: &syn::Type) -> bool {
    const SCALARS: &[&str] = &[
        "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize", "f32", "f64",
        "bool",
    ];
    let syn::Type::Path(path) = ty else {
        return false;
    };
    path.qself.is_none()
        && path
            .path
            .get_ident()
            .is_some_and(|ident| SCALARS.iter().any(|name| ident == name))
}

fn member_encode_stmt(format: &syn::Path, member: &Member) -> TokenStream {
    let access = &member.access;
    let ty = &member.ty;
    match &member.with {
        Some(with) => quote! { #with().encode(&self.#access, writer, resolver)?; },
        None if is_shortcut_scalar(ty) => quote! {
            <#ty as #format::formatter::Encode>::encode(&self.#access, writer, resolver)?;
        },
        None => quote! { resolver.encode_value(&self.#access, writer)?; },
    }
}

fn encode_array_mode(
    format: &syn::Path,
    slots: &[&Member],
    before_hook: &Option<TokenStream>,
) -> TokenStream {
    let array_len = slots
        .iter()
        .map(|member| match member.key {
            WireKey::Int(key) => key as usize + 1,
            WireKey::Name(_) => 0,
        })
        .max()
        .unwrap_or(0);

    let mut cursor = slots.iter().peekable();
    let positions: Vec<TokenStream> = (0..array_len)
        .map(|position| {
            let claimed = cursor
                .next_if(|member| matches!(member.key, WireKey::Int(key) if key as usize == position));
            match claimed {
                Some(member) => member_encode_stmt(format, member),
                // A gap between claimed keys encodes as a nil hole.
                None => quote! { writer.write_nil(); },
            }
        })
        .collect();

    quote! {
        #before_hook
        writer.write_array_header(#array_len)?;
        #(#positions)*
        ::core::result::Result::Ok(())
    }
}

fn encode_map_mode(
    format: &syn::Path,
    slots: &[&Member],
    before_hook: &Option<TokenStream>,
) -> TokenStream {
    let count = slots.len();
    let entries: Vec<TokenStream> = slots
        .iter()
        .map(|member| {
            let WireKey::Name(name) = &member.key else {
                unreachable!("map mode members carry name keys");
            };
            let value = member_encode_stmt(format, member);
            quote! {
                writer.write_str(#name)?;
                #value
            }
        })
        .collect();

    quote! {
        #before_hook
        writer.write_map_header(#count)?;
        #(#entries)*
        ::core::result::Result::Ok(())
    }
}

// -----------------------------------------------------------------------------
// Decode

fn member_decode_expr(format: &syn::Path, member: &Member) -> TokenStream {
    let ty = &member.ty;
    if member.with.is_none() && is_shortcut_scalar(ty) {
        return quote! { <#ty as #format::formatter::Decode>::decode(reader, resolver)? };
    }
    match &member.with {
        Some(with) => quote! {
            {
                let __decoded = #with().decode(reader, resolver)?;
                let __found = __decoded.descriptor().name();
                match __decoded.take::<#ty>() {
                    ::core::result::Result::Ok(__decoded) => __decoded,
                    ::core::result::Result::Err(_) => {
                        return ::core::result::Result::Err(
                            #format::formatter::DecodeError::ValueType {
                                expected: <#ty as #format::info::Described>::descriptor().name(),
                                found: __found,
                            },
                        );
                    }
                }
            }
        },
        None => quote! { resolver.decode_value::<#ty>(reader)? },
    }
}

fn decode_body(
    format: &syn::Path,
    type_attrs: &meta::TypeAttrs,
    declared: &[(syn::Member, Option<usize>)],
    slots: &[&Member],
    slot_of_id: &[usize],
    after_hook: &Option<TokenStream>,
) -> TokenStream {
    let slot_vars: Vec<syn::Ident> = (0..slots.len())
        .map(|slot| format_ident!("__member_{slot}"))
        .collect();
    let slot_decls: Vec<TokenStream> = slots
        .iter()
        .zip(&slot_vars)
        .map(|(member, var)| {
            let ty = &member.ty;
            quote! {
                let mut #var: ::core::option::Option<#ty> = ::core::option::Option::None;
            }
        })
        .collect();

    let fill = if type_attrs.map {
        let arms: Vec<TokenStream> = slots
            .iter()
            .zip(&slot_vars)
            .map(|(member, var)| {
                let WireKey::Name(name) = &member.key else {
                    unreachable!("map mode members carry name keys");
                };
                let bytes = syn::LitByteStr::new(name.as_bytes(), member.span);
                let len = name.len();
                let first = Literal::u8_suffixed(name.as_bytes()[0]);
                let value = member_decode_expr(format, member);
                // Length and first byte split the key space before the full
                // comparison runs.
                quote! {
                    (#len, ::core::option::Option::Some(#first)) if __key == #bytes =>
                        #var = ::core::option::Option::Some(#value),
                }
            })
            .collect();
        quote! {
            let __len = reader.read_map_len()?;
            for _ in 0..__len {
                let __key = reader.read_str_bytes()?;
                match (__key.len(), __key.first().copied()) {
                    #(#arms)*
                    _ => reader.skip_value()?,
                }
            }
        }
    } else {
        let arms: Vec<TokenStream> = slots
            .iter()
            .zip(&slot_vars)
            .filter_map(|(member, var)| {
                let WireKey::Int(key) = member.key else {
                    return None;
                };
                let position = key as usize;
                let value = member_decode_expr(format, member);
                Some(quote! {
                    #position => #var = ::core::option::Option::Some(#value),
                })
            })
            .collect();
        quote! {
            let __len = reader.read_array_len()?;
            for __position in 0..__len {
                match __position {
                    #(#arms)*
                    // Gap positions and data from a wider schema.
                    _ => reader.skip_value()?,
                }
            }
        }
    };

    let build = if type_attrs.default {
        let assigns: Vec<TokenStream> = slots
            .iter()
            .zip(&slot_vars)
            .map(|(member, var)| {
                let access = &member.access;
                quote! {
                    if let ::core::option::Option::Some(member) = #var {
                        __value.#access = member;
                    }
                }
            })
            .collect();
        quote! {
            let mut __value: Self = ::core::default::Default::default();
            #(#assigns)*
        }
    } else {
        let named = declared
            .first()
            .is_none_or(|(access, _)| matches!(access, syn::Member::Named(_)));
        let inits: Vec<TokenStream> = declared
            .iter()
            .map(|(access, id)| {
                let value = match id {
                    Some(id) => {
                        let var = &slot_vars[slot_of_id[*id]];
                        quote!(#var.unwrap_or_default())
                    }
                    None => quote!(::core::default::Default::default()),
                };
                if named {
                    quote!(#access: #value)
                } else {
                    value
                }
            })
            .collect();
        let literal = if declared.is_empty() {
            if named {
                quote!(Self {})
            } else {
                quote!(Self)
            }
        } else if named {
            quote!(Self { #(#inits),* })
        } else {
            quote!(Self(#(#inits),*))
        };
        if after_hook.is_some() {
            quote! { let mut __value = #literal; }
        } else {
            quote! { let __value = #literal; }
        }
    };

    quote! {
        #(#slot_decls)*
        #fill
        #build
        #after_hook
        ::core::result::Result::Ok(__value)
    }
}
