//! `derive(Union)` expansion.
//!
//! A union enum travels as a `[key, payload]` pair; unit arms carry nil in
//! the payload slot. Arms are keyed explicitly with `#[pack(key = ..)]` or
//! implicitly by variant index, and a unit arm marked `#[pack(tolerant)]`
//! absorbs unknown keys on decode.

use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::spanned::Spanned;

use crate::meta;

struct Arm<'a> {
    ident: &'a syn::Ident,
    name: String,
    key: u32,
    payload: Option<&'a syn::Type>,
}

pub(crate) fn expand(input: &syn::DeriveInput, data: &syn::DataEnum) -> syn::Result<TokenStream> {
    let format = meta::mopack_format();
    let alloc_ = meta::alloc_(&format);
    let wire_ = meta::wire_(&format);

    let type_attrs = meta::parse_type_attrs(&input.attrs)?;
    if type_attrs.map || type_attrs.hooks || type_attrs.default {
        return Err(syn::Error::new(
            input.ident.span(),
            "`map`, `hooks` and `default` do not apply to unions",
        ));
    }
    if let Some(param) = input.generics.params.first() {
        return Err(syn::Error::new(
            param.span(),
            "generic parameters are not supported on unions",
        ));
    }

    let ident = &input.ident;
    let ident_str = ident.to_string();

    // ------------------------------------------------------------------
    // Arms

    let mut arms: Vec<Arm<'_>> = Vec::new();
    let mut fallback: Option<usize> = None;
    for (index, variant) in data.variants.iter().enumerate() {
        let attrs = meta::parse_arm_attrs(&variant.attrs)?;
        let payload = match &variant.fields {
            syn::Fields::Unit => None,
            syn::Fields::Unnamed(fields) if fields.unnamed.len() == 1 => {
                Some(&fields.unnamed[0].ty)
            }
            _ => {
                return Err(syn::Error::new(
                    variant.span(),
                    "union arms are unit variants or single-payload tuple variants",
                ));
            }
        };

        let key = match &attrs.key {
            Some(lit) => lit.base10_parse()?,
            None => index as u32,
        };
        if let Some(clash) = arms.iter().find(|arm| arm.key == key) {
            return Err(syn::Error::new(
                variant.span(),
                format!("key {key} is already used by `{}`", clash.name),
            ));
        }

        if attrs.tolerant {
            if payload.is_some() {
                return Err(syn::Error::new(
                    variant.span(),
                    "the tolerant arm must be a unit variant; unknown payloads are skipped, \
                     not captured",
                ));
            }
            if fallback.is_some() {
                return Err(syn::Error::new(
                    variant.span(),
                    "only one arm can be tolerant",
                ));
            }
            fallback = Some(index);
        }

        arms.push(Arm {
            ident: &variant.ident,
            name: variant.ident.to_string(),
            key,
            payload,
        });
    }

    // ------------------------------------------------------------------
    // Descriptor

    let arm_tokens: Vec<TokenStream> = arms
        .iter()
        .map(|arm| {
            let key = arm.key;
            let name = &arm.name;
            match arm.payload {
                Some(ty) => quote! {
                    #format::info::UnionArm::new(
                        #key,
                        #name,
                        <#ty as #format::info::Described>::descriptor,
                    )
                },
                None => quote!(#format::info::UnionArm::unit(#key, #name)),
            }
        })
        .collect();

    let select_arms: Vec<TokenStream> = arms
        .iter()
        .enumerate()
        .map(|(index, arm)| {
            let variant = arm.ident;
            match arm.payload {
                Some(_) => quote! {
                    Self::#variant(payload) => (
                        #index,
                        ::core::option::Option::Some(
                            payload as &dyn #format::formatter::AnyPack,
                        ),
                    ),
                },
                None => quote! {
                    Self::#variant => (#index, ::core::option::Option::None),
                },
            }
        })
        .collect();

    let assemble_arms: Vec<TokenStream> = arms
        .iter()
        .enumerate()
        .map(|(index, arm)| {
            let variant = arm.ident;
            let name = &arm.name;
            match arm.payload {
                Some(ty) => quote! {
                    #index => match payload.and_then(|payload| payload.take::<#ty>().ok()) {
                        ::core::option::Option::Some(payload) => ::core::result::Result::Ok(
                            #alloc_::boxed::Box::new(Self::#variant(payload)),
                        ),
                        ::core::option::Option::None => ::core::result::Result::Err(
                            #format::info::ConstructError {
                                type_name: #ident_str,
                                member: #name,
                            },
                        ),
                    },
                },
                None => quote! {
                    #index => ::core::result::Result::Ok(
                        #alloc_::boxed::Box::new(Self::#variant),
                    ),
                },
            }
        })
        .collect();

    let select_body = if arms.is_empty() {
        quote! { match *value {} }
    } else {
        quote! {
            match value {
                #(#select_arms)*
            }
        }
    };

    let with_fallback = fallback.map(|index| quote!(.with_fallback(#index)));

    let descriptor_fn = quote! {
        fn descriptor() -> &'static #format::info::TypeDescriptor {
            static CELL: #format::impls::NonGenericDescriptorCell =
                #format::impls::NonGenericDescriptorCell::new();
            CELL.get_or_init(|| {
                #format::info::TypeDescriptor::Union(
                    #format::info::UnionDescriptor::new::<Self>(
                        #ident_str,
                        &[#(#arm_tokens),*],
                        #format::info::UnionAccess {
                            select: |value| {
                                let value = value.downcast_ref::<Self>()?;
                                ::core::option::Option::Some(#select_body)
                            },
                            assemble: |arm, payload| match arm {
                                #(#assemble_arms)*
                                _ => ::core::result::Result::Err(
                                    #format::info::ConstructError {
                                        type_name: #ident_str,
                                        member: "<arm>",
                                    },
                                ),
                            },
                        },
                    )
                    #with_fallback
                    .with_formatter(#format::impls::native_formatter::<Self>),
                )
            })
        }
    };

    // ------------------------------------------------------------------
    // Typed codec

    let encode_arms: Vec<TokenStream> = arms
        .iter()
        .map(|arm| {
            let variant = arm.ident;
            let key = Literal::u64_suffixed(u64::from(arm.key));
            match arm.payload {
                Some(_) => quote! {
                    Self::#variant(payload) => {
                        writer.write_uint(#key);
                        resolver.encode_value(payload, writer)?;
                    }
                },
                None => quote! {
                    Self::#variant => {
                        writer.write_uint(#key);
                        writer.write_nil();
                    }
                },
            }
        })
        .collect();

    let encode_match = if arms.is_empty() {
        quote! { match *self {} }
    } else {
        quote! {
            match self {
                #(#encode_arms)*
            }
        }
    };

    let decode_arms: Vec<TokenStream> = arms
        .iter()
        .map(|arm| {
            let variant = arm.ident;
            let key = arm.key;
            match arm.payload {
                Some(ty) => quote! {
                    #key => Self::#variant(resolver.decode_value::<#ty>(reader)?),
                },
                None => quote! {
                    #key => {
                        reader.read_nil()?;
                        Self::#variant
                    }
                },
            }
        })
        .collect();

    // Tolerant mode: unknown arms collapse into the fallback arm and their
    // payload is skipped without being interpreted.
    let unknown_key = match fallback {
        Some(index) => {
            let variant = arms[index].ident;
            quote! {
                {
                    reader.skip_value()?;
                    Self::#variant
                }
            }
        }
        None => quote! {
            return ::core::result::Result::Err(
                #format::formatter::DecodeError::UnknownUnionKey {
                    type_name: #ident_str,
                    key: __key,
                },
            )
        },
    };

    let auto_register =
        meta::auto_register_tokens(&format, ident, &input.generics, type_attrs.auto_register)?;

    // The resolver only comes into play for payload arms.
    let resolver_param = if arms.iter().any(|arm| arm.payload.is_some()) {
        quote!(resolver)
    } else {
        quote!(_resolver)
    };

    Ok(quote! {
        const _: () = {
            #[automatically_derived]
            impl #format::info::Described for #ident {
                #descriptor_fn
            }

            #[automatically_derived]
            impl #format::formatter::Encode for #ident {
                fn encode(
                    &self,
                    writer: &mut #wire_::Writer<'_>,
                    #resolver_param: &#format::resolve::Resolver,
                ) -> ::core::result::Result<(), #format::formatter::EncodeError> {
                    writer.write_array_header(2)?;
                    #encode_match
                    ::core::result::Result::Ok(())
                }
            }

            #[automatically_derived]
            impl #format::formatter::Decode for #ident {
                fn decode(
                    reader: &mut #wire_::Reader<'_>,
                    #resolver_param: &#format::resolve::Resolver,
                ) -> ::core::result::Result<Self, #format::formatter::DecodeError> {
                    let __len = reader.read_array_len()?;
                    if __len != 2 {
                        return ::core::result::Result::Err(
                            #format::formatter::DecodeError::UnionArity {
                                type_name: #ident_str,
                                found: __len,
                            },
                        );
                    }

                    let __offset = reader.position();
                    let __raw_key = reader.read_uint()?;
                    let ::core::result::Result::Ok(__key) = u32::try_from(__raw_key) else {
                        return ::core::result::Result::Err(
                            #format::formatter::DecodeError::Wire(
                                #wire_::WireError::OutOfRange {
                                    expected: "u32",
                                    offset: __offset,
                                },
                            ),
                        );
                    };

                    let __value = match __key {
                        #(#decode_arms)*
                        _ => #unknown_key,
                    };
                    ::core::result::Result::Ok(__value)
                }
            }

            #auto_register
        };
    })
}
