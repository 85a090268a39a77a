//! `derive(Pack)` expansion for unit enums.
//!
//! A unit enum models as an `EnumDescriptor` and travels as its underlying
//! integer value. Enums with payload-carrying variants belong to
//! `derive(Union)` and are redirected there with a compile error.

use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::spanned::Spanned;

use crate::meta;

pub(crate) fn expand(input: &syn::DeriveInput, data: &syn::DataEnum) -> syn::Result<TokenStream> {
    let format = meta::mopack_format();
    let alloc_ = meta::alloc_(&format);
    let wire_ = meta::wire_(&format);

    let type_attrs = meta::parse_type_attrs(&input.attrs)?;
    if type_attrs.map || type_attrs.hooks || type_attrs.default {
        return Err(syn::Error::new(
            input.ident.span(),
            "`map`, `hooks` and `default` do not apply to unit enums",
        ));
    }
    if let Some(param) = input.generics.params.first() {
        return Err(syn::Error::new(
            param.span(),
            "generic parameters are not supported on unit enums",
        ));
    }

    let ident = &input.ident;
    let ident_str = ident.to_string();
    let repr = meta::parse_repr(&input.attrs)?;

    // ------------------------------------------------------------------
    // Variant values

    let mut variants: Vec<(&syn::Ident, i64)> = Vec::new();
    let mut next_value = 0i64;
    for variant in &data.variants {
        if !matches!(variant.fields, syn::Fields::Unit) {
            return Err(syn::Error::new(
                variant.span(),
                "variants with payloads derive `Union`, not `Pack`",
            ));
        }
        let value = match &variant.discriminant {
            Some((_, expr)) => meta::eval_discriminant(expr)?,
            None => next_value,
        };
        if let Some((clash, _)) = variants.iter().find(|(_, existing)| *existing == value) {
            return Err(syn::Error::new(
                variant.span(),
                format!("discriminant {value} is already used by `{clash}`"),
            ));
        }
        variants.push((&variant.ident, value));
        next_value = value + 1;
    }

    let names: Vec<String> = variants.iter().map(|(ident, _)| ident.to_string()).collect();
    let idents: Vec<&syn::Ident> = variants.iter().map(|(ident, _)| *ident).collect();
    let values: Vec<Literal> = variants
        .iter()
        .map(|(_, value)| Literal::i64_suffixed(*value))
        .collect();

    // ------------------------------------------------------------------
    // Descriptor

    let repr_kind = &repr.kind;
    let to_value_match = if variants.is_empty() {
        // Uninhabited; the selector can never be reached with an instance.
        quote! { match *value {} }
    } else {
        quote! {
            match value {
                #(Self::#idents => #values,)*
            }
        }
    };

    let descriptor_fn = quote! {
        fn descriptor() -> &'static #format::info::TypeDescriptor {
            static CELL: #format::impls::NonGenericDescriptorCell =
                #format::impls::NonGenericDescriptorCell::new();
            CELL.get_or_init(|| {
                #format::info::TypeDescriptor::Enum(
                    #format::info::EnumDescriptor::new::<Self>(
                        #ident_str,
                        #format::info::ScalarKind::#repr_kind,
                        &[#(#format::info::EnumVariant::new(#names, #values)),*],
                        |value| {
                            let value = value.downcast_ref::<Self>()?;
                            ::core::option::Option::Some(#to_value_match)
                        },
                        |value| match value {
                            #(#values => ::core::option::Option::Some(
                                #alloc_::boxed::Box::new(Self::#idents),
                            ),)*
                            _ => ::core::option::Option::None,
                        },
                    )
                    .with_formatter(#format::impls::native_formatter::<Self>),
                )
            })
        }
    };

    // ------------------------------------------------------------------
    // Typed codec

    let encode_value = if variants.is_empty() {
        quote! { match *self {} }
    } else {
        quote! {
            match self {
                #(Self::#idents => #values,)*
            }
        }
    };

    // The declared width bounds accepted wire values, exactly like the
    // descriptor-interpreting codec.
    let repr_name = repr.name;
    let range_check = match repr.name {
        "i64" => None,
        "u64" => Some(quote! {
            if __value < 0 {
                return ::core::result::Result::Err(#format::formatter::DecodeError::Wire(
                    #wire_::WireError::OutOfRange { expected: #repr_name, offset: __offset },
                ));
            }
        }),
        _ => {
            let repr_ty = &repr.ty;
            Some(quote! {
                if <#repr_ty as ::core::convert::TryFrom<i64>>::try_from(__value).is_err() {
                    return ::core::result::Result::Err(#format::formatter::DecodeError::Wire(
                        #wire_::WireError::OutOfRange { expected: #repr_name, offset: __offset },
                    ));
                }
            })
        }
    };
    let offset_binding = range_check
        .is_some()
        .then(|| quote! { let __offset = reader.position(); });

    let auto_register =
        meta::auto_register_tokens(&format, ident, &input.generics, type_attrs.auto_register)?;

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
                    _resolver: &#format::resolve::Resolver,
                ) -> ::core::result::Result<(), #format::formatter::EncodeError> {
                    writer.write_int(#encode_value);
                    ::core::result::Result::Ok(())
                }
            }

            #[automatically_derived]
            impl #format::formatter::Decode for #ident {
                fn decode(
                    reader: &mut #wire_::Reader<'_>,
                    _resolver: &#format::resolve::Resolver,
                ) -> ::core::result::Result<Self, #format::formatter::DecodeError> {
                    #offset_binding
                    let __value = reader.read_int()?;
                    #range_check
                    match __value {
                        #(#values => ::core::result::Result::Ok(Self::#idents),)*
                        _ => ::core::result::Result::Err(
                            #format::formatter::DecodeError::UnknownEnumValue {
                                type_name: #ident_str,
                                value: __value,
                            },
                        ),
                    }
                }
            }

            #auto_register
        };
    })
}
