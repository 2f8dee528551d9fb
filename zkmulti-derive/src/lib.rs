//! Derive implementations used to build the zkmulti library.

extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Ident, Lit, Meta};

/// Derives `From<i32>` for a C-like enum with explicit discriminants.
///
/// By default an unmatched value panics. Deriving with
/// `#[EnumConvertFromIntFallback = "Variant"]` maps unmatched values to the
/// named variant instead, which is how evolving wire protocols are handled:
/// codes this library does not know about yet still convert.
#[proc_macro_derive(EnumConvertFromInt, attributes(EnumConvertFromIntFallback))]
pub fn enum_convert_from_int(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let variants = match input.data {
        Data::Enum(ref data) => &data.variants,
        _ => panic!("#[derive(EnumConvertFromInt)] is only defined for enums"),
    };

    let arms = variants.iter().map(|variant| {
        let ident = &variant.ident;
        quote! { c if c == #name::#ident as i32 => #name::#ident, }
    });
    let catchall = match fallback_variant(&input) {
        Some(ident) => quote! { _ => #name::#ident, },
        None => quote! { _ => panic!("unknown {} value {}", stringify!(#name), code), },
    };

    let expanded = quote! {
        impl ::std::convert::From<i32> for #name {
            fn from(code: i32) -> #name {
                match code {
                    #(#arms)*
                    #catchall
                }
            }
        }
    };
    expanded.into()
}

fn fallback_variant(input: &DeriveInput) -> Option<Ident> {
    let attr = input
        .attrs
        .iter()
        .find(|attr| attr.path.is_ident("EnumConvertFromIntFallback"))?;
    match attr.parse_meta() {
        Ok(Meta::NameValue(nv)) => match nv.lit {
            Lit::Str(s) => Some(Ident::new(&s.value(), s.span())),
            _ => panic!("EnumConvertFromIntFallback takes a string literal"),
        },
        _ => panic!("expected #[EnumConvertFromIntFallback = \"Variant\"]"),
    }
}

/// Derives `std::fmt::Display` and `std::error::Error` for an enum that
/// already derives `Debug`, using the variant name as the message.
#[proc_macro_derive(EnumError)]
pub fn enum_error(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    if !matches!(input.data, Data::Enum(_)) {
        panic!("#[derive(EnumError)] is only defined for enums");
    }

    let expanded = quote! {
        impl ::std::fmt::Display for #name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                ::std::fmt::Debug::fmt(self, f)
            }
        }

        impl ::std::error::Error for #name {}
    };
    expanded.into()
}
