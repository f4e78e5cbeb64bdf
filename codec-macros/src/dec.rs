use proc_macro2::TokenStream;
use quote::quote;

use crate::{
    CodecField,
    FieldKind,
};

pub fn expand(
    input: &syn::DeriveInput,
    fields: &[CodecField<'_>],
) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let reads = fields.iter().map(|field| {
        let CodecField {
            ident,
            ty,
            kind,
        } = field;
        let context = format!("Failed to decode {ident}");

        match kind {
            FieldKind::Plain => quote! {
                let #ident = <#ty as ::codec::dec::Decode>::decode(reader)
                    .err_context(#context)?;
            },
            FieldKind::PrefixedOption => quote! {
                let #ident: #ty = <::codec::PrefixedOption<_> as ::codec::dec::Decode>::decode(reader)
                    .err_context(#context)?
                    .into_option();
            },
        }
    });
    let idents = fields.iter().map(|field| field.ident);

    quote! {
        impl #impl_generics ::codec::dec::Decode for #name #ty_generics #where_clause {
            fn decode<R: ::std::io::Read>(
                reader: &mut R,
            ) -> ::core::result::Result<Self, ::codec::dec::DecodeError> {
                use ::codec::dec::DecodeErrorContext as _;
                #(#reads)*
                ::core::result::Result::Ok(Self { #(#idents),* })
            }
        }
    }
}
