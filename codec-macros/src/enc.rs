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

    let writes = fields.iter().map(|field| {
        let ident = field.ident;
        let context = format!("Failed to encode {ident}");

        let value = match field.kind {
            FieldKind::Plain => quote!(&self.#ident),
            FieldKind::PrefixedOption => {
                quote!(&::codec::PrefixedOption::from(self.#ident.as_deref()))
            }
        };

        quote! {
            written_bytes += ::codec::enc::Encode::encode(#value, writer)
                .err_context(#context)?;
        }
    });

    quote! {
        impl #impl_generics ::codec::enc::Encode for #name #ty_generics #where_clause {
            fn encode<W: ::std::io::Write>(
                &self,
                writer: &mut W,
            ) -> ::core::result::Result<usize, ::codec::enc::EncodeError> {
                use ::codec::enc::EncodeErrorContext as _;
                let mut written_bytes = 0;
                #(#writes)*
                ::core::result::Result::Ok(written_bytes)
            }
        }
    }
}
