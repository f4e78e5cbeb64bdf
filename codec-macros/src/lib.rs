//! `#[derive(Decode, Encode)]` for packet bodies.
//!
//! Fields are read and written in declaration order. A field marked
//! `#[codec(prefixed_option)]` must be an `Option<String>` and is written
//! behind a boolean presence flag.

mod dec;
mod enc;

use proc_macro::TokenStream;
use syn::parse_macro_input;
use syn::spanned::Spanned as _;

#[proc_macro_derive(Decode, attributes(codec))]
pub fn derive_decode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    expand(&input, "Decode", dec::expand)
}

#[proc_macro_derive(Encode, attributes(codec))]
pub fn derive_encode(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    expand(&input, "Encode", enc::expand)
}

fn expand(
    input: &syn::DeriveInput,
    derive: &str,
    derive_impl: fn(&syn::DeriveInput, &[CodecField<'_>]) -> proc_macro2::TokenStream,
) -> TokenStream {
    match codec_fields(input, derive) {
        Ok(fields) => derive_impl(input, &fields).into(),
        Err(err) => err.to_compile_error().into(),
    }
}

enum FieldKind {
    Plain,
    PrefixedOption,
}

struct CodecField<'a> {
    ident: &'a syn::Ident,
    ty: &'a syn::Type,
    kind: FieldKind,
}

fn codec_fields<'a>(
    input: &'a syn::DeriveInput,
    derive: &str,
) -> syn::Result<Vec<CodecField<'a>>> {
    let fields = match &input.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(fields),
            ..
        }) => &fields.named,
        syn::Data::Struct(data) => {
            return Err(syn::Error::new(
                data.fields.span(),
                format!("{derive} can only be derived for structs with named fields"),
            ));
        }
        syn::Data::Enum(data) => {
            return Err(syn::Error::new(
                data.enum_token.span(),
                format!("enums are encoded by hand; derive {derive} only on structs"),
            ));
        }
        syn::Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span(),
                format!("{derive} cannot be derived for unions"),
            ));
        }
    };

    fields
        .iter()
        .map(|field| {
            let ident = field
                .ident
                .as_ref()
                .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;

            Ok(CodecField {
                ident,
                ty: &field.ty,
                kind: field_kind(&field.attrs)?,
            })
        })
        .collect()
}

fn field_kind(attrs: &[syn::Attribute]) -> syn::Result<FieldKind> {
    let mut kind = FieldKind::Plain;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("codec")) {
        attr.parse_nested_meta(|meta| {
            if !matches!(kind, FieldKind::Plain) {
                return Err(meta.error("a field takes at most one #[codec(...)] argument"));
            }

            if !meta.path.is_ident("prefixed_option") {
                return Err(meta.error(
                    "unsupported #[codec(...)] argument; expected `prefixed_option`",
                ));
            }
            kind = FieldKind::PrefixedOption;

            Ok(())
        })?;
    }

    Ok(kind)
}
