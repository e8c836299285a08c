use syn::parse::ParseStream;

use super::*;
use crate::utils::parse_key_value;

mod kw {
    syn::custom_keyword!(rename);
}

/// Derive `KeyArg` for a type.
pub fn expand(item: &syn::DeriveInput) -> Result<proc_macro2::TokenStream> {
    for attr in &item.attrs {
        if attr.path().is_ident("key_arg") {
            bail!(attr, "`key_arg` attributes belong on enum variants")
        }
    }

    let body = match &item.data {
        syn::Data::Enum(data)
            if data.variants.iter().all(|v| matches!(v.fields, syn::Fields::Unit)) =>
        {
            let mut arms = vec![];
            for variant in &data.variants {
                let ident = &variant.ident;
                let name = match rename(&variant.attrs)? {
                    Some(lit) => lit.value(),
                    None => ident.to_string(),
                };
                arms.push(quote! {
                    Self::#ident => ::tree_select::ArgKind::Primitive(
                        ::tree_select::Primitive::Str(#name)
                    )
                });
            }
            quote! { match *self { #(#arms,)* } }
        }
        syn::Data::Enum(data) => {
            for variant in &data.variants {
                if let Some(lit) = rename(&variant.attrs)? {
                    bail!(lit, "only enums with fieldless variants can rename variants")
                }
            }
            quote! { ::tree_select::ArgKind::Composite }
        }
        syn::Data::Struct(_) | syn::Data::Union(_) => {
            quote! { ::tree_select::ArgKind::Composite }
        }
    };

    let ident = &item.ident;
    let (impl_gen, type_gen, where_clause) = item.generics.split_for_impl();
    Ok(quote! {
        impl #impl_gen ::tree_select::KeyArg for #ident #type_gen #where_clause {
            #[inline]
            fn classify(&self) -> ::tree_select::ArgKind<'_> {
                #body
            }
        }
    })
}

/// Parse the `#[key_arg(rename = "...")]` attributes of a variant.
fn rename(attrs: &[syn::Attribute]) -> Result<Option<syn::LitStr>> {
    let mut name = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("key_arg")) {
        attr.parse_args_with(|input: ParseStream| {
            let Some(lit) = parse_key_value::<kw::rename, syn::LitStr>(input)? else {
                return Err(input.error("tree-select: expected `rename = \"...\"`"));
            };
            if !input.is_empty() {
                return Err(input.error("tree-select: unexpected tokens"));
            }
            name = Some(lit);
            Ok(())
        })?;
    }
    Ok(name)
}
