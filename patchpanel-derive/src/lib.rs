//! Derive macro implementation for patchpanel

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields};

mod attrs;

use attrs::FieldTags;

/// `Tagged` derive macro
///
/// Implements `patchpanel::Tagged`, describing each named field's name,
/// declared type, and tag blob.
///
/// # Supported Attributes
///
/// **Field-level**:
/// - `#[tag(name = "value", ...)]`: one `name:"value"` tag per entry. Repeat
///   the attribute to add more.
///
/// # Example
///
/// See the `patchpanel` crate documentation for usage examples.
#[proc_macro_derive(Tagged, attributes(tag))]
pub fn derive_tagged(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "Tagged does not support generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "Tagged only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(input, "Tagged only supports structs"));
        }
    };

    let descriptors = fields
        .iter()
        .map(|field| {
            let tags = FieldTags::from_field(field)?;
            let tag = if tags.pairs.is_empty() {
                quote! { ::patchpanel::StructTag::default() }
            } else {
                let names = tags.pairs.iter().map(|(name, _)| name);
                let values = tags.pairs.iter().map(|(_, value)| value);
                quote! {
                    ::patchpanel::StructTag::from_pairs([#((#names, #values)),*])
                }
            };
            let field_type = &field.ty;
            let name = field
                .ident
                .as_ref()
                .map(|ident| ident.to_string())
                .unwrap_or_default();
            let name = name.strip_prefix("r#").unwrap_or(&name).to_string();

            Ok(quote! {
                ::patchpanel::FieldDescriptor::new(
                    #name,
                    ::patchpanel::TypeKey::of::<#field_type>(),
                    #tag,
                )
            })
        })
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        impl ::patchpanel::Tagged for #struct_name {
            fn type_info() -> &'static ::patchpanel::TypeInfo {
                static INFO: ::std::sync::OnceLock<::patchpanel::TypeInfo> =
                    ::std::sync::OnceLock::new();
                INFO.get_or_init(|| {
                    ::patchpanel::TypeInfo::Struct(::patchpanel::StructInfo::new(
                        ::patchpanel::TypeKey::of::<#struct_name>(),
                        ::std::vec![#(#descriptors),*],
                    ))
                })
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn error_of(input: DeriveInput) -> String {
        expand(&input).unwrap_err().to_string()
    }

    #[test]
    fn test_rejects_generic_struct() {
        let input: DeriveInput = parse_quote! {
            struct Wrapper<T> { inner: T }
        };
        assert_eq!(error_of(input), "Tagged does not support generic structs");
    }

    #[test]
    fn test_rejects_tuple_and_unit_structs() {
        let tuple: DeriveInput = parse_quote! { struct Port(i64); };
        assert_eq!(
            error_of(tuple),
            "Tagged only supports structs with named fields"
        );

        let unit: DeriveInput = parse_quote! { struct Marker; };
        assert_eq!(
            error_of(unit),
            "Tagged only supports structs with named fields"
        );
    }

    #[test]
    fn test_rejects_enum() {
        let input: DeriveInput = parse_quote! {
            enum Level { Low, High }
        };
        assert_eq!(error_of(input), "Tagged only supports structs");
    }

    #[test]
    fn test_expands_raw_identifier_without_prefix() {
        let input: DeriveInput = parse_quote! {
            struct Route {
                #[tag(default = "GET")]
                r#type: String,
            }
        };
        let expanded = expand(&input).unwrap().to_string();
        assert!(expanded.contains("\"type\""));
        assert!(!expanded.contains("\"r#type\""));
    }
}
