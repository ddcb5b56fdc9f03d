//! Attribute parsing for `#[tag(...)]` annotations.
//!
//! Each `name = "value"` entry becomes one `(name, value)` pair; the runtime
//! crate renders the pairs into the field's `name:"value"` tag blob.

use syn::{Field, Lit};

/// Tag entries collected from a field's `#[tag(...)]` attributes.
#[derive(Debug, Default)]
pub struct FieldTags {
    /// `(name, value)` pairs in declaration order.
    pub pairs: Vec<(String, String)>,
}

impl FieldTags {
    /// Collect every `#[tag(...)]` attribute on `field`.
    ///
    /// Multiple attributes concatenate. Non-string values and bare names are
    /// rejected with an error spanning the offending entry.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut tags = Self::default();

        for attr in &field.attrs {
            if !attr.path().is_ident("tag") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                let name = meta
                    .path
                    .get_ident()
                    .ok_or_else(|| meta.error("tag name must be a single identifier"))?
                    .to_string();

                if !meta.input.peek(syn::Token![=]) {
                    return Err(meta.error(format!("tag `{name}` needs a value: {name} = \"...\"")));
                }

                let value = meta.value()?;
                match value.parse::<Lit>()? {
                    Lit::Str(s) => tags.pairs.push((name, s.value())),
                    other => {
                        return Err(syn::Error::new_spanned(
                            other,
                            format!("tag `{name}` value must be a string literal"),
                        ))
                    }
                }
                Ok(())
            })?;
        }

        Ok(tags)
    }
}
