use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, Field, LitStr, parse_macro_input};

use crate::utils;

/// How a field's value is rendered after `key = `.
#[derive(Debug, PartialEq)]
enum Render {
    /// The field's own `Display`.
    Display,
    /// `.len()` of a collection.
    Len,
    /// `Option<T: Display>`, `-` when unset.
    Opt,
}

fn render_of(field: &Field) -> syn::Result<Render> {
    let mut render = Render::Display;
    for attr in field.attrs.iter().filter(|a| a.path().is_ident("kv")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("fmt") {
                return Err(meta.error("expected `fmt = \"len\" | \"opt\"`"));
            }
            let lit: LitStr = meta.value()?.parse()?;
            render = match lit.value().as_str() {
                "len" => Render::Len,
                "opt" => Render::Opt,
                "display" => Render::Display,
                other => {
                    return Err(syn::Error::new(
                        lit.span(),
                        format!("unknown kv fmt `{other}`"),
                    ));
                }
            };
            Ok(())
        })?;
    }
    Ok(render)
}

/// `Display` as one `\n\tkey = value` line per field, keys padded to the
/// longest one.
pub fn derive_kv_display_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let fields = utils::named_fields(input, "KvDisplay")?;
    let width = fields
        .iter()
        .filter_map(|f| f.ident.as_ref())
        .map(|ident| ident.to_string().len())
        .max()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = &field.ident else {
            continue;
        };
        let prefix = format!("\n\t{:<width$} = ", ident.to_string());
        lines.push(match render_of(field)? {
            Render::Display => quote! {
                f.write_str(#prefix)?;
                std::fmt::Display::fmt(&self.#ident, f)?;
            },
            Render::Len => quote! {
                f.write_str(#prefix)?;
                std::fmt::Display::fmt(&self.#ident.len(), f)?;
            },
            Render::Opt => quote! {
                f.write_str(#prefix)?;
                match &self.#ident {
                    Some(value) => std::fmt::Display::fmt(value, f)?,
                    None => f.write_str("-")?,
                }
            },
        });
    }

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics std::fmt::Display for #name #ty_generics #where_clause {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                #(#lines)*
                Ok(())
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use syn::{DeriveInput, parse_quote};

    use super::{Render, expand, render_of};
    use crate::utils::named_fields;

    #[test]
    fn render_mode_comes_from_the_kv_attribute() {
        let input: DeriveInput = parse_quote! {
            struct Summary {
                plain: String,
                #[kv(fmt = "len")]
                items: Vec<u8>,
                #[kv(fmt = "opt")]
                seed: Option<u64>,
            }
        };
        let modes: Vec<Render> = named_fields(&input, "KvDisplay")
            .expect("named")
            .iter()
            .map(|f| render_of(f).expect("mode"))
            .collect();
        assert_eq!(modes, vec![Render::Display, Render::Len, Render::Opt]);
    }

    #[test]
    fn unknown_mode_is_a_compile_error() {
        let input: DeriveInput = parse_quote! {
            struct Bad {
                #[kv(fmt = "hex")]
                value: u32,
            }
        };
        let err = expand(&input).expect_err("hex is not a mode");
        assert!(err.to_string().contains("unknown kv fmt `hex`"));
    }

    #[test]
    fn keys_are_padded_to_the_longest_field() {
        let input: DeriveInput = parse_quote! {
            struct Pair {
                a: u8,
                longer: u8,
            }
        };
        let expanded = expand(&input).expect("expand").to_string();
        assert!(expanded.contains(r#""\n\ta      = ""#), "{expanded}");
        assert!(expanded.contains(r#""\n\tlonger = ""#), "{expanded}");
    }
}
