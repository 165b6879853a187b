use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Variant, parse_macro_input};

use crate::utils;

/// Accepted spellings of one enum variant.
struct Spelling {
    ident: Ident,
    canonical: String,
    aliases: Vec<String>,
}

impl Spelling {
    fn of(variant: &Variant) -> syn::Result<Self> {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "CliValue variants must not carry data",
            ));
        }
        let mut spelling = Self {
            ident: variant.ident.clone(),
            canonical: utils::to_kebab_case(&variant.ident.to_string()),
            aliases: Vec::new(),
        };
        for attr in variant.attrs.iter().filter(|a| a.path().is_ident("cli")) {
            attr.parse_nested_meta(|meta| {
                let lit: LitStr = meta.value()?.parse()?;
                if meta.path.is_ident("name") {
                    spelling.canonical = lit.value();
                } else if meta.path.is_ident("alias") {
                    spelling.aliases.push(lit.value());
                } else {
                    return Err(meta.error("expected `name` or `alias`"));
                }
                Ok(())
            })?;
        }
        Ok(spelling)
    }

    fn accepted(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.canonical.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// `#[cli_value(option = "...")]`, else the kebab-cased enum name.
fn option_name(attrs: &[Attribute], ident: &Ident) -> syn::Result<String> {
    let mut name = utils::to_kebab_case(&ident.to_string());
    for attr in attrs.iter().filter(|a| a.path().is_ident("cli_value")) {
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("option") {
                return Err(meta.error("expected `option = \"...\"`"));
            }
            name = meta.value()?.parse::<LitStr>()?.value();
            Ok(())
        })?;
    }
    Ok(name)
}

/// Unit enums as option values: `parse`, `as_str`, a `VALUES` list for
/// usage text and `Display`.
pub fn derive_cli_value_inner(item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "CliValue can only be derived for enums",
        ));
    };
    let option = option_name(&input.attrs, &input.ident)?;
    let spellings = data
        .variants
        .iter()
        .map(Spelling::of)
        .collect::<syn::Result<Vec<_>>>()?;

    let values = spellings
        .iter()
        .map(|s| s.canonical.as_str())
        .collect::<Vec<_>>()
        .join("|");
    let parse_arms = spellings.iter().map(|s| {
        let ident = &s.ident;
        let accepted = s.accepted();
        quote! { #(#accepted)|* => Ok(Self::#ident), }
    });
    let str_arms = spellings.iter().map(|s| {
        let ident = &s.ident;
        let canonical = &s.canonical;
        quote! { Self::#ident => #canonical, }
    });

    let name = &input.ident;
    Ok(quote! {
        impl #name {
            pub const VALUES: &'static str = #values;

            pub fn parse(raw: &str) -> crate::Result<Self> {
                let lowered = raw.trim().to_ascii_lowercase();
                match lowered.as_str() {
                    #(#parse_arms)*
                    _ => Err(crate::Error::invalid_input(format!(
                        "Invalid value for --{}: {} (expected {})",
                        #option,
                        raw,
                        Self::VALUES,
                    ))),
                }
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    #(#str_arms)*
                }
            }
        }

        impl std::fmt::Display for #name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use syn::{DeriveInput, Variant, parse_quote};

    use super::{Spelling, expand};

    #[test]
    fn variant_spellings_default_to_kebab_case_plus_aliases() {
        let variant: Variant = parse_quote! {
            #[cli(alias = "k-means")]
            Kmeans
        };
        let spelling = Spelling::of(&variant).expect("spelling");
        assert_eq!(spelling.accepted().collect::<Vec<_>>(), vec!["kmeans", "k-means"]);

        let renamed: Variant = parse_quote! {
            #[cli(name = "lat")]
            Latitude
        };
        assert_eq!(Spelling::of(&renamed).expect("spelling").canonical, "lat");
    }

    #[test]
    fn data_carrying_variants_are_rejected() {
        let input: DeriveInput = parse_quote! {
            enum Mode { Fast(u8), Slow }
        };
        let err = expand(&input).expect_err("tuple variant");
        assert!(err.to_string().contains("must not carry data"));
    }

    #[test]
    fn values_list_every_canonical_spelling() {
        let input: DeriveInput = parse_quote! {
            enum LogFormat { Compact, Pretty }
        };
        let expanded = expand(&input).expect("expand").to_string();
        assert!(expanded.contains(r#""compact|pretty""#), "{expanded}");
    }
}
