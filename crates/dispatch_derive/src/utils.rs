use quote::quote;
use syn::{
    AngleBracketedGenericArguments, Data, DeriveInput, Field, GenericArgument, Path,
    PathArguments, Type, TypePath, punctuated::Punctuated, token::Comma,
};

/// Fields of a struct with named fields, or an error naming `derive`.
pub fn named_fields<'a>(
    input: &'a DeriveInput,
    derive: &str,
) -> syn::Result<&'a Punctuated<Field, Comma>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            syn::Fields::Named(named) => Ok(&named.named),
            _ => Err(syn::Error::new_spanned(
                &input.ident,
                format!("{derive} requires named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            &input.ident,
            format!("{derive} can only be derived for structs"),
        )),
    }
}

pub fn inner_of_option(ty: &Type) -> Option<&Type> {
    let Type::Path(TypePath { path, .. }) = ty else {
        return None;
    };
    let is_option = match path.segments.len() {
        1 => path.segments[0].ident == "Option",
        3 => {
            (path.segments[0].ident == "std" || path.segments[0].ident == "core")
                && path.segments[1].ident == "option"
                && path.segments[2].ident == "Option"
        }
        _ => false,
    };
    if !is_option {
        return None;
    }

    if let Some(seg) = path.segments.last()
        && let PathArguments::AngleBracketed(AngleBracketedGenericArguments { args, .. }) =
            &seg.arguments
        && let Some(GenericArgument::Type(inner)) = args.first()
    {
        return Some(inner);
    }
    None
}

/// Parse expression for a `--name value` pair. `Option<T>` fields parse `T`
/// and store `Some`; an empty value or `none` clears them.
pub fn build_cli_parse_expr(ty: &Type, parse_with: Option<&Path>) -> proc_macro2::TokenStream {
    if let Some(inner) = inner_of_option(ty) {
        let parse_inner = build_scalar_parse_expr(inner, parse_with);
        return quote! {
            if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(#parse_inner)
            }
        };
    }
    build_scalar_parse_expr(ty, parse_with)
}

fn build_scalar_parse_expr(ty: &Type, parse_with: Option<&Path>) -> proc_macro2::TokenStream {
    if let Some(parse_with) = parse_with {
        quote! { #parse_with(&raw)? }
    } else {
        quote! {
            raw.parse::<#ty>()
                .map_err(|e| crate::Error::invalid_input(format!(
                    "Invalid value for --{name}: {raw} ({e})"
                )))?
        }
    }
}

pub fn to_kebab_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (idx, ch) in s.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if idx != 0 {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::{build_cli_parse_expr, inner_of_option, to_kebab_case};

    #[test]
    fn inner_of_option_supports_short_and_qualified_paths() {
        let short_ty: syn::Type = parse_quote!(Option<u64>);
        let std_ty: syn::Type = parse_quote!(std::option::Option<String>);
        let non_opt: syn::Type = parse_quote!(Vec<String>);

        let short_inner = inner_of_option(&short_ty).expect("expected Option inner type");
        let std_inner = inner_of_option(&std_ty).expect("expected std Option inner type");

        assert_eq!(quote::quote!(#short_inner).to_string(), "u64");
        assert_eq!(quote::quote!(#std_inner).to_string(), "String");
        assert!(inner_of_option(&non_opt).is_none());
    }

    #[test]
    fn option_fields_parse_inner_type_and_wrap_in_some() {
        let ty: syn::Type = parse_quote!(Option<u64>);
        let expr = build_cli_parse_expr(&ty, None).to_string();

        assert!(expr.contains("Some"));
        assert!(expr.contains("parse :: < u64 >"));
    }

    #[test]
    fn parse_with_path_is_used_verbatim() {
        let ty: syn::Type = parse_quote!(LogLevel);
        let path: syn::Path = parse_quote!(LogLevel::parse);
        let expr = build_cli_parse_expr(&ty, Some(&path)).to_string();

        assert!(expr.contains("LogLevel :: parse"));
        assert!(!expr.contains("Some"));
    }

    #[test]
    fn to_kebab_case_inserts_dashes_before_ascii_uppercase() {
        assert_eq!(to_kebab_case("LogFormat"), "log-format");
        assert_eq!(to_kebab_case("already-kebab"), "already-kebab");
        assert_eq!(to_kebab_case("X"), "x");
    }
}
