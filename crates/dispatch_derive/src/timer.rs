use proc_macro::TokenStream;
use quote::quote;
use syn::{ItemFn, LitStr, parse_macro_input};

pub fn timer_inner(attr: TokenStream, item: TokenStream) -> TokenStream {
    let label = parse_macro_input!(attr as LitStr);
    let ItemFn {
        attrs,
        vis,
        sig,
        block,
    } = parse_macro_input!(item as ItemFn);

    if sig.asyncness.is_some() {
        return syn::Error::new_spanned(&sig, "#[timer] does not support async fns")
            .to_compile_error()
            .into();
    }

    let stmts = &block.stmts;
    let expanded = quote! {
        #(#attrs)*
        #vis #sig {
            let _elapsed_timer = crate::logging::ElapsedTimer::start(#label);
            #(#stmts)*
        }
    };

    TokenStream::from(expanded)
}
