use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, Ident, ItemFn, LitStr};

const USAGE: &str = "rxcore_macro::test only accepts: #[rxcore_macro::test], \
                     #[rxcore_macro::test(local)], #[rxcore_macro::test(shared)], or string \
                     equivalents";

/// Marks a test function.
///
/// Sync functions become plain `#[test]`s. Async functions run on a tokio
/// runtime: `local` (the default) is a current-thread runtime, `shared` a
/// multi-thread one.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let input = parse_macro_input!(item as ItemFn);
  let is_async = input.sig.asyncness.is_some();
  let raw_args = proc_macro2::TokenStream::from(attr);

  if !is_async {
    if !raw_args.is_empty() {
      return syn::Error::new(
        raw_args.span(),
        "rxcore_macro::test flavor args are only supported for async tests. Use \
         #[rxcore_macro::test] for sync tests, or make the function async.",
      )
      .to_compile_error()
      .into();
    }
    return quote!(#[test] #input).into();
  }

  let flavor = if raw_args.is_empty() {
    String::from("local")
  } else if let Ok(ident) = syn::parse2::<Ident>(raw_args.clone()) {
    ident.to_string()
  } else if let Ok(lit) = syn::parse2::<LitStr>(raw_args.clone()) {
    lit.value()
  } else {
    return syn::Error::new(raw_args.span(), USAGE)
      .to_compile_error()
      .into();
  };

  let tokio_args = match flavor.as_str() {
    "local" => quote!(flavor = "current_thread"),
    "shared" => quote!(flavor = "multi_thread", worker_threads = 2),
    _ => {
      return syn::Error::new(raw_args.span(), USAGE)
        .to_compile_error()
        .into();
    }
  };

  quote!(#[tokio::test(#tokio_args)] #input).into()
}
