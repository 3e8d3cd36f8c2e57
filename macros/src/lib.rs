use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, spanned::Spanned, Ident, ItemFn, LitStr};

const USAGE: &str = "rxflux_macro::test accepts no arguments, `local` or `shared`";

/// Test attribute used across the crate.
///
/// - `#[rxflux_macro::test]` on a sync fn expands to `#[test]`.
/// - On an async fn it expands to `#[tokio::test]` on a current-thread runtime.
/// - `#[rxflux_macro::test(shared)]` runs an async test on tokio's multi-thread
///   runtime, which hot publishers scheduled on tokio need.
#[proc_macro_attribute]
pub fn test(attr: TokenStream, item: TokenStream) -> TokenStream {
  let input = parse_macro_input!(item as ItemFn);
  let is_async = input.sig.asyncness.is_some();
  let raw_args = proc_macro2::TokenStream::from(attr);

  let flavor = if raw_args.is_empty() {
    None
  } else if !is_async {
    return compile_error(raw_args.span(), "flavor arguments are only supported for async tests");
  } else {
    let name = if let Ok(ident) = syn::parse2::<Ident>(raw_args.clone()) {
      ident.to_string()
    } else if let Ok(lit) = syn::parse2::<LitStr>(raw_args.clone()) {
      lit.value()
    } else {
      return compile_error(raw_args.span(), USAGE);
    };
    match name.as_str() {
      "local" => Some(quote!(flavor = "current_thread")),
      "shared" => Some(quote!(flavor = "multi_thread", worker_threads = 2)),
      _ => return compile_error(raw_args.span(), USAGE),
    }
  };

  let attr = match (is_async, flavor) {
    (false, _) => quote!(#[test]),
    (true, None) => quote!(#[tokio::test]),
    (true, Some(args)) => quote!(#[tokio::test(#args)]),
  };

  TokenStream::from(quote! {
    #attr
    #input
  })
}

fn compile_error(span: proc_macro2::Span, msg: &str) -> TokenStream {
  TokenStream::from(syn::Error::new(span, msg).to_compile_error())
}
