extern crate proc_macro;

macro_rules! bail {
    ($item:expr, $fmt:literal $($tts:tt)*) => {
        return Err(Error::new_spanned(
            &$item,
            format!(concat!("tree-select: ", $fmt) $($tts)*)
        ))
    }
}

mod key_arg;
mod utils;

use proc_macro::TokenStream;
use quote::quote;
use syn::{Error, Result};

/// Classify a type as a selector argument.
///
/// Enums whose variants are all fieldless become primitive strings holding
/// the variant name, which can be changed with `#[key_arg(rename = "...")]`.
/// All other types are composite and need an explicit cache key function.
///
/// ```ignore
/// #[derive(KeyArg)]
/// enum Period {
///     Day,
///     #[key_arg(rename = "week")]
///     Week,
/// }
///
/// #[derive(KeyArg)]
/// struct Query {
///     period: Period,
///     quantity: u32,
/// }
/// ```
#[proc_macro_derive(KeyArg, attributes(key_arg))]
pub fn derive_key_arg(stream: TokenStream) -> TokenStream {
    let item = syn::parse_macro_input!(stream as syn::DeriveInput);
    key_arg::expand(&item)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
