extern crate proc_macro;
extern crate proc_macro2;

/// Field attribute parsing.
mod attrs;
/// Support for struct auto-derive.
mod record_impl;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `PhpValue` and `Record` for a struct with named fields.
///
/// Field attributes:
///
/// * `#[php(rename = "key")]` - use `key` instead of the field name.
/// * `#[php(omitempty)]` - leave the field out when its value is empty.
/// * `#[php(string)]` - write a boolean, integer or float field as a string.
/// * `#[php(skip)]` - never write the field.
/// * `#[php(embed)]` - promote the fields of a nested record into this one.
///
/// `#[serde(rename, skip, skip_serializing, skip_serializing_if, flatten)]` are read as
/// a fallback when a field has no `php` attribute; other serde options are ignored.
#[proc_macro_derive(PhpRecord, attributes(php, serde))]
pub fn php_record_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    record_impl::php_record(&ast)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
