#![recursion_limit = "128"]
//! # Tessera Derive Macros
//!
//! `#[derive(Convertible)]` implements `tessera::common::Convertible` so a
//! type can be mapped to and from a document with `Document::map_to` and
//! `Document::from_convertible`.
//!
//! - Structs with named fields map to a document with one field per struct
//!   field. Reading goes through the same coercions as the typed getters.
//! - Enums with unit variants map to the variant name as a string.
//! - `#[converter(ignored = "a, b")]` on a struct leaves those fields out
//!   of the document and fills them with `Default::default()` when reading.
//!
//! # Examples
//!
//! ```rust,ignore
//! use tessera_derive::Convertible;
//!
//! #[derive(Convertible)]
//! #[converter(ignored = "session")]
//! pub struct User {
//!     pub name: String,
//!     pub age: u32,
//!     pub role: Role,
//!     pub session: Option<String>,
//! }
//!
//! #[derive(Convertible)]
//! pub enum Role {
//!     Admin,
//!     Member,
//! }
//! ```

extern crate proc_macro;
mod convertible;

use crate::convertible::{generate_convertible_for_enum, generate_convertible_for_struct};
use proc_macro::TokenStream;
use syn::{Data, DeriveInput};

/// Derives `tessera::common::Convertible`.
#[proc_macro_derive(Convertible, attributes(converter))]
pub fn derive_convert(input: TokenStream) -> TokenStream {
    let ast = syn::parse_macro_input!(input as DeriveInput);

    let result = match ast.data {
        Data::Struct(ref data) => generate_convertible_for_struct(&ast, data),
        Data::Enum(ref data) => generate_convertible_for_enum(&ast, data),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &ast.ident,
            "Convertible cannot be derived for unions",
        )),
    };

    match result {
        Ok(token_stream) => token_stream,
        Err(e) => {
            let error = syn::Error::new(
                e.span(),
                format!("Failed to derive Convertible for '{}': {}", ast.ident, e),
            );
            error.to_compile_error().into()
        }
    }
}
