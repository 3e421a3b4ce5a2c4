use proc_macro::TokenStream;
use proc_macro2::Ident;
use quote::quote;
use syn::{Attribute, DataEnum, DataStruct, DeriveInput, Field, Fields, LitStr, Result, Type};

/// Field names listed in `#[converter(ignored = "a, b")]` on the type.
fn ignored_fields(attrs: &[Attribute]) -> Result<Vec<String>> {
    let mut ignored = Vec::new();
    for attr in attrs {
        if attr.path().is_ident("converter") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("ignored") {
                    let names: LitStr = meta.value()?.parse()?;
                    ignored.extend(
                        names
                            .value()
                            .split(',')
                            .map(|name| name.trim().to_string())
                            .filter(|name| !name.is_empty()),
                    );
                    Ok(())
                } else {
                    Err(meta.error("unsupported converter option, expected `ignored`"))
                }
            })?;
        }
    }
    Ok(ignored)
}

pub(crate) fn generate_convertible_for_struct(
    ast: &DeriveInput,
    data: &DataStruct,
) -> Result<TokenStream> {
    let ignored = ignored_fields(&ast.attrs)?;

    let fields: Vec<&Field> = match &data.fields {
        Fields::Named(fields) => fields.named.iter().collect(),
        _ => {
            return Err(syn::Error::new_spanned(
                &ast.ident,
                "only structs with named fields are supported",
            ))
        }
    };

    let mut stored_idents: Vec<&Ident> = Vec::with_capacity(fields.len());
    let mut stored_names: Vec<String> = Vec::with_capacity(fields.len());
    let mut initializers: Vec<proc_macro2::TokenStream> = Vec::with_capacity(fields.len());

    for field in &fields {
        let ident = match &field.ident {
            Some(ident) => ident,
            None => continue,
        };
        let name = ident.to_string();
        let ty: &Type = &field.ty;

        if ignored.contains(&name) {
            initializers.push(quote! { #ident: ::core::default::Default::default() });
        } else {
            initializers.push(quote! {
                #ident: tessera::common::field_value::<#ty>(doc, #name)?
            });
            stored_idents.push(ident);
            stored_names.push(name);
        }
    }

    let name = &ast.ident;
    let type_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let gen = quote! {
        impl #impl_generics tessera::common::Convertible for #name #ty_generics #where_clause {
            type Output = Self;

            fn to_value(&self) -> tessera::errors::TesseraResult<tessera::common::Value> {
                let mut doc = tessera::collection::Document::new();
                #(doc.set(#stored_names, tessera::common::Convertible::to_value(&self.#stored_idents)?);)*
                Ok(tessera::common::Value::Document(doc))
            }

            fn from_value(value: &tessera::common::Value) -> tessera::errors::TesseraResult<Self::Output> {
                match value {
                    tessera::common::Value::Document(doc) => Ok(#name {
                        #(#initializers,)*
                    }),
                    other => {
                        Err(tessera::common::mapping_error(&format!(
                            "Cannot map {} to {}",
                            other.type_name(),
                            #type_name
                        )))
                    }
                }
            }
        }
    };

    Ok(TokenStream::from(gen))
}

/// Unit-only enums map to and from their variant name as a string.
pub(crate) fn generate_convertible_for_enum(
    ast: &DeriveInput,
    data: &DataEnum,
) -> Result<TokenStream> {
    let name = &ast.ident;
    let type_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let mut variant_idents = Vec::with_capacity(data.variants.len());
    let mut variant_names = Vec::with_capacity(data.variants.len());
    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                "only unit variants are supported",
            ));
        }
        variant_idents.push(&variant.ident);
        variant_names.push(variant.ident.to_string());
    }

    let gen = quote! {
        impl #impl_generics tessera::common::Convertible for #name #ty_generics #where_clause {
            type Output = Self;

            fn to_value(&self) -> tessera::errors::TesseraResult<tessera::common::Value> {
                let variant = match self {
                    #(#name::#variant_idents => #variant_names,)*
                };
                Ok(tessera::common::Value::from(variant))
            }

            fn from_value(value: &tessera::common::Value) -> tessera::errors::TesseraResult<Self::Output> {
                match value {
                    tessera::common::Value::String(variant) => match variant.as_str() {
                        #(#variant_names => Ok(#name::#variant_idents),)*
                        unknown => {
                            Err(tessera::common::mapping_error(&format!(
                                "Unknown {} variant '{}'",
                                #type_name,
                                unknown
                            )))
                        }
                    },
                    other => {
                        Err(tessera::common::mapping_error(&format!(
                            "Cannot map {} to {}",
                            other.type_name(),
                            #type_name
                        )))
                    }
                }
            }
        }
    };

    Ok(TokenStream::from(gen))
}
