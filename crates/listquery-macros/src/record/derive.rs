//! Implementation of the `#[derive(Record)]` macro.
//!
//! Generates a `Record` impl plus field name constants from struct
//! annotations.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_record_attrs, FieldKind};

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut field_arms: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut seen: Vec<String> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_record_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        // Unannotated fields stay invisible to queries
        let kind = match attrs.kind {
            Some(kind) => kind,
            None if attrs.optional || attrs.rename.is_some() => {
                return Err(Error::new(
                    field.span(),
                    "record field needs a kind: String, Number, Bool, or Timestamp",
                ))
            }
            None => continue,
        };

        let query_name = attrs.rename.unwrap_or_else(|| field_name.to_string());
        if seen.contains(&query_name) {
            return Err(Error::new(
                field.span(),
                format!("duplicate record field name '{}'", query_name),
            ));
        }
        seen.push(query_name.clone());

        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));
        field_constants.push(quote! {
            /// Field name constant for queries.
            pub const #const_name: &'static str = #query_name;
        });

        let value_expr = if attrs.optional {
            let inner = format_ident!("value");
            let present = kind_expr(kind, quote! { #inner }, true);
            quote! {
                match &self.#field_name {
                    ::core::option::Option::Some(#inner) => #present,
                    ::core::option::Option::None => ::listquery::Value::Null,
                }
            }
        } else {
            kind_expr(kind, quote! { self.#field_name }, false)
        };

        field_arms.push(quote! {
            #query_name => #value_expr,
        });
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::listquery::Record for #struct_name #ty_generics #where_clause {
            fn field(&self, name: &str) -> ::listquery::Value<'_> {
                match name {
                    #(#field_arms)*
                    _ => ::listquery::Value::Undefined,
                }
            }
        }
    };

    Ok(expanded)
}

/// Builds the `Value` expression for one field.
///
/// `by_ref` is set when `place` is already a reference (the `Some` binding
/// of an optional field).
fn kind_expr(kind: FieldKind, place: TokenStream, by_ref: bool) -> TokenStream {
    let borrowed = if by_ref {
        place.clone()
    } else {
        quote! { &#place }
    };
    let copied = if by_ref {
        quote! { *#place }
    } else {
        place
    };

    match kind {
        FieldKind::String => quote! {
            ::listquery::Value::String(::core::convert::AsRef::<str>::as_ref(#borrowed))
        },
        FieldKind::Number => quote! {
            ::listquery::Value::Number(::listquery::Number::from(#copied))
        },
        FieldKind::Bool => quote! {
            ::listquery::Value::Bool(#copied)
        },
        FieldKind::Timestamp => quote! {
            ::listquery::Value::Timestamp(
                ::listquery::RecordTimestamp::record_timestamp(#borrowed)
            )
        },
    }
}

/// Convert a string to SCREAMING_SNAKE_CASE.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' || c == '.' || c == ' ' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = c.is_alphanumeric();
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screaming_snake_case() {
        assert_eq!(to_screaming_snake_case("code"), "CODE");
        assert_eq!(to_screaming_snake_case("issued_on"), "ISSUED_ON");
        assert_eq!(to_screaming_snake_case("customerId"), "CUSTOMER_ID");
        assert_eq!(to_screaming_snake_case("due-date"), "DUE_DATE");
        assert_eq!(to_screaming_snake_case("HTTPStatus"), "HTTPSTATUS");
    }

    #[test]
    fn derive_rejects_tuple_structs() {
        let input: DeriveInput = syn::parse_quote! {
            struct Pair(String, u32);
        };
        let err = record_derive_impl(input).unwrap_err();
        assert!(err.to_string().contains("named fields"));
    }

    #[test]
    fn derive_rejects_duplicate_names() {
        let input: DeriveInput = syn::parse_quote! {
            struct Row {
                #[record(String)]
                code: String,
                #[record(String, rename = "code")]
                alt_code: String,
            }
        };
        let err = record_derive_impl(input).unwrap_err();
        assert!(err.to_string().contains("duplicate record field name"));
    }

    #[test]
    fn derive_requires_kind_with_optional() {
        let input: DeriveInput = syn::parse_quote! {
            struct Row {
                #[record(optional)]
                note: Option<String>,
            }
        };
        assert!(record_derive_impl(input).is_err());
    }

    #[test]
    fn derive_emits_constants_and_arms() {
        let input: DeriveInput = syn::parse_quote! {
            struct Invoice {
                #[record(String)]
                code: String,
                #[record(Number, optional, rename = "customerId")]
                customer_id: Option<u32>,
                internal: u64,
            }
        };
        let output = record_derive_impl(input).unwrap().to_string();
        assert!(output.contains("CODE"));
        assert!(output.contains("CUSTOMER_ID"));
        assert!(output.contains("\"customerId\""));
        assert!(!output.contains("INTERNAL"));
    }
}
