//! Attribute parsing for the Record derive macro.
//!
//! Parses the `#[record(...)]` field attributes.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

/// How a field is exposed to the query engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Anything `AsRef<str>`: `#[record(String)]`
    String,
    /// Primitive numbers: `#[record(Number)]`
    Number,
    /// `#[record(Bool)]`
    Bool,
    /// Anything `RecordTimestamp`: `#[record(Timestamp)]`
    Timestamp,
}

impl FieldKind {
    /// Parse a field kind from its name.
    pub fn parse(name: &str, span: Span) -> Result<Self> {
        match name {
            "String" | "string" | "str" => Ok(FieldKind::String),
            "Number" | "number" => Ok(FieldKind::Number),
            "Bool" | "boolean" | "bool" => Ok(FieldKind::Bool),
            "Timestamp" | "timestamp" | "date" => Ok(FieldKind::Timestamp),
            other => Err(Error::new(
                span,
                format!(
                    "unknown record field kind: '{}'. Expected one of: String, Number, Bool, Timestamp",
                    other
                ),
            )),
        }
    }

    fn from_ident(ident: &Ident) -> Result<Self> {
        Self::parse(&ident.to_string(), ident.span())
    }
}

/// Field-level attributes from `#[record(...)]`.
#[derive(Debug, Clone)]
pub struct RecordAttr {
    /// The kind of this field.
    pub kind: Option<FieldKind>,
    /// Field is an `Option<_>`; `None` reads as null.
    pub optional: bool,
    /// Leave this field out.
    pub skip: bool,
    /// Query-facing name (default: the Rust field name).
    pub rename: Option<String>,
}

impl Default for RecordAttr {
    fn default() -> Self {
        RecordAttr {
            kind: None,
            optional: false,
            skip: false,
            rename: None,
        }
    }
}

fn string_literal(expr: &syn::Expr, what: &str) -> Result<syn::LitStr> {
    match expr {
        syn::Expr::Lit(syn::ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.clone()),
        other => Err(Error::new(
            other.span(),
            format!("{} must be a string literal", what),
        )),
    }
}

impl Parse for RecordAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = RecordAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,
                Meta::Path(p) if p.is_ident("optional") => attr.optional = true,
                Meta::Path(p) => {
                    let ident = p.get_ident().ok_or_else(|| {
                        Error::new(
                            p.span(),
                            "expected field kind: String, Number, Bool, Timestamp, optional, or skip",
                        )
                    })?;
                    attr.kind = Some(FieldKind::from_ident(ident)?);
                }

                // rename = "name" or ty = "kind"
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    attr.rename = Some(string_literal(&nv.value, "rename")?.value());
                }
                Meta::NameValue(nv) if nv.path.is_ident("ty") => {
                    let lit = string_literal(&nv.value, "ty")?;
                    attr.kind = Some(FieldKind::parse(&lit.value(), lit.span())?);
                }
                Meta::NameValue(nv) => {
                    return Err(Error::new(
                        nv.path.span(),
                        "unknown attribute. Expected: rename or ty",
                    ));
                }

                Meta::List(_) => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown record attribute. Expected: String, Number, Bool, Timestamp, optional, skip, rename = \"...\", or ty = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract `#[record(...)]` attributes from a field's attributes.
pub fn parse_record_attrs(attrs: &[Attribute]) -> Result<RecordAttr> {
    for attr in attrs {
        if attr.path().is_ident("record") {
            return attr.parse_args::<RecordAttr>();
        }
    }
    Ok(RecordAttr::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_record(tokens: &str) -> Result<RecordAttr> {
        syn::parse_str::<RecordAttr>(tokens)
    }

    #[test]
    fn test_record_string() {
        let attr = parse_record("String").unwrap();
        assert_eq!(attr.kind, Some(FieldKind::String));
        assert!(!attr.optional);
        assert!(!attr.skip);
    }

    #[test]
    fn test_record_number_optional() {
        let attr = parse_record("Number, optional").unwrap();
        assert_eq!(attr.kind, Some(FieldKind::Number));
        assert!(attr.optional);
    }

    #[test]
    fn test_record_timestamp_alias() {
        let attr = parse_record("date").unwrap();
        assert_eq!(attr.kind, Some(FieldKind::Timestamp));
    }

    #[test]
    fn test_record_bool_via_ty() {
        // `bool` is a primitive type name, so `ty` spells it as a string too
        let attr = parse_record(r#"ty = "bool""#).unwrap();
        assert_eq!(attr.kind, Some(FieldKind::Bool));
    }

    #[test]
    fn test_record_skip() {
        let attr = parse_record("skip").unwrap();
        assert!(attr.skip);
        assert_eq!(attr.kind, None);
    }

    #[test]
    fn test_record_rename() {
        let attr = parse_record(r#"String, rename = "createdBy""#).unwrap();
        assert_eq!(attr.kind, Some(FieldKind::String));
        assert_eq!(attr.rename, Some("createdBy".to_string()));
    }

    #[test]
    fn test_record_invalid_kind() {
        let result = parse_record("Enum");
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("unknown record field kind"));
    }

    #[test]
    fn test_record_rename_requires_string() {
        assert!(parse_record("rename = 5").is_err());
    }

    #[test]
    fn test_record_unknown_key() {
        assert!(parse_record(r#"alias = "x""#).is_err());
    }
}
