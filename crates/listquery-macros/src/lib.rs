//! Proc macros for listquery.
//!
//! # Available Macros
//!
//! - [`Record`] - Generate a `listquery::Record` impl from field annotations
//!
//! Most users enable the `derive` feature of `listquery` and import the
//! macro from there rather than depending on this crate directly.

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Record` trait for structs queried by `listquery`.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `String` | Any `AsRef<str>` field; searched, filtered by substring, sorted by locale |
/// | `Number` | Primitive numeric field; filtered by string equality, sorted numerically |
/// | `Bool` | Boolean field |
/// | `Timestamp` | Any `RecordTimestamp` field, e.g. `chrono::DateTime<Utc>` |
/// | `ty = "..."` | Kind spelled as a string (`ty = "bool"`) |
/// | `optional` | Field is an `Option<_>`; `None` reads as null |
/// | `skip` | Exclude this field from queries |
/// | `rename = "..."` | Use a custom name for queries |
///
/// Fields without a `#[record(...)]` attribute are invisible to queries and
/// read as undefined, so field filters on them never exclude anything.
///
/// # Generated Code
///
/// 1. Field name constants (e.g., `Invoice::CODE`, `Invoice::CUSTOMER_ID`)
/// 2. Implementation of `Record::field()`
///
/// # Example
///
/// ```ignore
/// use listquery::{query, EngineConfig, QueryParams, Record};
///
/// #[derive(Record)]
/// struct Invoice {
///     #[record(String)]
///     code: String,
///
///     #[record(Number, rename = "customerId")]
///     customer_id: u32,
///
///     #[record(String, optional)]
///     due_date: Option<String>,
///
///     #[record(skip)]
///     pdf: Vec<u8>,
/// }
///
/// let params = QueryParams::new()
///     .set(Invoice::CUSTOMER_ID, 7)
///     .set("sort", format!("{}:desc", Invoice::DUE_DATE));
///
/// let page = query(&invoices, &params, &EngineConfig::new().searchable([Invoice::CODE]));
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
