//! listquery - In-memory list-endpoint query engine.
//!
//! listquery turns an unfiltered collection plus a loosely-typed parameter
//! bag into one page of results, shaped the way a backend list endpoint
//! would return it. It supports:
//!
//! - Free-text search across configured fields (`q`)
//! - Per-field filters from any non-reserved parameter
//! - Inclusive date ranges (`date_from`, `date_to`)
//! - Single-key sorting with nulls last (`sort=field:desc`)
//! - Page/limit pagination with a `total` count
//! - Identifier normalization so `5` and `"5"` are the same id
//!
//! # Quick Start
//!
//! ```rust
//! use listquery::{query, EngineConfig, Number, QueryParams, Record, Value};
//!
//! struct Invoice {
//!     code: String,
//!     customer_id: u32,
//!     issued_on: String,
//! }
//!
//! impl Record for Invoice {
//!     fn field(&self, name: &str) -> Value<'_> {
//!         match name {
//!             "code" => Value::String(&self.code),
//!             "customer_id" => Value::Number(Number::from(self.customer_id)),
//!             "issued_on" => Value::String(&self.issued_on),
//!             _ => Value::Undefined,
//!         }
//!     }
//! }
//!
//! let invoices = vec![
//!     Invoice { code: "INV-001".into(), customer_id: 7, issued_on: "2024-01-10".into() },
//!     Invoice { code: "INV-002".into(), customer_id: 8, issued_on: "2024-01-20".into() },
//!     Invoice { code: "CRN-003".into(), customer_id: 7, issued_on: "2024-02-01".into() },
//! ];
//!
//! let config = EngineConfig::new().searchable(["code"]).date_field("issued_on");
//! let params = QueryParams::from_query_string("customer_id=7&sort=issued_on:desc&limit=10");
//!
//! let result = query(&invoices, &params, &config);
//! assert_eq!(result.total, 2);
//! assert_eq!(result.items[0].code, "CRN-003");
//! assert_eq!(result.items[1].code, "INV-001");
//! ```
//!
//! # Pipeline
//!
//! Stages run in a fixed order, each on the previous stage's output:
//!
//! ```text
//! text search → field filters → date range → sort → paginate
//! ```
//!
//! | stage | missing field |
//! |-------|---------------|
//! | text search | searched as `""` |
//! | field filter | record passes (fail-open) |
//! | date range | record excluded (fail-closed) |
//! | sort | sorts last in either direction |
//!
//! The pipeline has no error channel: malformed `page`/`limit` fall back to
//! 1 and 20, an unusable `sort` is ignored, and unparseable dates exclude.

mod collate;
mod config;
mod date;
mod error;
mod filter;
mod id;
mod ordering;
mod params;
mod query;
mod record;
mod result;
mod store;
mod value;

// Re-export public API
pub use collate::locale_cmp;
pub use config::EngineConfig;
pub use date::parse_date_millis;
pub use error::{ListQueryError, Result};
pub use filter::{DateRange, FieldFilter, TextSearch};
pub use id::{canonical_id, index_by_id, normalize_id, normalize_value};
pub use ordering::{compare_values, Dir, SortSpec};
pub use params::{
    is_reserved, QueryParams, ALL_SENTINEL, DEFAULT_LIMIT, DEFAULT_PAGE, KEY_DATE_FROM,
    KEY_DATE_TO, KEY_LIMIT, KEY_PAGE, KEY_SEARCH, KEY_SORT, KEY_TOTAL, RESERVED_KEYS,
};
pub use query::{query, query_cloned, query_with};
pub use record::{json_value, Record, RecordTimestamp};
pub use result::{Page, QueryResult};
pub use store::MemoryStore;
pub use value::{FilterValue, Number, Timestamp, Value};

#[cfg(feature = "derive")]
pub use listquery_macros::Record;
