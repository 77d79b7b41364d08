//! Identifier normalization.
//!
//! Records from mixed sources carry the same id as `5` in one place and
//! `"5"` in another. Normalizing both to one string form keeps map keys and
//! field-filter comparisons representation-independent.

use std::collections::HashMap;

use crate::record::Record;
use crate::value::{FilterValue, Value};

/// Canonical string form of a possibly-absent, possibly-numeric id.
///
/// Truthy ids render as strings (numbers in decimal). Undefined, null, `""`
/// and the number `0` all normalize to `""`, so a zero id is
/// indistinguishable from a missing one. Use [`canonical_id`] where `0` is a
/// real id.
///
/// ```
/// use listquery::normalize_id;
///
/// assert_eq!(normalize_id(5), normalize_id("5"));
/// assert_eq!(normalize_id(None::<u32>), "");
/// assert_eq!(normalize_id(0), "");
/// ```
pub fn normalize_id(id: impl Into<FilterValue>) -> String {
    let id: FilterValue = id.into();
    normalize_value(&id.as_value())
}

/// Like [`normalize_id`], but numeric zero is kept as `"0"`.
///
/// ```
/// use listquery::canonical_id;
///
/// assert_eq!(canonical_id(0), "0");
/// assert_eq!(canonical_id(""), "");
/// ```
pub fn canonical_id(id: impl Into<FilterValue>) -> String {
    let id: FilterValue = id.into();
    match id {
        FilterValue::Number(n) if !n.to_f64().is_nan() => n.to_string(),
        other => normalize_value(&other.as_value()),
    }
}

/// [`normalize_id`] for a record field.
pub fn normalize_value(value: &Value<'_>) -> String {
    if value.is_truthy() {
        value.coerce_string().into_owned()
    } else {
        String::new()
    }
}

/// Indexes records by the normalized value of `field`.
///
/// Records whose id normalizes to `""` are left out. When two records share
/// an id the first one wins.
pub fn index_by_id<'a, T: Record>(records: &'a [T], field: &str) -> HashMap<String, &'a T> {
    let mut index = HashMap::with_capacity(records.len());
    for record in records {
        let key = normalize_value(&record.field(field));
        if !key.is_empty() {
            index.entry(key).or_insert(record);
        }
    }
    index
}
