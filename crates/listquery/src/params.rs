//! The loosely-typed parameter bag a list request carries.
//!
//! A [`QueryParams`] maps names to [`FilterValue`]s. A handful of reserved
//! control keys drive search, paging, sorting and the date range; every
//! other key is a field filter.

use std::collections::BTreeMap;

use crate::error::{ListQueryError, Result};
use crate::ordering::SortSpec;
use crate::value::FilterValue;

/// Free-text search term.
pub const KEY_SEARCH: &str = "q";
/// 1-based page number.
pub const KEY_PAGE: &str = "page";
/// Page size.
pub const KEY_LIMIT: &str = "limit";
/// `"<field>:<asc|desc>"`.
pub const KEY_SORT: &str = "sort";
/// Inclusive lower date bound.
pub const KEY_DATE_FROM: &str = "date_from";
/// Inclusive upper date bound.
pub const KEY_DATE_TO: &str = "date_to";
/// Reserved for caller bookkeeping; never read by the engine.
pub const KEY_TOTAL: &str = "total";

/// Keys that never address record fields.
pub const RESERVED_KEYS: [&str; 7] = [
    KEY_SEARCH,
    KEY_PAGE,
    KEY_LIMIT,
    KEY_SORT,
    KEY_DATE_FROM,
    KEY_DATE_TO,
    KEY_TOTAL,
];

/// Filter value meaning "no filter on this field".
pub const ALL_SENTINEL: &str = "ALL";

/// Default page when `page` is absent or not a number.
pub const DEFAULT_PAGE: usize = 1;
/// Default page size when `limit` is absent, zero or not a number.
pub const DEFAULT_LIMIT: usize = 20;

/// Returns `true` for the reserved control keys.
pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Name → value parameter bag.
///
/// ```
/// use listquery::QueryParams;
///
/// let params = QueryParams::new()
///     .set("q", "inv")
///     .set("status", "PAID")
///     .set("page", 2)
///     .set("sort", "issued_at:desc");
///
/// assert_eq!(params.search_term(), Some("inv"));
/// assert_eq!(params.page(), 2);
/// assert_eq!(params.limit(), 20);
/// assert_eq!(params.filters().count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct QueryParams {
    values: BTreeMap<String, FilterValue>,
}

impl QueryParams {
    /// Creates an empty parameter bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any previous value.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Sets a parameter in place, returning the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Option<FilterValue> {
        self.values.insert(key.into(), value.into())
    }

    /// Removes a parameter.
    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        self.values.remove(key)
    }

    /// Returns a parameter value.
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.values.get(key)
    }

    /// Returns a parameter only if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FilterValue::as_str)
    }

    /// Iterates over every parameter in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of parameters, reserved keys included.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The active field filters: non-reserved keys whose value is not
    /// undefined, `""` or `"ALL"`.
    pub fn filters(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.iter()
            .filter(|(key, value)| !is_reserved(key) && is_active_filter(value))
    }

    /// The search term, if `q` is a non-empty string.
    pub fn search_term(&self) -> Option<&str> {
        self.get_str(KEY_SEARCH).filter(|q| !q.is_empty())
    }

    /// `max(1, int(page) or 1)`.
    pub fn page(&self) -> usize {
        match self.get(KEY_PAGE).and_then(FilterValue::parse_int) {
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
            _ => DEFAULT_PAGE,
        }
    }

    /// `int(limit) or 20`. Non-positive sizes fall back to the default too.
    pub fn limit(&self) -> usize {
        match self.get(KEY_LIMIT).and_then(FilterValue::parse_int) {
            Some(n) if n > 0 => usize::try_from(n).unwrap_or(usize::MAX),
            _ => DEFAULT_LIMIT,
        }
    }

    /// The parsed `sort` parameter, if it is a string with a field name.
    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.get_str(KEY_SORT).and_then(SortSpec::parse)
    }

    /// A date bound, if it is a non-empty string.
    pub fn date_bound(&self, key: &str) -> Option<&str> {
        self.get_str(key).filter(|s| !s.is_empty())
    }

    /// Parses a URL query string (`a=1&b=x+y`).
    ///
    /// Keys and values are percent-decoded with `+` read as a space. Values
    /// stay strings; bare keys map to `""`. A repeated key keeps its last
    /// value. Pairs that fail to decode are skipped.
    pub fn from_query_string(query: &str) -> Self {
        let mut params = QueryParams::new();
        let query = query.strip_prefix('?').unwrap_or(query);

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
            match (decode_component(raw_key), decode_component(raw_value)) {
                (Some(key), Some(value)) if !key.is_empty() => {
                    params.insert(key, value);
                }
                _ => tracing::trace!(pair, "skipping undecodable query pair"),
            }
        }
        params
    }

    /// Builds params from a JSON object. Nested arrays and objects become
    /// undefined, which the field-filter stage ignores.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(ListQueryError::InvalidParams(json_kind(&other))),
        }
    }
}

fn is_active_filter(value: &FilterValue) -> bool {
    match value {
        FilterValue::Undefined => false,
        FilterValue::String(s) => !s.is_empty() && s != ALL_SENTINEL,
        _ => true,
    }
}

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|s| s.into_owned())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<FilterValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        QueryParams {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<K, V> Extend<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<FilterValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}
