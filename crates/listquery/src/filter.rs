//! Filtering stages of the query pipeline.
//!
//! Three predicates, each with its own policy for records lacking the
//! field it looks at:
//!
//! - [`TextSearch`]: a missing field searches as the empty string.
//! - [`FieldFilter`]: a missing field passes (fail-open).
//! - [`DateRange`]: a missing or unparseable date is excluded (fail-closed).

use crate::config::EngineConfig;
use crate::date::{parse_date_millis, value_millis};
use crate::params::{QueryParams, KEY_DATE_FROM, KEY_DATE_TO};
use crate::value::{FilterValue, Value};

/// Case-insensitive substring search over the configured fields.
#[derive(Debug, Clone)]
pub struct TextSearch<'c> {
    needle: String,
    fields: &'c [String],
}

impl<'c> TextSearch<'c> {
    /// Builds the search stage, or `None` when it would be a no-op.
    pub fn from_params(params: &QueryParams, config: &'c EngineConfig) -> Option<Self> {
        let term = params.search_term()?;
        if config.searchable_fields.is_empty() {
            return None;
        }
        Some(TextSearch {
            needle: term.to_lowercase(),
            fields: &config.searchable_fields,
        })
    }

    /// Returns `true` if any searchable field contains the term.
    pub fn matches<T, F>(&self, item: &T, accessor: &F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        self.fields.iter().any(|field| {
            accessor(item, field)
                .search_text()
                .to_lowercase()
                .contains(&self.needle)
        })
    }
}

/// An equality/substring constraint on one named field.
///
/// ```
/// use listquery::{FieldFilter, FilterValue, Number, Value};
///
/// let wanted = FilterValue::from("1");
/// let filter = FieldFilter::new("id", &wanted);
///
/// assert!(filter.matches(&Value::Number(Number::I64(1))));
/// assert!(filter.matches(&Value::Undefined));
/// assert!(!filter.matches(&Value::Number(Number::I64(11))));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FieldFilter<'p> {
    /// The record field this filter reads.
    pub field: &'p str,
    /// The value the field is compared against.
    pub value: &'p FilterValue,
}

impl<'p> FieldFilter<'p> {
    /// Creates a new field filter.
    pub fn new(field: &'p str, value: &'p FilterValue) -> Self {
        FieldFilter { field, value }
    }

    /// The active filters of a parameter bag.
    pub fn from_params(params: &'p QueryParams) -> Vec<Self> {
        params
            .filters()
            .map(|(field, value)| FieldFilter::new(field, value))
            .collect()
    }

    /// Evaluates this filter against a record's field value.
    ///
    /// Undefined fields pass. Two strings match by case-insensitive
    /// containment; any other pairing compares string forms exactly, so the
    /// number `1` matches the string `"1"`.
    pub fn matches(&self, field_value: &Value<'_>) -> bool {
        if field_value.is_undefined() {
            return true;
        }
        match (field_value, self.value) {
            (Value::String(actual), FilterValue::String(wanted)) => {
                contains_ignore_case(actual, wanted)
            }
            (actual, wanted) => actual.coerce_string() == wanted.as_value().coerce_string(),
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Inclusive millisecond range applied to the configured date field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    /// Both bounds parsed (open bounds are `i64::MIN` / `i64::MAX`).
    Between { from: i64, to: i64 },
    /// A supplied bound failed to parse; nothing can match.
    Unsatisfiable,
}

impl DateRange {
    /// Builds the range stage, or `None` when no date field is configured
    /// or neither bound is a non-empty string.
    pub fn from_params<'c>(
        params: &QueryParams,
        config: &'c EngineConfig,
    ) -> Option<(&'c str, DateRange)> {
        let field = config.date_field.as_deref()?;
        let from = params.date_bound(KEY_DATE_FROM);
        let to = params.date_bound(KEY_DATE_TO);
        if from.is_none() && to.is_none() {
            return None;
        }
        Some((field, DateRange::new(from, to)))
    }

    /// Parses optional bounds.
    pub fn new(from: Option<&str>, to: Option<&str>) -> DateRange {
        let bound = |raw: Option<&str>, open: i64| match raw {
            None => Some(open),
            Some(s) => parse_date_millis(s),
        };
        match (bound(from, i64::MIN), bound(to, i64::MAX)) {
            (Some(from), Some(to)) => DateRange::Between { from, to },
            _ => DateRange::Unsatisfiable,
        }
    }

    /// Returns `true` if the value is a date inside the range.
    pub fn contains(&self, value: &Value<'_>) -> bool {
        match (self, value_millis(value)) {
            (DateRange::Between { from, to }, Some(ts)) => *from <= ts && ts <= *to,
            _ => false,
        }
    }
}
