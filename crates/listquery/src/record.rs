//! Field access for queryable records.
//!
//! The engine never assumes a record shape. It asks for fields by name
//! through [`Record`] (or an equivalent accessor closure) and gets a
//! [`Value`] back, with [`Value::Undefined`] standing in for absent fields.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

use crate::value::{json_number, FilterValue, Timestamp, Value};

/// Trait for types that can be queried by the engine.
///
/// Usually derived with `#[derive(Record)]` (feature `derive`), but simple
/// to write by hand.
///
/// # Derive Usage
///
/// ```ignore
/// use listquery::{query, EngineConfig, QueryParams, Record};
///
/// #[derive(Record)]
/// struct Customer {
///     #[record(String)]
///     name: String,
///     #[record(Number)]
///     id: u64,
///     #[record(String, optional)]
///     email: Option<String>,
/// }
///
/// let result = query(&customers, &QueryParams::new().set("sort", "name:asc"), &EngineConfig::new());
/// ```
///
/// # Manual Implementation
///
/// ```
/// use listquery::{Record, Value, Number};
///
/// struct Customer {
///     name: String,
///     id: u64,
/// }
///
/// impl Record for Customer {
///     fn field(&self, name: &str) -> Value<'_> {
///         match name {
///             "name" => Value::String(&self.name),
///             "id" => Value::Number(Number::from(self.id)),
///             _ => Value::Undefined,
///         }
///     }
/// }
/// ```
pub trait Record {
    /// Returns the value of a field, or [`Value::Undefined`] if the record
    /// has no such field.
    fn field(&self, name: &str) -> Value<'_>;

    /// Returns `true` if the record carries the field at all, null or not.
    fn has_field(&self, name: &str) -> bool {
        !self.field(name).is_undefined()
    }

    /// Static accessor suitable for [`query_with`](crate::query_with).
    fn accessor<'a>(item: &'a Self, name: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.field(name)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> Value<'_> {
        (**self).field(name)
    }
}

impl<R: Record + ?Sized> Record for Box<R> {
    fn field(&self, name: &str) -> Value<'_> {
        (**self).field(name)
    }
}

/// Helper trait for converting date types to timestamps.
///
/// Used by `#[record(Timestamp)]` fields. Naive dates and datetimes are
/// read as UTC.
pub trait RecordTimestamp {
    /// Converts this value to a [`Timestamp`].
    fn record_timestamp(&self) -> Timestamp;
}

impl RecordTimestamp for i64 {
    fn record_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self)
    }
}

impl RecordTimestamp for Timestamp {
    fn record_timestamp(&self) -> Timestamp {
        *self
    }
}

impl<Tz: TimeZone> RecordTimestamp for DateTime<Tz> {
    fn record_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(self.timestamp_millis())
    }
}

impl RecordTimestamp for NaiveDateTime {
    fn record_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(self.and_utc().timestamp_millis())
    }
}

impl RecordTimestamp for NaiveDate {
    fn record_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(self.and_time(chrono::NaiveTime::MIN).and_utc().timestamp_millis())
    }
}

/// Converts a JSON value into the engine's view of it.
pub fn json_value(value: &serde_json::Value) -> Value<'_> {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => Value::Number(json_number(n)),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::Array(items),
        serde_json::Value::Object(_) => Value::Object,
    }
}

impl Record for serde_json::Map<String, serde_json::Value> {
    fn field(&self, name: &str) -> Value<'_> {
        self.get(name).map_or(Value::Undefined, json_value)
    }
}

/// Only objects have fields; any other JSON value reports every field undefined.
impl Record for serde_json::Value {
    fn field(&self, name: &str) -> Value<'_> {
        match self {
            serde_json::Value::Object(map) => map.field(name),
            _ => Value::Undefined,
        }
    }
}

impl<S: std::hash::BuildHasher> Record for HashMap<String, FilterValue, S> {
    fn field(&self, name: &str) -> Value<'_> {
        self.get(name).map_or(Value::Undefined, FilterValue::as_value)
    }
}

impl Record for BTreeMap<String, FilterValue> {
    fn field(&self, name: &str) -> Value<'_> {
        self.get(name).map_or(Value::Undefined, FilterValue::as_value)
    }
}
