//! Runtime value types for field comparison.
//!
//! [`Value`] is the borrowed view of a record field at query time, and
//! [`FilterValue`] is the owned scalar carried by a [`QueryParams`] bag.
//! Both share [`Number`], which keeps integer precision where it can and
//! renders the way a loosely-typed backend would stringify it.
//!
//! [`QueryParams`]: crate::QueryParams

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::record::json_value;

/// Runtime value of a record field, borrowed from the source record.
///
/// Accessors return [`Value::Undefined`] for fields the record does not have
/// and [`Value::Null`] for fields that are present but empty. The engine
/// treats the two differently in exactly one place: a field filter lets a
/// record through when the filtered field is undefined.
///
/// # Example
///
/// ```
/// use listquery::{Value, Number};
///
/// struct Invoice {
///     code: String,
///     amount: u32,
///     note: Option<String>,
/// }
///
/// fn accessor<'a>(invoice: &'a Invoice, field: &str) -> Value<'a> {
///     match field {
///         "code" => Value::String(&invoice.code),
///         "amount" => Value::Number(Number::from(invoice.amount)),
///         "note" => invoice.note.as_deref().map_or(Value::Null, Value::String),
///         _ => Value::Undefined,
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// String value (borrowed).
    String(&'a str),
    /// Numeric value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Timestamp value for typed date fields.
    Timestamp(Timestamp),
    /// Nested array; renders as its comma-joined elements.
    Array(&'a [serde_json::Value]),
    /// Nested object; renders as `"[object Object]"`.
    Object,
    /// Present with no value.
    Null,
    /// Field not present on the record.
    Undefined,
}

impl<'a> Value<'a> {
    /// Returns `true` if the field is absent from the record.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns `true` for `Null` and `Undefined`.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    /// Returns `true` if this is a `String` value.
    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    /// Returns `true` if this is a `Number` value.
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extracts the number value, if present.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extracts the boolean value, if present.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Extracts the timestamp value, if present.
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Truthiness as a loosely-typed caller would see it.
    ///
    /// Empty strings, zero, NaN, `false`, null and undefined are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::String(s) => !s.is_empty(),
            Value::Number(n) => n.is_truthy(),
            Value::Bool(b) => *b,
            Value::Timestamp(_) | Value::Array(_) | Value::Object => true,
            Value::Null | Value::Undefined => false,
        }
    }

    /// The text consulted by free-text search. Null and undefined are empty.
    pub fn search_text(&self) -> Cow<'a, str> {
        match self {
            Value::Null | Value::Undefined => Cow::Borrowed(""),
            other => other.coerce_string(),
        }
    }

    /// String coercion used for loose equality and mixed-type ordering.
    ///
    /// Null renders as `"null"` and undefined as `"undefined"`, so neither
    /// collides with a real string value. Arrays join their elements with
    /// `,` (null elements render empty) and objects render as
    /// `"[object Object]"`.
    pub fn coerce_string(&self) -> Cow<'a, str> {
        match self {
            Value::String(s) => Cow::Borrowed(s),
            Value::Number(n) => Cow::Owned(n.to_string()),
            Value::Bool(true) => Cow::Borrowed("true"),
            Value::Bool(false) => Cow::Borrowed("false"),
            Value::Timestamp(t) => Cow::Owned(t.to_string()),
            Value::Array(items) => Cow::Owned(join_array(items)),
            Value::Object => Cow::Borrowed("[object Object]"),
            Value::Null => Cow::Borrowed("null"),
            Value::Undefined => Cow::Borrowed("undefined"),
        }
    }
}

/// Numeric value supporting all common numeric types.
///
/// Integers keep their own variants so IDs above 2^53 survive intact.
/// Comparisons between different variants go through `f64`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Signed 64-bit integer.
    I64(i64),
    /// Unsigned 64-bit integer.
    U64(u64),
    /// 64-bit floating point.
    F64(f64),
}

impl Number {
    /// Converts the number to f64 for comparison.
    pub fn to_f64(self) -> f64 {
        match self {
            Number::I64(n) => n as f64,
            Number::U64(n) => n as f64,
            Number::F64(n) => n,
        }
    }

    /// Compares two numbers, handling mixed types.
    ///
    /// Returns `None` when either side is NaN.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => Some(a.cmp(&b)),
            (Number::U64(a), Number::U64(b)) => Some(a.cmp(&b)),
            (Number::F64(a), Number::F64(b)) => a.partial_cmp(&b),
            _ => self.to_f64().partial_cmp(&other.to_f64()),
        }
    }

    /// Zero and NaN are falsy.
    pub fn is_truthy(self) -> bool {
        match self {
            Number::I64(n) => n != 0,
            Number::U64(n) => n != 0,
            Number::F64(n) => n != 0.0 && !n.is_nan(),
        }
    }

    /// Truncates toward zero, the way an integer parse of the decimal form would.
    ///
    /// Returns `None` for NaN and infinities.
    pub fn truncate(self) -> Option<i64> {
        match self {
            Number::I64(n) => Some(n),
            Number::U64(n) => i64::try_from(n).ok(),
            Number::F64(n) if n.is_finite() => Some(n.trunc() as i64),
            Number::F64(_) => None,
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

fn join_array(items: &[serde_json::Value]) -> String {
    items
        .iter()
        .map(|item| match item {
            serde_json::Value::Null => Cow::Borrowed(""),
            other => json_value(other).coerce_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Decimal rendering: integral floats print without a fraction (`1.0` is `"1"`),
/// and magnitudes from `1e21` up or below `1e-6` use exponent form (`"1e+21"`).
impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Number::I64(n) => write!(f, "{n}"),
            Number::U64(n) => write!(f, "{n}"),
            Number::F64(n) if n.is_nan() => f.write_str("NaN"),
            Number::F64(n) if n.is_infinite() => {
                f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Number::F64(n) if n == 0.0 => f.write_str("0"),
            Number::F64(n) if n.abs() >= 1e21 || n.abs() < 1e-6 => write_exponent(f, n),
            Number::F64(n) if n.fract() == 0.0 => write!(f, "{n:.0}"),
            Number::F64(n) => write!(f, "{n}"),
        }
    }
}

fn write_exponent(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    let formatted = format!("{n:e}");
    match formatted.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{mantissa}e+{exp}"),
        _ => f.write_str(&formatted),
    }
}

macro_rules! number_from {
    ($variant:ident, $target:ty: $($source:ty),*) => {
        $(
            impl From<$source> for Number {
                fn from(n: $source) -> Self {
                    Number::$variant(n as $target)
                }
            }
        )*
    };
}

number_from!(I64, i64: i8, i16, i32, i64, isize);
number_from!(U64, u64: u8, u16, u32, u64, usize);
number_from!(F64, f64: f32, f64);

/// Timestamp value represented as milliseconds since Unix epoch (UTC).
///
/// ```
/// use listquery::Timestamp;
///
/// let ts = Timestamp::from_secs(1_705_000_000);
/// assert_eq!(ts.as_millis(), 1_705_000_000_000);
/// assert!(Timestamp(1000) < Timestamp(2000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// Creates a new timestamp from milliseconds since Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Creates a new timestamp from seconds since Unix epoch.
    pub fn from_secs(secs: i64) -> Self {
        Timestamp(secs.saturating_mul(1000))
    }

    /// Returns the timestamp as milliseconds since Unix epoch.
    pub fn as_millis(self) -> i64 {
        self.0
    }

    /// Returns the timestamp as seconds since Unix epoch.
    pub fn as_secs(self) -> i64 {
        self.0.div_euclid(1000)
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

/// RFC 3339 with millisecond precision, or the raw millis when out of range.
impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match DateTime::<Utc>::from_timestamp_millis(self.0) {
            Some(dt) => f.write_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Owned scalar carried by a parameter bag.
///
/// This is the only shape the engine compares against. Construct it with
/// `From` conversions; `Option::None` becomes [`FilterValue::Undefined`].
///
/// ```
/// use listquery::FilterValue;
///
/// assert_eq!(FilterValue::from("open"), FilterValue::String("open".into()));
/// assert_eq!(FilterValue::from(None::<i32>), FilterValue::Undefined);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterValue {
    /// String value.
    String(String),
    /// Numeric value.
    Number(Number),
    /// Boolean value.
    Bool(bool),
    /// Explicit null.
    Null,
    /// No value.
    #[default]
    Undefined,
}

impl FilterValue {
    /// Borrows this value as a [`Value`] so it can go through the same
    /// coercion helpers as record fields.
    pub fn as_value(&self) -> Value<'_> {
        match self {
            FilterValue::String(s) => Value::String(s),
            FilterValue::Number(n) => Value::Number(*n),
            FilterValue::Bool(b) => Value::Bool(*b),
            FilterValue::Null => Value::Null,
            FilterValue::Undefined => Value::Undefined,
        }
    }

    /// Extracts the string value, if present.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns `true` for [`FilterValue::Undefined`].
    pub fn is_undefined(&self) -> bool {
        matches!(self, FilterValue::Undefined)
    }

    /// Integer parse of this value: leading whitespace, optional sign, then
    /// as many decimal digits as are present (`"12px"` is 12). Numbers
    /// truncate toward zero. Anything without leading digits is `None`.
    pub fn parse_int(&self) -> Option<i64> {
        match self {
            FilterValue::String(s) => parse_leading_int(s),
            FilterValue::Number(n) => n.truncate(),
            _ => None,
        }
    }
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let magnitude = rest[..digits]
        .bytes()
        .try_fold(0i64, |acc, d| {
            acc.checked_mul(10)?.checked_add(i64::from(d - b'0'))
        })
        .unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::String(s)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::String(s.to_string())
    }
}

impl From<&String> for FilterValue {
    fn from(s: &String) -> Self {
        FilterValue::String(s.clone())
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

impl From<Number> for FilterValue {
    fn from(n: Number) -> Self {
        FilterValue::Number(n)
    }
}

macro_rules! filter_value_from_number {
    ($($source:ty),*) => {
        $(
            impl From<$source> for FilterValue {
                fn from(n: $source) -> Self {
                    FilterValue::Number(Number::from(n))
                }
            }
        )*
    };
}

filter_value_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FilterValue::Undefined, Into::into)
    }
}

/// Arrays and objects have no scalar form and become `Undefined`.
impl From<serde_json::Value> for FilterValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FilterValue::Null,
            serde_json::Value::Bool(b) => FilterValue::Bool(b),
            serde_json::Value::Number(n) => FilterValue::Number(json_number(&n)),
            serde_json::Value::String(s) => FilterValue::String(s),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => FilterValue::Undefined,
        }
    }
}

pub(crate) fn json_number(n: &serde_json::Number) -> Number {
    if let Some(i) = n.as_i64() {
        Number::I64(i)
    } else if let Some(u) = n.as_u64() {
        Number::U64(u)
    } else {
        Number::F64(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl serde::Serialize for FilterValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FilterValue::String(s) => serializer.serialize_str(s),
            FilterValue::Number(Number::I64(n)) => serializer.serialize_i64(*n),
            FilterValue::Number(Number::U64(n)) => serializer.serialize_u64(*n),
            FilterValue::Number(Number::F64(n)) => serializer.serialize_f64(*n),
            FilterValue::Bool(b) => serializer.serialize_bool(*b),
            FilterValue::Null | FilterValue::Undefined => serializer.serialize_none(),
        }
    }
}
