//! Ordering types for query result sorting.
//!
//! Provides [`Dir`] for sort direction, [`SortSpec`] for the `sort` control
//! parameter, and the pairwise comparison the sort stage uses.

use std::cmp::Ordering;

use crate::collate::locale_cmp;
use crate::value::Value;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Parses a direction. Only the literal `"desc"` is descending.
    pub fn parse(s: &str) -> Dir {
        if s == "desc" {
            Dir::Desc
        } else {
            Dir::Asc
        }
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Applies this direction to an ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parsed `"<field>:<direction>"` sort parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    pub dir: Dir,
}

impl SortSpec {
    /// Creates a new sort spec.
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        SortSpec {
            field: field.into(),
            dir,
        }
    }

    /// Parses `"field"`, `"field:asc"` or `"field:desc"`.
    ///
    /// Segments after the second colon are ignored. Returns `None` when the
    /// field part is empty.
    pub fn parse(raw: &str) -> Option<SortSpec> {
        let mut parts = raw.split(':');
        let field = parts.next().filter(|f| !f.is_empty())?;
        let dir = parts.next().map_or(Dir::Asc, Dir::parse);
        Some(SortSpec::new(field, dir))
    }

    /// Compares two field values under this spec. Missing values always
    /// sort last, whatever the direction.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Ordering {
        match (a.is_missing(), b.is_missing()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.dir.apply(compare_values(a, b)),
        }
    }
}

impl std::fmt::Display for SortSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.field, self.dir)
    }
}

/// Ascending comparison of two present values.
///
/// Strings use locale ordering, numbers and timestamps compare numerically,
/// and any other pairing compares the string forms. NaN compares equal to
/// everything so it keeps its input position.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    match (a, b) {
        (Value::String(a), Value::String(b)) => locale_cmp(a, b),
        (Value::Number(a), Value::Number(b)) => a.compare(*b).unwrap_or(Ordering::Equal),
        (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
        _ => locale_cmp(&a.coerce_string(), &b.coerce_string()),
    }
}

/// Stable merge sort. Tolerates comparators that are not a total order,
/// which mixed-type keys and NaN produce.
pub(crate) fn stable_sort_by<T, F>(items: &mut Vec<T>, compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let len = items.len();
    if len <= 1 {
        return;
    }

    let mut right = items.split_off(len / 2);
    stable_sort_by(items, compare);
    stable_sort_by(&mut right, compare);

    let left = std::mem::take(items);
    items.reserve(len);
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    while let (Some(a), Some(b)) = (left.peek(), right.peek()) {
        // Ties take from the left run.
        let next = if compare(b, a) == Ordering::Less {
            right.next()
        } else {
            left.next()
        };
        items.extend(next);
    }
    items.extend(left);
    items.extend(right);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Number, Timestamp};

    #[test]
    fn stable_sort_keeps_tie_order() {
        let mut items = vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd'), (0, 'e')];
        stable_sort_by(&mut items, &mut |x: &(i32, char), y: &(i32, char)| x.0.cmp(&y.0));
        assert_eq!(items, vec![(0, 'e'), (1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
    }

    #[test]
    fn stable_sort_survives_inconsistent_comparator() {
        let mut items: Vec<u32> = (0..50).collect();
        stable_sort_by(&mut items, &mut |x: &u32, y: &u32| {
            if (x + y) % 3 == 0 {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        });
        assert_eq!(items.len(), 50);
    }

    #[test]
    fn dir_parse_only_desc_is_descending() {
        assert_eq!(Dir::parse("desc"), Dir::Desc);
        assert_eq!(Dir::parse("asc"), Dir::Asc);
        assert_eq!(Dir::parse("DESC"), Dir::Asc);
        assert_eq!(Dir::parse(""), Dir::Asc);
    }

    #[test]
    fn dir_apply() {
        assert_eq!(Dir::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Dir::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Dir::Desc.apply(Ordering::Equal), Ordering::Equal);
    }

    #[test]
    fn sort_spec_parse() {
        assert_eq!(
            SortSpec::parse("name:desc"),
            Some(SortSpec::new("name", Dir::Desc))
        );
        assert_eq!(SortSpec::parse("name"), Some(SortSpec::new("name", Dir::Asc)));
        assert_eq!(
            SortSpec::parse("name:sideways"),
            Some(SortSpec::new("name", Dir::Asc))
        );
        assert_eq!(
            SortSpec::parse("a:desc:extra"),
            Some(SortSpec::new("a", Dir::Desc))
        );
        assert_eq!(SortSpec::parse(":desc"), None);
        assert_eq!(SortSpec::parse(""), None);
    }

    #[test]
    fn sort_spec_display_round_trips() {
        assert_eq!(SortSpec::new("created", Dir::Desc).to_string(), "created:desc");
    }

    #[test]
    fn missing_values_last_in_both_directions() {
        let asc = SortSpec::new("f", Dir::Asc);
        let desc = SortSpec::new("f", Dir::Desc);
        let one = Value::Number(Number::I64(1));

        assert_eq!(asc.compare(&Value::Null, &one), Ordering::Greater);
        assert_eq!(desc.compare(&Value::Null, &one), Ordering::Greater);
        assert_eq!(desc.compare(&one, &Value::Undefined), Ordering::Less);
        assert_eq!(asc.compare(&Value::Null, &Value::Undefined), Ordering::Equal);
    }

    #[test]
    fn compare_numbers_numerically() {
        let two = Value::Number(Number::I64(2));
        let ten = Value::Number(Number::F64(10.0));
        assert_eq!(compare_values(&two, &ten), Ordering::Less);
    }

    #[test]
    fn compare_mixed_types_by_string_form() {
        let number = Value::Number(Number::I64(10));
        let text = Value::String("9");
        // "10" < "9" as strings
        assert_eq!(compare_values(&number, &text), Ordering::Less);
        assert_eq!(
            compare_values(&Value::Bool(true), &Value::String("true")),
            Ordering::Equal
        );
    }

    #[test]
    fn compare_timestamps() {
        assert_eq!(
            compare_values(&Value::Timestamp(Timestamp(1)), &Value::Timestamp(Timestamp(2))),
            Ordering::Less
        );
    }

    #[test]
    fn nan_compares_equal() {
        let nan = Value::Number(Number::F64(f64::NAN));
        let one = Value::Number(Number::I64(1));
        assert_eq!(compare_values(&nan, &one), Ordering::Equal);
    }
}
