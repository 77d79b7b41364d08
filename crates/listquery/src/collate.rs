//! Locale-aware string ordering.
//!
//! Approximates root-locale collation in three passes: base letters
//! (transliterated and case-folded), then accents, then case with lowercase
//! first. `"apple" < "Banana" < "banana"`, and `"é"` sorts next to `"e"`.

use std::cmp::Ordering;

use deunicode::deunicode;

/// Compares two strings the way a human-facing list would order them.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    primary_key(a)
        .cmp(&primary_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| case_cmp(a, b))
}

fn primary_key(s: &str) -> String {
    deunicode(s).to_lowercase()
}

fn case_cmp(a: &str, b: &str) -> Ordering {
    for (x, y) in a.chars().zip(b.chars()) {
        if x == y {
            continue;
        }
        match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            _ => return x.cmp(&y),
        }
    }
    a.len().cmp(&b.len())
}
