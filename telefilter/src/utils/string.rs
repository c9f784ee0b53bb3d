//! String utility functions

/// Ordinal case-insensitive equality.
///
/// ASCII input is compared byte-wise; anything else is upper-cased one char
/// to one char, without allocating.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        return a.eq_ignore_ascii_case(b);
    }
    a.chars().map(fold_char).eq(b.chars().map(fold_char))
}

/// Ordinal case-insensitive substring search.
///
/// `needle_upper` must already be upper-cased (see [`to_upper_invariant`]) so
/// the per-call cost stays on the haystack side.
pub fn contains_ignore_case(haystack: &str, needle: &str, needle_upper: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if haystack.is_ascii() && needle.is_ascii() {
        return contains_ascii_ignore_case(haystack, needle);
    }
    to_upper_invariant(haystack).contains(needle_upper)
}

/// Upper-case mapping used for case-insensitive comparisons.
///
/// Every char maps to exactly one char, so lengths never change.
pub fn to_upper_invariant(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

/// Simple upper-case mapping of a single char.
///
/// Chars whose upper case expands to several chars (`ß` -> `SS`,
/// `ﬁ` -> `FI`) are left unchanged.
fn fold_char(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_uppercase();
    }
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(single), None) => single,
        _ => c,
    }
}

fn contains_ascii_ignore_case(haystack: &str, needle: &str) -> bool {
    if haystack.len() < needle.len() {
        return false;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .any(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Parse a real number the same way regardless of locale.
///
/// Surrounding whitespace is ignored; decimal separator is always `.`.
/// Besides plain decimal and exponent notation only the exact spellings
/// `NaN`, `Infinity` and `-Infinity` are accepted.
pub fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    match trimmed {
        "" => None,
        "NaN" => Some(f64::NAN),
        "Infinity" | "+Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        _ if trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E')) =>
        {
            trimmed.parse::<f64>().ok()
        }
        _ => None,
    }
}
