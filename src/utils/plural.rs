//! Pluralization utilities.

/// Return "s" suffix for plural counts
///
/// - `plural_s(0)` -> `"s"`
/// - `plural_s(1)` -> `""`
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun, handling pluralization
///
/// - `plural_count(1, "include")` -> `"1 include"`
/// - `plural_count(3, "include")` -> `"3 includes"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}
