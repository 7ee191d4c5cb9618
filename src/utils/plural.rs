//! Pluralization utilities.

/// Format count with noun, handling pluralization
///
/// # Examples
///
/// - `plural_count(0, "job")` -> `"0 jobs"`
/// - `plural_count(1, "job")` -> `"1 job"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}
