//! Helpers to build text search patterns.

/// Escape character used in `LIKE`/`ILIKE` patterns (Postgres' default).
pub const LIKE_ESCAPE_CHAR: char = '\\';

/// Returns a `LIKE`/`ILIKE` pattern matching any text containing `substring`.
///
/// Wildcards (`%`, `_`) and the escape character in `substring` are escaped, so they match
/// literally.
///
/// # Examples
///
/// ```
/// use pokedex_api::helpers::db::search::contains_pattern;
///
/// assert_eq!("%bulba%", contains_pattern("bulba"));
/// assert_eq!("%100\\%%", contains_pattern("100%"));
/// ```
pub fn contains_pattern(substring: &str) -> String {
    let mut pattern = String::with_capacity(substring.len() + 2);

    pattern.push('%');
    for c in substring.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE_CHAR) {
            pattern.push(LIKE_ESCAPE_CHAR);
        }
        pattern.push(c);
    }
    pattern.push('%');

    pattern
}
