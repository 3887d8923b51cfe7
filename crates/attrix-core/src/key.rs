//! Attribute key handling
//!
//! Keys arrive from callers in the loose forms a dynamic surface tends to
//! produce: `"name"`, `"@name"`, `":name"`, or something that is not a valid
//! field name at all (`"foo-bar"`). This module owns the three pure steps the
//! import engine runs on every key:
//!
//! 1. [`normalize`] strips the conventional token marker and field sigils
//! 2. [`is_valid`] checks the result against the field-name pattern
//! 3. [`sanitize`] makes one bounded attempt to repair an invalid name
//!
//! Sanitization is deliberately not recursive: the engine revalidates its
//! output exactly once, and a name that is still invalid afterwards (for
//! example one starting with a digit) is treated as unrepairable.

use regex::Regex;
use std::sync::LazyLock;

/// Pattern a usable field name must match in full.
static FIELD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("field name pattern"));

/// Maximal runs of characters that cannot appear in a field name.
static INVALID_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").expect("invalid run pattern"));

/// Repeated underscores left behind by run replacement.
static UNDERSCORE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"__+").expect("underscore run pattern"));

/// Strip the leading token marker and field sigils from a raw key.
///
/// At most one leading `:` is removed, then any number of leading `@`
/// characters: `"@name"`, `":name"`, and `":@@name"` all normalize to
/// `"name"`. Interior markers are left alone; they are a validity problem,
/// not a spelling convention.
pub fn normalize(key: &str) -> &str {
    let key = key.strip_prefix(':').unwrap_or(key);
    key.trim_start_matches('@')
}

/// Check whether `name` is a valid field name.
///
/// Valid names start with an ASCII letter or underscore and continue with
/// letters, digits, or underscores. The empty string is invalid.
pub fn is_valid(name: &str) -> bool {
    FIELD_NAME.is_match(name)
}

/// Rewrite an invalid name into a candidate field name.
///
/// Every maximal run of characters outside `[A-Za-z0-9_]` becomes a single
/// `_`, and repeated underscores collapse to one. The result is a candidate
/// only: `sanitize("1abc")` returns `"1abc"` unchanged, which still fails
/// [`is_valid`]. Callers must revalidate.
pub fn sanitize(name: &str) -> String {
    let replaced = INVALID_RUN.replace_all(name, "_");
    UNDERSCORE_RUN.replace_all(&replaced, "_").into_owned()
}
