//! Markup stripping over raw text.
//!
//! This is a regex pass, not a parser: everything between a `<` and the
//! next `>` is dropped, across line breaks. Entities such as `&amp;` are
//! left encoded.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// Any tag-like run, shortest match, newlines included.
#[allow(clippy::expect_used)]
static TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<.*?>").expect("static tag pattern is valid"));

/// Remove everything inside `<...>` delimiters.
///
/// Borrows the input when it contains no tags.
#[must_use]
pub fn strip_tags(text: &str) -> Cow<'_, str> {
    TAG_REGEX.replace_all(text, "")
}
