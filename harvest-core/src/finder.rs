//! Pattern finding — every match of one pattern, or only the N-th.
//!
//! Matching is leftmost and non-overlapping over the whole text. The
//! `iteration` selector is 1-based; 0 selects every match. An ordinal past
//! the last match, like a pattern that matches nothing, yields an empty
//! sequence rather than an error.

use std::sync::Arc;

use regex::Regex;

use crate::error::Result;
use crate::pattern::Pattern;
use crate::types::MatchSpan;

/// The lazy result of a find: restartable through [`Found::iter`].
///
/// Nothing is scanned until an iterator is driven, and each call to `iter`
/// rescans from the start of the text.
#[derive(Debug, Clone)]
pub struct Found<'t> {
    regex: Arc<Regex>,
    text: &'t str,
    iteration: usize,
}

impl<'t> Found<'t> {
    pub(crate) fn new(regex: Arc<Regex>, text: &'t str, iteration: usize) -> Self {
        Self {
            regex,
            text,
            iteration,
        }
    }

    /// Iterate the selected matched substrings.
    #[must_use]
    pub fn iter(&self) -> FoundIter<'_, 't> {
        FoundIter {
            inner: self.regex.find_iter(self.text),
            iteration: self.iteration,
            done: false,
        }
    }

    /// Collect the selected matches into owned strings.
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        self.iter().map(str::to_owned).collect()
    }

    /// Whether the selection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

impl<'a, 't> IntoIterator for &'a Found<'t> {
    type Item = &'t str;
    type IntoIter = FoundIter<'a, 't>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the matched substrings selected by a [`Found`].
#[derive(Debug)]
pub struct FoundIter<'r, 't> {
    inner: regex::Matches<'r, 't>,
    iteration: usize,
    done: bool,
}

impl<'t> Iterator for FoundIter<'_, 't> {
    type Item = &'t str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.iteration == 0 {
            return self.inner.next().map(|m| m.as_str());
        }
        self.done = true;
        self.inner.nth(self.iteration - 1).map(|m| m.as_str())
    }
}

/// Find matches of `pattern` in `text`.
///
/// # Errors
/// Returns [`HarvestError::InvalidPattern`](crate::HarvestError::InvalidPattern)
/// if the pattern does not compile.
pub fn find<'t>(text: &'t str, pattern: &Pattern, iteration: usize) -> Result<Found<'t>> {
    Ok(find_compiled(pattern.compile()?, text, iteration))
}

/// Find matches using an already-compiled regex.
#[must_use]
pub fn find_compiled(regex: Arc<Regex>, text: &str, iteration: usize) -> Found<'_> {
    Found::new(regex, text, iteration)
}

/// Spans of every non-overlapping match in `haystack` at or after byte
/// offset `from`.
///
/// Unlike searching a sub-slice, look-around assertions (`\b`, `^`) still
/// see the bytes before `from`. An empty match that touches the end of the
/// previous match is skipped, matching `find_iter`.
pub(crate) fn spans_from(regex: &Regex, haystack: &str, from: usize) -> Vec<MatchSpan> {
    let mut spans = Vec::new();
    let mut pos = from;
    let mut last_end: Option<usize> = None;

    while pos <= haystack.len() {
        let Some(m) = regex.find_at(haystack, pos) else {
            break;
        };
        if m.is_empty() && last_end == Some(m.end()) {
            match next_boundary(haystack, m.end()) {
                Some(next) => {
                    pos = next;
                    continue;
                }
                None => break,
            }
        }
        spans.push(MatchSpan::from(m));
        last_end = Some(m.end());
        pos = if m.is_empty() {
            match next_boundary(haystack, m.end()) {
                Some(next) => next,
                None => break,
            }
        } else {
            m.end()
        };
    }
    spans
}

/// Byte offset of the char boundary after `offset`, if any.
fn next_boundary(text: &str, offset: usize) -> Option<usize> {
    text[offset..].chars().next().map(|c| offset + c.len_utf8())
}
