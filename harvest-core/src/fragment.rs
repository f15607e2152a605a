//! Fragment extraction — text carved between a start match and an end match.
//!
//! For every selected start match the end pattern is searched in the text
//! that follows it, optionally limited to a window of `max_window`
//! characters counted from where the start match begins. Each qualifying end
//! match yields one [`Fragment`] that includes both boundary matches.
//!
//! ```text
//!  text:   ....<div>A</div><div>B</div>....
//!              ^start      ^end
//!              └──────────┘  fragment (inclusive)
//!              |<- max_window chars ->|   end search region when bounded
//! ```
//!
//! With `end_iteration == 0` *every* end match after a start qualifies, so
//! the first `<div>` above also pairs with the second `</div>`. Use
//! `end_iteration == 1` for "nearest closing match".

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::Result;
use crate::finder::spans_from;
use crate::metrics::ScrapeCounters;
use crate::pattern::Pattern;
use crate::types::MatchSpan;

/// Selection and bounding options for [`extract`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// 1-based ordinal of the start match to use; 0 uses every start match.
    #[serde(default)]
    pub start_iteration: usize,
    /// 1-based ordinal of the end match (within each start's search region);
    /// 0 emits one fragment per end match in the region.
    #[serde(default)]
    pub end_iteration: usize,
    /// Stop after this many fragments; 0 is unbounded.
    #[serde(default)]
    pub maximum_matches: usize,
    /// Characters, counted from the start of a start match, within which the
    /// end match must lie; 0 searches to the end of the text.
    #[serde(default)]
    pub max_window: usize,
}

impl ExtractOptions {
    /// Every start, every end, no cap, no window.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Every start paired with its nearest end match.
    #[must_use]
    pub fn nearest() -> Self {
        Self {
            end_iteration: 1,
            ..Self::default()
        }
    }

    /// Select a single start ordinal.
    #[must_use]
    pub fn with_start_iteration(mut self, start_iteration: usize) -> Self {
        self.start_iteration = start_iteration;
        self
    }

    /// Select a single end ordinal per start.
    #[must_use]
    pub fn with_end_iteration(mut self, end_iteration: usize) -> Self {
        self.end_iteration = end_iteration;
        self
    }

    /// Cap the number of fragments.
    #[must_use]
    pub fn with_maximum_matches(mut self, maximum_matches: usize) -> Self {
        self.maximum_matches = maximum_matches;
        self
    }

    /// Bound the end search to a window of characters.
    #[must_use]
    pub fn with_max_window(mut self, max_window: usize) -> Self {
        self.max_window = max_window;
        self
    }
}

/// A substring bounded by a start match and an end match, inclusive of both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'t> {
    text: &'t str,
    span: MatchSpan,
}

impl<'t> Fragment<'t> {
    /// The fragment text.
    #[must_use]
    pub fn as_str(&self) -> &'t str {
        self.text
    }

    /// Where the fragment sits in the source text (byte offsets).
    #[must_use]
    pub fn span(&self) -> MatchSpan {
        self.span
    }
}

impl fmt::Display for Fragment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

impl PartialEq<str> for Fragment<'_> {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for Fragment<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

impl AsRef<str> for Fragment<'_> {
    fn as_ref(&self) -> &str {
        self.text
    }
}

impl From<Fragment<'_>> for String {
    fn from(fragment: Fragment<'_>) -> Self {
        fragment.text.to_owned()
    }
}

/// Lazy iterator of fragments.
///
/// Start matches are located on the first call to `next`; end matches are
/// located one start match at a time.
pub struct Fragments<'t> {
    text: &'t str,
    start_regex: Arc<Regex>,
    end_regex: Arc<Regex>,
    options: ExtractOptions,
    starts: Option<std::vec::IntoIter<MatchSpan>>,
    current: Option<(MatchSpan, std::vec::IntoIter<MatchSpan>)>,
    emitted: usize,
    counters: Option<Arc<ScrapeCounters>>,
}

impl<'t> Fragments<'t> {
    pub(crate) fn new(
        text: &'t str,
        start_regex: Arc<Regex>,
        end_regex: Arc<Regex>,
        options: ExtractOptions,
    ) -> Self {
        Self {
            text,
            start_regex,
            end_regex,
            options,
            starts: None,
            current: None,
            emitted: 0,
            counters: None,
        }
    }

    pub(crate) fn with_counters(mut self, counters: Arc<ScrapeCounters>) -> Self {
        self.counters = Some(counters);
        self
    }

    /// The options this iterator was built with.
    #[must_use]
    pub fn options(&self) -> ExtractOptions {
        self.options
    }

    /// Number of fragments yielded so far.
    #[must_use]
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    fn capped(&self) -> bool {
        self.options.maximum_matches != 0 && self.emitted >= self.options.maximum_matches
    }

    fn selected_starts(&self) -> std::vec::IntoIter<MatchSpan> {
        let spans: Vec<MatchSpan> = self
            .start_regex
            .find_iter(self.text)
            .map(MatchSpan::from)
            .collect();
        select(spans, self.options.start_iteration).into_iter()
    }

    fn ends_for(&self, start: MatchSpan) -> std::vec::IntoIter<MatchSpan> {
        let region_end = search_region_end(self.text, start, self.options.max_window);
        if region_end < start.end() {
            return Vec::new().into_iter();
        }
        let spans = spans_from(&self.end_regex, &self.text[..region_end], start.end());
        select(spans, self.options.end_iteration).into_iter()
    }
}

impl<'t> Iterator for Fragments<'t> {
    type Item = Fragment<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.starts.is_none() {
            self.starts = Some(self.selected_starts());
        }

        loop {
            if self.capped() {
                return None;
            }

            if let Some((start, ends)) = &mut self.current {
                if let Some(end) = ends.next() {
                    let span = MatchSpan::new(start.start, end.end());
                    self.emitted += 1;
                    if let Some(counters) = &self.counters {
                        ScrapeCounters::incr(&counters.fragments_emitted);
                    }
                    trace!(%span, "Fragment emitted");
                    return Some(Fragment {
                        text: &self.text[span.range()],
                        span,
                    });
                }
            }

            let start = self.starts.as_mut()?.next()?;
            let ends = self.ends_for(start);
            self.current = Some((start, ends));
        }
    }
}

impl fmt::Debug for Fragments<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fragments")
            .field("start", &self.start_regex.as_str())
            .field("end", &self.end_regex.as_str())
            .field("options", &self.options)
            .field("emitted", &self.emitted)
            .finish_non_exhaustive()
    }
}

/// Keep every span (ordinal 0) or only the 1-based `ordinal`-th one.
fn select(spans: Vec<MatchSpan>, ordinal: usize) -> Vec<MatchSpan> {
    if ordinal == 0 {
        return spans;
    }
    spans.into_iter().nth(ordinal - 1).into_iter().collect()
}

/// Exclusive byte offset where the end search for `start` must stop.
///
/// Unbounded when `max_window` is 0 or when fewer than `max_window`
/// characters follow the start match; otherwise the window covers
/// `max_window` characters from the beginning of the start match.
fn search_region_end(text: &str, start: MatchSpan, max_window: usize) -> usize {
    if max_window == 0 {
        return text.len();
    }
    if text[start.end()..].chars().nth(max_window - 1).is_none() {
        return text.len();
    }
    text[start.start..]
        .char_indices()
        .nth(max_window)
        .map_or(text.len(), |(offset, _)| start.start + offset)
}

/// Extract fragments bounded by `start` and `end` matches.
///
/// # Errors
/// Returns [`HarvestError::InvalidPattern`](crate::HarvestError::InvalidPattern)
/// if either pattern does not compile.
pub fn extract<'t>(
    text: &'t str,
    start: &Pattern,
    end: &Pattern,
    options: ExtractOptions,
) -> Result<Fragments<'t>> {
    Ok(extract_compiled(
        start.compile()?,
        end.compile()?,
        text,
        options,
    ))
}

/// Extract fragments using already-compiled boundary regexes.
#[must_use]
pub fn extract_compiled(
    start: Arc<Regex>,
    end: Arc<Regex>,
    text: &str,
    options: ExtractOptions,
) -> Fragments<'_> {
    Fragments::new(text, start, end, options)
}
