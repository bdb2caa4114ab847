//! Query segmentation: which spans of a query may carry an annotation.

use once_cell::sync::Lazy;
use regex::Regex;

/// A `(start, end)` span in characters, end exclusive.
pub type Segment = (usize, usize);

/// Finds the candidate segments of a query.
pub trait SegmentFinder: Send + Sync {
    /// Segments of `query`, in character offsets.
    fn find_segments(&self, query: &str) -> Vec<Segment>;
}

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// Every contiguous run of word tokens.
///
/// `"neil armstrong moon"` yields, in this order:
///
/// ```text
/// neil  neil armstrong  neil armstrong moon  armstrong  armstrong moon  moon
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenSegmenter {
    max_tokens: Option<usize>,
}

impl TokenSegmenter {
    /// Segmenter with no limit on segment length.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Segments span at most `max_tokens` tokens.
    #[must_use]
    pub fn with_max_tokens(max_tokens: usize) -> Self {
        Self {
            max_tokens: Some(max_tokens),
        }
    }

    /// Token spans of `query` in character offsets.
    #[must_use]
    pub fn tokens(query: &str) -> Vec<Segment> {
        // byte offset -> char offset, one pass
        let mut char_at = vec![0usize; query.len() + 1];
        let mut chars = 0;
        for (byte, ch) in query.char_indices() {
            for slot in &mut char_at[byte..byte + ch.len_utf8()] {
                *slot = chars;
            }
            chars += 1;
        }
        char_at[query.len()] = chars;

        WORD
            .find_iter(query)
            .map(|m| (char_at[m.start()], char_at[m.end()]))
            .collect()
    }
}

impl SegmentFinder for TokenSegmenter {
    fn find_segments(&self, query: &str) -> Vec<Segment> {
        let tokens = Self::tokens(query);
        let max = self.max_tokens.unwrap_or(tokens.len());
        let mut segments = Vec::new();
        for first in 0..tokens.len() {
            for last in first..tokens.len().min(first.saturating_add(max)) {
                segments.push((tokens[first].0, tokens[last].1));
            }
        }
        segments
    }
}
