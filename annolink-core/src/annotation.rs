//! Annotations: spans of a query linked to a knowledge-base entity.
//!
//! Offsets are character offsets into the query. A span covers the half-open
//! interval `[start, start + length)`.
//!
//! ```text
//! query:  "armstrong moon landing"
//!          0         10   15
//!          [=========]              Annotation(0, 9, Neil_Armstrong)
//!                    [====]         Annotation(10, 4, Moon)
//!                    [===========]  Annotation(10, 12, Moon_landing)  ← overlaps Moon
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifier of a knowledge-base entity (e.g. a Wikipedia page id).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct EntityId(pub i64);

impl EntityId {
    /// Raw identifier.
    #[must_use]
    #[inline]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<i32> for EntityId {
    fn from(id: i32) -> Self {
        Self(i64::from(id))
    }
}

/// A candidate span linked to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Annotation {
    /// Start character offset (inclusive)
    pub start: usize,
    /// Number of characters covered
    pub length: usize,
    /// Linked entity
    pub entity: EntityId,
}

impl Annotation {
    /// Create a new annotation.
    #[must_use]
    pub fn new(start: usize, length: usize, entity: impl Into<EntityId>) -> Self {
        Self {
            start,
            length,
            entity: entity.into(),
        }
    }

    /// Create an annotation from a `[start, end)` segment.
    ///
    /// `end` before `start` yields an empty span at `start`.
    #[must_use]
    pub fn from_segment(start: usize, end: usize, entity: impl Into<EntityId>) -> Self {
        Self::new(start, end.saturating_sub(start), entity)
    }

    /// End character offset (exclusive).
    #[must_use]
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.length
    }

    /// True if the two spans share at least one covered offset.
    ///
    /// Zero-length spans cover nothing and never overlap.
    #[must_use]
    #[inline]
    pub fn overlaps(&self, other: &Annotation) -> bool {
        self.start < other.end() && other.start < self.end()
    }

    /// True if both annotations cover the same span, regardless of entity.
    #[must_use]
    pub fn same_span(&self, other: &Annotation) -> bool {
        self.start == other.start && self.length == other.length
    }

    /// Attach a score.
    #[must_use]
    pub fn scored(self, score: f64) -> ScoredAnnotation {
        ScoredAnnotation {
            start: self.start,
            length: self.length,
            entity: self.entity,
            score,
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{})->{}", self.start, self.end(), self.entity)
    }
}

/// An annotation accepted by link-back, with the score it was accepted at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredAnnotation {
    /// Start character offset (inclusive)
    pub start: usize,
    /// Number of characters covered
    pub length: usize,
    /// Linked entity
    pub entity: EntityId,
    /// Model score
    pub score: f64,
}

impl ScoredAnnotation {
    /// The annotation without its score.
    #[must_use]
    pub fn annotation(&self) -> Annotation {
        Annotation {
            start: self.start,
            length: self.length,
            entity: self.entity,
        }
    }

    /// End character offset (exclusive).
    #[must_use]
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

impl From<ScoredAnnotation> for Annotation {
    fn from(s: ScoredAnnotation) -> Self {
        s.annotation()
    }
}

/// A whole-query hypothesis: a set of annotations scored together.
///
/// Bindings are the candidates of collective link-back, where a ranking
/// model scores complete annotation sets instead of single spans.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Binding(BTreeSet<Annotation>);

impl Binding {
    /// Create an empty binding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an annotation. Returns false if it was already present.
    pub fn insert(&mut self, annotation: Annotation) -> bool {
        self.0.insert(annotation)
    }

    /// Number of annotations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the binding holds no annotation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Annotations in span order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.0.iter()
    }

    /// True if no two annotations of the binding overlap.
    #[must_use]
    pub fn is_disjoint(&self) -> bool {
        // Sorted by start: a span overlaps an earlier one iff it starts
        // before the furthest end seen so far.
        let mut furthest_end = 0usize;
        for a in self.0.iter().filter(|a| a.length > 0) {
            if a.start < furthest_end {
                return false;
            }
            furthest_end = furthest_end.max(a.end());
        }
        true
    }
}

impl FromIterator<Annotation> for Binding {
    fn from_iter<I: IntoIterator<Item = Annotation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Binding {
    type Item = Annotation;
    type IntoIter = std::collections::btree_set::IntoIter<Annotation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_symmetric_and_half_open() {
        let a = Annotation::new(0, 5, 1);
        let b = Annotation::new(2, 4, 2);
        let c = Annotation::new(5, 3, 3);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // [0,5) and [5,8) touch but share no offset
        assert!(!a.overlaps(&c));
        assert!(!c.overlaps(&a));
    }

    #[test]
    fn zero_length_never_overlaps() {
        let empty = Annotation::new(3, 0, 1);
        let wide = Annotation::new(0, 10, 2);
        assert!(!empty.overlaps(&wide));
        assert!(!wide.overlaps(&empty));
        assert!(!empty.overlaps(&empty));
    }

    #[test]
    fn from_segment() {
        let a = Annotation::from_segment(4, 9, 7);
        assert_eq!(a.length, 5);
        assert_eq!(a.end(), 9);
        assert_eq!(Annotation::from_segment(9, 4, 7).length, 0);
    }

    #[test]
    fn scored_roundtrip_keeps_span() {
        let a = Annotation::new(1, 2, 3);
        let s = a.scored(0.7);
        assert_eq!(s.annotation(), a);
        assert_eq!(s.end(), 3);
    }

    #[test]
    fn binding_disjointness() {
        let ok: Binding = [Annotation::new(0, 3, 1), Annotation::new(4, 2, 2)]
            .into_iter()
            .collect();
        assert!(ok.is_disjoint());

        // long first span swallowing a later one
        let bad: Binding = [
            Annotation::new(0, 10, 1),
            Annotation::new(2, 1, 2),
            Annotation::new(5, 1, 3),
        ]
        .into_iter()
        .collect();
        assert!(!bad.is_disjoint());
    }

    #[test]
    fn serde_shape() {
        let a = Annotation::new(0, 5, 42);
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, r#"{"start":0,"length":5,"entity":42}"#);
    }
}
