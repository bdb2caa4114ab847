//! Candidate generation and max-over-evidence scoring.

use crate::linkback::segments::SegmentFinder;
use crate::{Annotation, EntityId, FeaturePack};
use std::collections::HashMap;

/// Every `(entity, segment)` pair of a query as a candidate annotation.
///
/// Entity-major: all segments of the first entity, then all segments of the
/// second, and so on.
#[must_use]
pub fn candidate_annotations(
    query: &str,
    entities: &[EntityId],
    segmenter: &dyn SegmentFinder,
) -> Vec<Annotation> {
    let segments = segmenter.find_segments(query);
    entities
        .iter()
        .flat_map(|&entity| {
            segments
                .iter()
                .map(move |&(start, end)| Annotation::from_segment(start, end, entity))
        })
        .collect()
}

/// Evidence items per entity, in insertion order.
///
/// An entity can be supported by several independent pieces of evidence for
/// the same query (one per search result source, say); each yields its own
/// feature pack when a candidate is scored.
#[derive(Debug, Clone)]
pub struct EvidenceMap<E> {
    entries: Vec<(EntityId, Vec<E>)>,
    index: HashMap<EntityId, usize>,
}

impl<E> Default for EvidenceMap<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EvidenceMap<E> {
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Add one evidence item for `entity`.
    pub fn insert(&mut self, entity: impl Into<EntityId>, evidence: E) {
        let entity = entity.into();
        let slot = *self.index.entry(entity).or_insert_with(|| {
            self.entries.push((entity, Vec::new()));
            self.entries.len() - 1
        });
        self.entries[slot].1.push(evidence);
    }

    /// Evidence of `entity`; empty if none was recorded.
    #[must_use]
    pub fn get(&self, entity: EntityId) -> &[E] {
        self.index
            .get(&entity)
            .map_or(&[], |&i| self.entries[i].1.as_slice())
    }

    /// Entities with evidence, in first-insertion order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entries.iter().map(|(e, _)| *e)
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no evidence was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E> FromIterator<(EntityId, E)> for EvidenceMap<E> {
    fn from_iter<I: IntoIterator<Item = (EntityId, E)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (entity, evidence) in iter {
            map.insert(entity, evidence);
        }
        map
    }
}

/// Highest score over an entity's evidence.
///
/// No evidence scores `-inf`. NaN scores never win.
pub fn best_score<'a, E: 'a, I, F>(evidence: I, mut scorer: F) -> f64
where
    I: IntoIterator<Item = &'a E>,
    F: FnMut(&E) -> f64,
{
    let mut best = f64::NEG_INFINITY;
    for e in evidence {
        let score = scorer(e);
        if score > best {
            best = score;
        }
    }
    best
}

/// Builds the feature pack of a candidate annotation from one evidence item.
pub trait AnnotationFeatureBuilder<E>: Send + Sync {
    /// Features of `annotation` in `query`, given `evidence` for its entity.
    fn features(&self, query: &str, annotation: &Annotation, evidence: &E) -> FeaturePack;
}

impl<E, F> AnnotationFeatureBuilder<E> for F
where
    F: Fn(&str, &Annotation, &E) -> FeaturePack + Send + Sync,
{
    fn features(&self, query: &str, annotation: &Annotation, evidence: &E) -> FeaturePack {
        self(query, annotation, evidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linkback::TokenSegmenter;

    #[test]
    fn cross_product_is_entity_major() {
        let c = candidate_annotations(
            "neil armstrong",
            &[EntityId(7), EntityId(3)],
            &TokenSegmenter::new(),
        );
        assert_eq!(
            c,
            vec![
                Annotation::new(0, 4, 7),
                Annotation::new(0, 14, 7),
                Annotation::new(5, 9, 7),
                Annotation::new(0, 4, 3),
                Annotation::new(0, 14, 3),
                Annotation::new(5, 9, 3),
            ]
        );
    }

    #[test]
    fn no_entities_no_candidates() {
        assert!(candidate_annotations("neil", &[], &TokenSegmenter::new()).is_empty());
    }

    #[test]
    fn evidence_keeps_insertion_order() {
        let mut m = EvidenceMap::new();
        m.insert(5, "a");
        m.insert(2, "b");
        m.insert(5, "c");
        assert_eq!(m.get(EntityId(5)), &["a", "c"]);
        assert_eq!(m.get(EntityId(9)), &[] as &[&str]);
        assert_eq!(m.entities().collect::<Vec<_>>(), vec![EntityId(5), EntityId(2)]);
    }

    #[test]
    fn best_score_is_max() {
        assert_eq!(best_score(&[0.2, 0.7, 0.1], |x| *x), 0.7);
        assert_eq!(best_score(&[] as &[f64], |x| *x), f64::NEG_INFINITY);
        assert_eq!(best_score(&[f64::NAN, 0.3], |x| *x), 0.3);
    }
}
