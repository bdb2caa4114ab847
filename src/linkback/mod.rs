//! Link-back: from accepted entities to a disjoint set of query annotations.
//!
//! ```text
//! query + accepted entities
//!        │
//!        ▼  candidate_annotations      every (entity, segment) pair
//! candidates
//!        │
//!        ▼  best_score                 max over the entity's evidence packs
//! (annotation, score)
//!        │
//!        ▼  LinkBackResolver           greedy, score-ordered, non-overlapping
//! final annotations
//! ```

mod candidates;
mod resolver;
mod segments;

pub use candidates::{best_score, candidate_annotations, AnnotationFeatureBuilder, EvidenceMap};
pub use resolver::{resolve, LinkBackResolver, DEFAULT_THRESHOLD};
pub use segments::{Segment, SegmentFinder, TokenSegmenter};

use crate::learn::FeatureNormalizer;
use crate::models::Regressor;
use crate::{Annotation, EntityId, ScoredAnnotation};

/// Scores each candidate annotation on its own, then resolves conflicts.
pub struct IndividualLinkBack<S, B, R, N> {
    segmenter: S,
    builder: B,
    regressor: R,
    normalizer: N,
    resolver: LinkBackResolver,
}

impl<S, B, R, N> IndividualLinkBack<S, B, R, N>
where
    S: SegmentFinder,
    R: Regressor,
    N: FeatureNormalizer,
{
    /// Link-back with the default resolver.
    pub fn new(segmenter: S, builder: B, regressor: R, normalizer: N) -> Self {
        Self {
            segmenter,
            builder,
            regressor,
            normalizer,
            resolver: LinkBackResolver::default(),
        }
    }

    /// Replace the resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: LinkBackResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// The resolver in use.
    pub fn resolver(&self) -> &LinkBackResolver {
        &self.resolver
    }

    /// Every candidate with its best score, before conflict resolution.
    pub fn score_candidates<E>(
        &self,
        query: &str,
        entities: &[EntityId],
        evidence: &EvidenceMap<E>,
    ) -> Vec<(Annotation, f64)>
    where
        B: AnnotationFeatureBuilder<E>,
    {
        candidate_annotations(query, entities, &self.segmenter)
            .into_iter()
            .map(|annotation| {
                let score = best_score(evidence.get(annotation.entity), |e| {
                    let features = self.builder.features(query, &annotation, e);
                    self.regressor.predict_score(&features, &self.normalizer)
                });
                (annotation, score)
            })
            .collect()
    }

    /// Final annotations of `query`.
    pub fn link_back<E>(
        &self,
        query: &str,
        entities: &[EntityId],
        evidence: &EvidenceMap<E>,
    ) -> Vec<ScoredAnnotation>
    where
        B: AnnotationFeatureBuilder<E>,
    {
        let scored = self.score_candidates(query, entities, evidence);
        log::debug!(
            "link-back on '{}': {} candidates for {} entities",
            query,
            scored.len(),
            entities.len()
        );
        self.resolver.resolve(scored)
    }
}
