//! Greedy conflict resolution over scored candidate spans.

use crate::order::{sort_descending, TieOrder};
use crate::{Annotation, ScoredAnnotation};
use serde::{Deserialize, Serialize};

/// Default acceptance threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Turns scored, overlapping candidate spans into a disjoint annotation set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkBackResolver {
    threshold: f64,
    tie_order: TieOrder,
}

impl Default for LinkBackResolver {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl LinkBackResolver {
    /// Resolver accepting scores `>= threshold`.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            tie_order: TieOrder::default(),
        }
    }

    /// Set how equal scores are ordered.
    #[must_use]
    pub fn with_tie_order(mut self, tie_order: TieOrder) -> Self {
        self.tie_order = tie_order;
        self
    }

    /// Acceptance threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Tie order among equal scores.
    #[must_use]
    pub fn tie_order(&self) -> TieOrder {
        self.tie_order
    }

    /// Select the final annotations.
    ///
    /// # Algorithm
    ///
    /// 1. Sort candidates by descending score (ties per [`TieOrder`])
    /// 2. Walk them in order; stop at the first score below the threshold
    /// 3. Accept a candidate if it overlaps no accepted span
    ///
    /// Accepted spans are never evicted, so the result is greedy, not the
    /// best-scoring disjoint subset. Output is in acceptance order.
    ///
    /// # Example
    ///
    /// ```rust
    /// use annolink::linkback::LinkBackResolver;
    /// use annolink::Annotation;
    ///
    /// let candidates = vec![
    ///     (Annotation::new(0, 5, 1), 0.9),
    ///     (Annotation::new(2, 4, 2), 0.8),
    ///     (Annotation::new(10, 3, 3), 0.95),
    /// ];
    /// let result = LinkBackResolver::new(0.5).resolve(candidates);
    /// let starts: Vec<usize> = result.iter().map(|a| a.start).collect();
    /// assert_eq!(starts, vec![10, 0]);
    /// ```
    #[must_use]
    pub fn resolve(&self, mut candidates: Vec<(Annotation, f64)>) -> Vec<ScoredAnnotation> {
        sort_descending(&mut candidates, self.tie_order, |c| c.1);

        let mut accepted: Vec<ScoredAnnotation> = Vec::new();
        for (annotation, score) in candidates {
            if score < self.threshold {
                break;
            }
            if score.is_nan() {
                log::warn!("candidate {} has a NaN score", annotation);
            }
            if accepted.iter().all(|a| !annotation.overlaps(&a.annotation())) {
                accepted.push(annotation.scored(score));
            }
        }
        log::trace!("link-back accepted {} annotations", accepted.len());
        accepted
    }
}

/// [`LinkBackResolver::resolve`] with the default tie order.
#[must_use]
pub fn resolve(candidates: Vec<(Annotation, f64)>, threshold: f64) -> Vec<ScoredAnnotation> {
    LinkBackResolver::new(threshold).resolve(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Vec<(Annotation, f64)> {
        vec![
            (Annotation::new(0, 5, 1), 0.9),
            (Annotation::new(2, 4, 2), 0.8),
            (Annotation::new(10, 3, 3), 0.95),
        ]
    }

    #[test]
    fn overlapping_lower_score_is_dropped() {
        let r = resolve(scenario(), 0.5);
        let got: Vec<Annotation> = r.iter().map(ScoredAnnotation::annotation).collect();
        assert_eq!(got, vec![Annotation::new(10, 3, 3), Annotation::new(0, 5, 1)]);
        assert_eq!(r[0].score, 0.95);
    }

    #[test]
    fn walk_stops_at_threshold() {
        let r = resolve(scenario(), 0.92);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].annotation(), Annotation::new(10, 3, 3));
    }

    #[test]
    fn empty_input() {
        assert!(resolve(Vec::new(), 0.0).is_empty());
    }

    #[test]
    fn score_equal_to_threshold_is_accepted() {
        let r = resolve(vec![(Annotation::new(0, 1, 1), 0.5)], 0.5);
        assert_eq!(r.len(), 1);
    }

    #[test]
    fn ties_prefer_later_candidate_by_default() {
        let c = vec![(Annotation::new(0, 4, 1), 0.7), (Annotation::new(0, 4, 2), 0.7)];
        let r = resolve(c.clone(), 0.0);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].entity.get(), 2);

        let r = LinkBackResolver::new(0.0)
            .with_tie_order(TieOrder::Insertion)
            .resolve(c);
        assert_eq!(r[0].entity.get(), 1);
    }

    #[test]
    fn adjacent_spans_do_not_conflict() {
        let c = vec![(Annotation::new(0, 4, 1), 0.9), (Annotation::new(4, 3, 2), 0.8)];
        assert_eq!(resolve(c, 0.0).len(), 2);
    }

    #[test]
    fn nan_scores_are_visited_first() {
        let c = vec![(Annotation::new(0, 4, 1), 0.9), (Annotation::new(0, 4, 2), f64::NAN)];
        let r = resolve(c, 0.5);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0].entity.get(), 2);
    }
}
