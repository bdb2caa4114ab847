//! Filters for entities spotted in search-result snippets.

use crate::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Default minimum share of results an entity must appear in.
pub const DEFAULT_FREQUENCY_THRESHOLD: f64 = 0.03;

/// Chooses which snippet entities survive, given the result ranks they appeared at.
pub trait SnippetAnnotationFilter {
    /// Entities kept out of `entity_ranks`, for a search that returned `result_count` results.
    fn filter_annotations(
        &self,
        entity_ranks: &HashMap<EntityId, Vec<usize>>,
        result_count: usize,
    ) -> HashSet<EntityId>;
}

/// Keeps entities that appear in a large enough share of the results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyFilter {
    threshold: f64,
}

impl Default for FrequencyFilter {
    fn default() -> Self {
        Self::new(DEFAULT_FREQUENCY_THRESHOLD)
    }
}

impl FrequencyFilter {
    /// Keep an entity when `ranks / result_count >= threshold`.
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Minimum share.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl SnippetAnnotationFilter for FrequencyFilter {
    fn filter_annotations(
        &self,
        entity_ranks: &HashMap<EntityId, Vec<usize>>,
        result_count: usize,
    ) -> HashSet<EntityId> {
        // with no results every share is NaN or inf; only inf passes
        entity_ranks
            .iter()
            .filter(|(_, ranks)| ranks.len() as f64 / result_count as f64 >= self.threshold)
            .map(|(e, _)| *e)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_frequent_entities() {
        let ranks: HashMap<EntityId, Vec<usize>> = [
            (EntityId(1), vec![0, 3, 7]),
            (EntityId(2), vec![4]),
            (EntityId(3), vec![]),
        ]
        .into_iter()
        .collect();
        let kept = FrequencyFilter::new(0.1).filter_annotations(&ranks, 10);
        assert_eq!(kept, [EntityId(1), EntityId(2)].into_iter().collect());

        let kept = FrequencyFilter::new(0.2).filter_annotations(&ranks, 10);
        assert_eq!(kept, [EntityId(1)].into_iter().collect());
    }

    #[test]
    fn default_threshold() {
        let ranks: HashMap<EntityId, Vec<usize>> = [(EntityId(1), vec![5])].into_iter().collect();
        // 1 / 50 = 0.02 < 0.03
        assert!(FrequencyFilter::default().filter_annotations(&ranks, 50).is_empty());
        // 1 / 25 = 0.04
        assert_eq!(FrequencyFilter::default().filter_annotations(&ranks, 25).len(), 1);
    }
}
