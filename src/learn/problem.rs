//! Pointwise training problems in LIBSVM shape.

use serde::{Deserialize, Serialize};

/// One sparse feature: 1-based index and value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureNode {
    /// 1-based feature index
    pub index: usize,
    /// Feature value (normalized)
    pub value: f64,
}

/// A list of examples: feature rows plus one target per row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    rows: Vec<Vec<FeatureNode>>,
    targets: Vec<f64>,
}

impl Problem {
    /// Empty problem.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an example.
    pub fn push(&mut self, row: Vec<FeatureNode>, target: f64) {
        self.rows.push(row);
        self.targets.push(target);
    }

    /// Number of examples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// True if the problem has no example.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Feature rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<FeatureNode>] {
        &self.rows
    }

    /// Targets, aligned with [`rows`](Self::rows).
    #[must_use]
    pub fn targets(&self) -> &[f64] {
        &self.targets
    }

    /// `(row, target)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&[FeatureNode], f64)> {
        self.rows
            .iter()
            .map(Vec::as_slice)
            .zip(self.targets.iter().copied())
    }
}

/// Sparse nodes for the picked 1-based `indices` of a dense normalized vector.
///
/// Callers validate `indices` against the vector length first.
pub(crate) fn to_nodes(normalized: &[f64], indices: &[usize]) -> Vec<FeatureNode> {
    indices
        .iter()
        .map(|&index| FeatureNode {
            index,
            value: normalized[index - 1],
        })
        .collect()
}
