//! Set-based precision, recall and F1 over many instances.
//!
//! Conventions for degenerate counts:
//!
//! | Case | Value |
//! |------|-------|
//! | no prediction (`tp + fp == 0`) | precision = 1 |
//! | no gold (`tp + fn == 0`) | recall = 1 |
//! | `precision + recall == 0` | F1 = 0 |
//!
//! so an instance with neither gold nor predictions scores a perfect 1.

use crate::learn::{feature_list_repr, Fixed};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;

// =============================================================================
// Per-instance counts
// =============================================================================

/// True positives, false positives and false negatives of one instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetMetrics {
    /// Predicted and in gold
    pub tp: usize,
    /// Predicted, not in gold
    pub fp: usize,
    /// In gold, not predicted
    pub fn_: usize,
}

impl SetMetrics {
    /// Compare a predicted set with the gold set.
    pub fn compare<T: Eq + Hash>(gold: &HashSet<T>, predicted: &HashSet<T>) -> Self {
        let tp = predicted.intersection(gold).count();
        Self {
            tp,
            fp: predicted.len() - tp,
            fn_: gold.len() - tp,
        }
    }

    /// Precision.
    #[must_use]
    pub fn precision(&self) -> f64 {
        precision(self.tp, self.fp)
    }

    /// Recall.
    #[must_use]
    pub fn recall(&self) -> f64 {
        recall(self.tp, self.fn_)
    }

    /// F1.
    #[must_use]
    pub fn f1(&self) -> f64 {
        f1(self.precision(), self.recall())
    }
}

fn precision(tp: usize, fp: usize) -> f64 {
    if tp + fp == 0 {
        1.0
    } else {
        tp as f64 / (tp + fp) as f64
    }
}

fn recall(tp: usize, fn_: usize) -> f64 {
    if tp + fn_ == 0 {
        1.0
    } else {
        tp as f64 / (tp + fn_) as f64
    }
}

fn f1(p: f64, r: f64) -> f64 {
    if p + r == 0.0 {
        0.0
    } else {
        2.0 * p * r / (p + r)
    }
}

// =============================================================================
// Aggregates
// =============================================================================

/// Micro and macro metrics over a list of instances.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsResultSet {
    /// Per-instance counts, in instance order
    pub instances: Vec<SetMetrics>,
}

impl MetricsResultSet {
    /// Aggregate per-instance counts.
    #[must_use]
    pub fn new(instances: Vec<SetMetrics>) -> Self {
        Self { instances }
    }

    /// Compare predicted and gold sets instance by instance.
    pub fn from_sets<'a, T, I>(pairs: I) -> Self
    where
        T: Eq + Hash + 'a,
        I: IntoIterator<Item = (&'a HashSet<T>, &'a HashSet<T>)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(gold, predicted)| SetMetrics::compare(gold, predicted))
                .collect(),
        )
    }

    /// Number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// True if no instance was evaluated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Total true positives.
    #[must_use]
    pub fn global_tp(&self) -> usize {
        self.instances.iter().map(|m| m.tp).sum()
    }

    /// Total false positives.
    #[must_use]
    pub fn global_fp(&self) -> usize {
        self.instances.iter().map(|m| m.fp).sum()
    }

    /// Total false negatives.
    #[must_use]
    pub fn global_fn(&self) -> usize {
        self.instances.iter().map(|m| m.fn_).sum()
    }

    /// Precision over the summed counts.
    #[must_use]
    pub fn micro_precision(&self) -> f64 {
        precision(self.global_tp(), self.global_fp())
    }

    /// Recall over the summed counts.
    #[must_use]
    pub fn micro_recall(&self) -> f64 {
        recall(self.global_tp(), self.global_fn())
    }

    /// F1 of micro precision and recall.
    #[must_use]
    pub fn micro_f1(&self) -> f64 {
        f1(self.micro_precision(), self.micro_recall())
    }

    fn mean(&self, f: impl Fn(&SetMetrics) -> f64) -> f64 {
        if self.instances.is_empty() {
            return 0.0;
        }
        self.instances.iter().map(f).sum::<f64>() / self.instances.len() as f64
    }

    /// Mean per-instance precision.
    #[must_use]
    pub fn macro_precision(&self) -> f64 {
        self.mean(SetMetrics::precision)
    }

    /// Mean per-instance recall.
    #[must_use]
    pub fn macro_recall(&self) -> f64 {
        self.mean(SetMetrics::recall)
    }

    /// Mean per-instance F1.
    #[must_use]
    pub fn macro_f1(&self) -> f64 {
        self.mean(SetMetrics::f1)
    }
}

// =============================================================================
// Model configuration results
// =============================================================================

/// Evaluation of one trained model configuration on development data.
///
/// Parameters that do not apply to a model family are `-1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfigurationResult {
    /// 1-based features the model was trained on
    pub features: Vec<usize>,
    /// Positive class weight
    pub w_pos: f64,
    /// Negative class weight
    pub w_neg: f64,
    /// Kernel gamma
    pub gamma: f64,
    /// Cost
    pub c: f64,
    /// Link-back threshold, when swept
    pub threshold: Option<f64>,
    /// Global true positives
    pub tp: usize,
    /// Global false positives
    pub fp: usize,
    /// Global false negatives
    pub fn_: usize,
    /// Examples that were neither: total examples minus tp, fp and fn
    pub tn: usize,
    /// Micro F1
    pub micro_f1: f64,
    /// Macro F1
    pub macro_f1: f64,
    /// Macro recall
    pub macro_recall: f64,
    /// Macro precision
    pub macro_precision: f64,
}

impl ModelConfigurationResult {
    /// Summarize `metrics` for a configuration evaluated on `examples` examples.
    #[must_use]
    pub fn new(
        features: Vec<usize>,
        params: ModelParams,
        metrics: &MetricsResultSet,
        examples: usize,
    ) -> Self {
        let (tp, fp, fn_) = (metrics.global_tp(), metrics.global_fp(), metrics.global_fn());
        Self {
            features,
            w_pos: params.w_pos,
            w_neg: params.w_neg,
            gamma: params.gamma,
            c: params.c,
            threshold: params.threshold,
            tp,
            fp,
            fn_,
            tn: examples.saturating_sub(tp + fp + fn_),
            micro_f1: metrics.micro_f1(),
            macro_f1: metrics.macro_f1(),
            macro_recall: metrics.macro_recall(),
            macro_precision: metrics.macro_precision(),
        }
    }

    /// One-line summary.
    ///
    /// ```text
    /// Features:1-3,5 wPos:-1.00000 wNeg:-1.00000 gamma:-1.00000000 C:0.10000000 thr:0.500 TP/FP/FN/TN:8/2/3/40 mic-F1:0.7273 mac-P/R/F1:0.8000/0.7000/0.7200
    /// ```
    #[must_use]
    pub fn readable(&self) -> String {
        let threshold = self
            .threshold
            .map(|t| format!(" thr:{}", Fixed(t, 3)))
            .unwrap_or_default();
        format!(
            "Features:{} wPos:{} wNeg:{} gamma:{} C:{}{} TP/FP/FN/TN:{}/{}/{}/{} mic-F1:{} mac-P/R/F1:{}/{}/{}",
            feature_list_repr(&self.features),
            Fixed(self.w_pos, 5),
            Fixed(self.w_neg, 5),
            Fixed(self.gamma, 8),
            Fixed(self.c, 8),
            threshold,
            self.tp,
            self.fp,
            self.fn_,
            self.tn,
            Fixed(self.micro_f1, 4),
            Fixed(self.macro_precision, 4),
            Fixed(self.macro_recall, 4),
            Fixed(self.macro_f1, 4)
        )
    }
}

/// Training parameters recorded with a [`ModelConfigurationResult`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelParams {
    /// Positive class weight
    pub w_pos: f64,
    /// Negative class weight
    pub w_neg: f64,
    /// Kernel gamma
    pub gamma: f64,
    /// Cost
    pub c: f64,
    /// Link-back threshold
    pub threshold: Option<f64>,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            w_pos: -1.0,
            w_neg: -1.0,
            gamma: -1.0,
            c: -1.0,
            threshold: None,
        }
    }
}

impl ModelParams {
    /// Parameters of a model that only has a cost.
    #[must_use]
    pub fn cost(c: f64) -> Self {
        Self {
            c,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[u32]) -> HashSet<u32> {
        items.iter().copied().collect()
    }

    #[test]
    fn counts() {
        let m = SetMetrics::compare(&set(&[1, 2, 3]), &set(&[2, 3, 4, 5]));
        assert_eq!(m, SetMetrics { tp: 2, fp: 2, fn_: 1 });
        assert!((m.precision() - 0.5).abs() < 1e-12);
        assert!((m.recall() - 2.0 / 3.0).abs() < 1e-12);
        assert!((m.f1() - 4.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_conventions() {
        let empty = SetMetrics::compare(&set(&[]), &set(&[]));
        assert_eq!(empty.precision(), 1.0);
        assert_eq!(empty.recall(), 1.0);
        assert_eq!(empty.f1(), 1.0);

        let missed = SetMetrics::compare(&set(&[1]), &set(&[]));
        assert_eq!(missed.precision(), 1.0);
        assert_eq!(missed.recall(), 0.0);
        assert_eq!(missed.f1(), 0.0);

        let wrong = SetMetrics::compare(&set(&[1]), &set(&[2]));
        assert_eq!(wrong.f1(), 0.0);
    }

    #[test]
    fn micro_vs_macro() {
        let gold = [set(&[1, 2]), set(&[3])];
        let pred = [set(&[1, 2]), set(&[4])];
        let r = MetricsResultSet::from_sets(gold.iter().zip(pred.iter()));
        assert_eq!((r.global_tp(), r.global_fp(), r.global_fn()), (2, 1, 1));
        assert!((r.micro_precision() - 2.0 / 3.0).abs() < 1e-12);
        assert!((r.macro_precision() - 0.5).abs() < 1e-12);
        assert!((r.macro_f1() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn configuration_summary() {
        let metrics = MetricsResultSet::new(vec![SetMetrics { tp: 8, fp: 2, fn_: 3 }]);
        let r = ModelConfigurationResult::new(
            vec![5, 1, 2, 3],
            ModelParams {
                threshold: Some(0.5),
                ..ModelParams::cost(0.1)
            },
            &metrics,
            53,
        );
        assert_eq!(r.tn, 40);
        let line = r.readable();
        assert!(line.starts_with("Features:1-3,5 wPos:-1.00000 wNeg:-1.00000 gamma:-1.00000000 C:0.10000000 thr:0.500"));
        assert!(line.contains("TP/FP/FN/TN:8/2/3/40"));
    }
}
