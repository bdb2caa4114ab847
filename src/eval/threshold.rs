//! Link-back threshold sweep on development data.
//!
//! Each candidate of an annotation gatherer is scored once; the scores are
//! then resolved at every threshold of the sweep and compared with the
//! group's gold annotations.

use crate::eval::metrics::{MetricsResultSet, ModelConfigurationResult, ModelParams, SetMetrics};
use crate::learn::{AnnotationGatherer, FeatureNormalizer};
use crate::linkback::LinkBackResolver;
use crate::models::Regressor;
use crate::order::TieOrder;
use crate::{Annotation, Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Metrics of one threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepPoint {
    /// Link-back threshold
    pub threshold: f64,
    /// Metrics over the development groups
    pub metrics: MetricsResultSet,
}

impl SweepPoint {
    /// Record this point for a cost-only model trained on `features`.
    #[must_use]
    pub fn to_configuration(&self, features: Vec<usize>, c: f64, examples: usize) -> ModelConfigurationResult {
        let params = ModelParams {
            threshold: Some(self.threshold),
            ..ModelParams::cost(c)
        };
        ModelConfigurationResult::new(features, params, &self.metrics, examples)
    }
}

/// Thresholds `start, start + step, ...` up to `end` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSweep {
    /// First threshold
    pub start: f64,
    /// Last threshold (inclusive)
    pub end: f64,
    /// Increment
    pub step: f64,
    /// Tie order handed to the resolver
    #[serde(default)]
    pub tie_order: TieOrder,
}

impl Default for ThresholdSweep {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 1.0,
            step: 0.1,
            tie_order: TieOrder::default(),
        }
    }
}

/// Upper bound on the thresholds of one sweep.
pub const MAX_SWEEP_POINTS: usize = 100_000;

impl ThresholdSweep {
    /// Sweep over `start..=end` by `step`.
    #[must_use]
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        Self {
            start,
            end,
            step,
            ..Self::default()
        }
    }

    /// The thresholds, computed as `start + i * step` so no error accumulates.
    pub fn thresholds(&self) -> Result<Vec<f64>> {
        if self.step.is_nan() || self.step <= 0.0 || !self.start.is_finite() || !self.end.is_finite() {
            return Err(Error::invalid_input(format!(
                "bad threshold sweep {}..={} step {}",
                self.start, self.end, self.step
            )));
        }
        if self.end < self.start {
            return Ok(Vec::new());
        }
        let steps = ((self.end - self.start) / self.step + 1e-9).floor();
        if steps >= MAX_SWEEP_POINTS as f64 {
            return Err(Error::invalid_input(format!(
                "threshold sweep {}..={} step {} exceeds {} points",
                self.start, self.end, self.step, MAX_SWEEP_POINTS
            )));
        }
        let steps = steps as usize;
        Ok((0..=steps)
            .map(|i| self.start + i as f64 * self.step)
            .collect())
    }

    /// Score every candidate of `gatherer` and evaluate link-back at each threshold.
    ///
    /// Every group needs candidate data (the annotations) and gold.
    pub fn run(
        &self,
        gatherer: &AnnotationGatherer,
        regressor: &dyn Regressor,
        normalizer: &dyn FeatureNormalizer,
    ) -> Result<Vec<SweepPoint>> {
        let thresholds = self.thresholds()?;

        let mut scored: Vec<(Vec<(Annotation, f64)>, &HashSet<Annotation>)> = Vec::new();
        for group in gatherer.feature_packs_per_group()? {
            let gold = group.gold.ok_or_else(|| {
                Error::invalid_input(format!("group {} has no gold annotations", group.group))
            })?;
            let candidates = group
                .candidates
                .iter()
                .map(|(features, annotation)| {
                    (**annotation, regressor.predict_score(features, normalizer))
                })
                .collect();
            scored.push((candidates, gold));
        }

        let points: Vec<SweepPoint> = thresholds
            .into_iter()
            .map(|threshold| {
                let resolver = LinkBackResolver::new(threshold).with_tie_order(self.tie_order);
                let instances = scored
                    .iter()
                    .map(|(candidates, gold)| {
                        let predicted: HashSet<Annotation> = resolver
                            .resolve(candidates.clone())
                            .into_iter()
                            .map(Annotation::from)
                            .collect();
                        SetMetrics::compare(*gold, &predicted)
                    })
                    .collect();
                let metrics = MetricsResultSet::new(instances);
                log::debug!(
                    "threshold {:.3}: macro F1 {:.4}, micro F1 {:.4}",
                    threshold,
                    metrics.macro_f1(),
                    metrics.micro_f1()
                );
                SweepPoint { threshold, metrics }
            })
            .collect();
        Ok(points)
    }
}

/// The point with the highest macro F1; the earliest one on ties.
#[must_use]
pub fn best_point(points: &[SweepPoint]) -> Option<&SweepPoint> {
    let mut best: Option<&SweepPoint> = None;
    for p in points {
        if best.map_or(true, |b| p.metrics.macro_f1() > b.metrics.macro_f1()) {
            best = Some(p);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learn::{Example, NoFeatureNormalizer};
    use crate::models::LinearModel;
    use crate::{FeaturePack, FeatureSchema};

    #[test]
    fn default_sweep_has_eleven_points() {
        let t = ThresholdSweep::default().thresholds().unwrap();
        assert_eq!(t.len(), 11);
        assert_eq!(t[0], 0.0);
        assert!((t[10] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn bad_step_rejected() {
        assert!(ThresholdSweep::new(0.0, 1.0, 0.0).thresholds().is_err());
        assert!(ThresholdSweep::new(1.0, 0.0, 0.1).thresholds().unwrap().is_empty());
    }

    #[test]
    fn oversized_sweep_rejected() {
        let err = ThresholdSweep::new(0.0, 1.0, 1e-300).thresholds().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(ThresholdSweep::new(-1e300, 1e300, 1.0).thresholds().is_err());
        let t = ThresholdSweep::new(0.0, 1.0, 1.0 / 1024.0).thresholds().unwrap();
        assert_eq!(t.len(), 1025);
    }

    #[test]
    fn sweep_finds_separating_threshold() {
        // score = the single feature
        let schema = FeatureSchema::numbered("t", 1);
        let pack = |v: f64| FeaturePack::from_dense(schema.clone(), &[v]).unwrap();
        let good = Annotation::new(0, 4, 1);
        let bad = Annotation::new(10, 3, 2);

        let mut g = AnnotationGatherer::new();
        g.add_examples_with(
            vec![Example::new(pack(0.75), 1.0), Example::new(pack(0.35), -1.0)],
            vec![good, bad],
            [good].into_iter().collect(),
        )
        .unwrap();

        let points = ThresholdSweep::default()
            .run(&g, &LinearModel::new(vec![1.0], 0.0), &NoFeatureNormalizer::new())
            .unwrap();
        assert_eq!(points.len(), 11);
        // 0.0..=0.3 keep both, 0.4..=0.7 keep only the good one, 0.8.. keep nothing
        assert!((points[0].metrics.macro_f1() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(points[5].metrics.macro_f1(), 1.0);
        assert_eq!(points[10].metrics.macro_f1(), 0.0);

        let best = best_point(&points).unwrap();
        assert!((best.threshold - 0.4).abs() < 1e-9);

        let conf = best.to_configuration(vec![1], 1.0, g.examples_count());
        assert_eq!((conf.tp, conf.fp, conf.fn_, conf.tn), (1, 0, 0, 1));
    }

    #[test]
    fn groups_need_gold() {
        let schema = FeatureSchema::numbered("t", 1);
        let mut g = AnnotationGatherer::new();
        g.add_group(
            crate::learn::Group::new(vec![Example::new(
                FeaturePack::from_dense(schema, &[0.5]).unwrap(),
                1.0,
            )])
            .with_data(vec![Annotation::new(0, 1, 1)]),
        )
        .unwrap();
        assert!(ThresholdSweep::default()
            .run(&g, &LinearModel::new(vec![1.0], 0.0), &NoFeatureNormalizer::new())
            .is_err());
    }
}
