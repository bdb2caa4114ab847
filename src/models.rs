//! Inference-side models: score or filter a feature pack.
//!
//! Training happens in external programs (see [`crate::train`]); this module
//! only loads what they write and calls `predict`.
//!
//! | Trait | Answer | Used by |
//! |-------|--------|---------|
//! | [`Regressor`] | score | link-back candidate scoring |
//! | [`EntityFilter`] | keep / drop | entity filtering |
//! | [`BindingRegressor`] | one score per binding | binding ranking |

use crate::learn::FeatureNormalizer;
use crate::{Error, FeaturePack, Result};
use std::fs;
use std::path::Path;

/// Scores a feature pack.
pub trait Regressor: Send + Sync {
    /// Score of the candidate described by `features`; higher is better.
    fn predict_score(&self, features: &FeaturePack, normalizer: &dyn FeatureNormalizer) -> f64;
}

/// Decides whether a candidate entity is kept.
pub trait EntityFilter: Send + Sync {
    /// True if the entity should be kept.
    fn filter_entity(&self, features: &FeaturePack, normalizer: &dyn FeatureNormalizer) -> bool;
}

/// Scores a list of candidate bindings of one query.
pub trait BindingRegressor: Send + Sync {
    /// One score per binding, in input order.
    fn scores(&self, features: &[FeaturePack], normalizer: &dyn FeatureNormalizer) -> Vec<f64>;
}

impl<R: Regressor + ?Sized> BindingRegressor for R {
    fn scores(&self, features: &[FeaturePack], normalizer: &dyn FeatureNormalizer) -> Vec<f64> {
        features
            .iter()
            .map(|f| self.predict_score(f, normalizer))
            .collect()
    }
}

impl<R: Regressor + ?Sized> Regressor for Box<R> {
    fn predict_score(&self, features: &FeaturePack, normalizer: &dyn FeatureNormalizer) -> f64 {
        (**self).predict_score(features, normalizer)
    }
}

/// A linear model `w·x + b`.
///
/// Weight `i` applies to the 1-based feature `i + 1`. Models trained on a
/// feature subset carry zero weights for the features left out.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    solver: String,
    labels: Vec<i32>,
    weights: Vec<f64>,
    bias: f64,
    bias_weight: f64,
}

impl LinearModel {
    /// Model from raw weights.
    #[must_use]
    pub fn new(weights: Vec<f64>, bias_weight: f64) -> Self {
        Self {
            solver: "custom".to_string(),
            labels: Vec::new(),
            weights,
            bias: if bias_weight == 0.0 { -1.0 } else { 1.0 },
            bias_weight,
        }
    }

    /// Load a LIBLINEAR model file.
    pub fn load_liblinear(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let model = Self::from_liblinear_str(&text)
            .map_err(|e| Error::model(format!("{}: {}", path.display(), e)))?;
        log::debug!(
            "loaded {} model with {} features from {}",
            model.solver,
            model.weights.len(),
            path.display()
        );
        Ok(model)
    }

    /// Parse the text written by LIBLINEAR's `save_model`.
    ///
    /// ```text
    /// solver_type L2R_L2LOSS_SVC_DUAL
    /// nr_class 2
    /// label 1 -1
    /// nr_feature 3
    /// bias -1
    /// w
    /// 0.25
    /// -1.5
    /// 0
    /// ```
    ///
    /// Only models with a single weight column (binary classifiers and
    /// regressors) are supported.
    pub fn from_liblinear_str(text: &str) -> Result<Self> {
        let mut lines = text.lines();
        let mut solver = None;
        let mut nr_class = 2usize;
        let mut labels = Vec::new();
        let mut nr_feature = None;
        let mut bias = -1.0;

        for line in lines.by_ref() {
            let line = line.trim();
            if line == "w" {
                break;
            }
            let (key, value) = line.split_once(' ').unwrap_or((line, ""));
            match key {
                "solver_type" => solver = Some(value.trim().to_string()),
                "nr_class" => nr_class = parse_num(key, value)?,
                "label" => {
                    labels = value
                        .split_whitespace()
                        .map(|l| parse_num(key, l))
                        .collect::<Result<_>>()?
                }
                "nr_feature" => nr_feature = Some(parse_num::<usize>(key, value)?),
                "bias" => bias = parse_num(key, value)?,
                "" => {}
                other => return Err(Error::parse(format!("unknown model header '{}'", other))),
            }
        }

        let solver = solver.ok_or_else(|| Error::parse("missing solver_type"))?;
        let nr_feature = nr_feature.ok_or_else(|| Error::parse("missing nr_feature"))?;
        if nr_class > 2 || solver == "MCSVM_CS" {
            return Err(Error::model(format!(
                "{} model with {} classes has one weight column per class; only single-column models are supported",
                solver, nr_class
            )));
        }

        let mut weights = Vec::with_capacity(nr_feature + 1);
        for line in lines {
            let mut values = line.split_whitespace();
            match (values.next(), values.next()) {
                (Some(w), None) => weights.push(parse_num("w", w)?),
                (None, _) => {}
                (Some(_), Some(_)) => {
                    return Err(Error::parse("weight rows must hold exactly one column"));
                }
            }
        }

        let expected = nr_feature + usize::from(bias >= 0.0);
        if weights.len() != expected {
            return Err(Error::parse(format!(
                "expected {} weights, found {}",
                expected,
                weights.len()
            )));
        }
        let bias_weight = if bias >= 0.0 {
            weights.pop().unwrap_or(0.0) * bias
        } else {
            0.0
        };

        // LIBLINEAR's decision value favors the first label; keep +1 on top.
        if labels.len() == 2 && labels[0] < labels[1] {
            for w in &mut weights {
                *w = -*w;
            }
            return Ok(Self {
                solver,
                labels,
                weights,
                bias,
                bias_weight: -bias_weight,
            });
        }

        Ok(Self {
            solver,
            labels,
            weights,
            bias,
            bias_weight,
        })
    }

    /// Parse a RankLib linear ranker (Coordinate Ascent, Linear Regression).
    ///
    /// Comment lines start with `#`; the weights are the last line, as
    /// `index:weight` pairs.
    pub fn from_ranklib_str(text: &str) -> Result<Self> {
        let line = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .last()
            .ok_or_else(|| Error::parse("RankLib model has no weight line"))?;

        let mut weights = Vec::new();
        for pair in line.split_whitespace() {
            let (index, weight) = pair
                .split_once(':')
                .ok_or_else(|| Error::parse(format!("expected index:weight, got '{}'", pair)))?;
            let index: usize = parse_num("index", index)?;
            if index == 0 {
                return Err(Error::parse("RankLib feature indices start at 1"));
            }
            if weights.len() < index {
                weights.resize(index, 0.0);
            }
            weights[index - 1] = parse_num("weight", weight)?;
        }
        Ok(Self {
            solver: "ranklib-linear".to_string(),
            labels: Vec::new(),
            weights,
            bias: -1.0,
            bias_weight: 0.0,
        })
    }

    /// Load a RankLib linear ranker file.
    pub fn load_ranklib(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        Self::from_ranklib_str(&fs::read_to_string(path)?)
            .map_err(|e| Error::model(format!("{}: {}", path.display(), e)))
    }

    /// Solver that produced the model.
    #[must_use]
    pub fn solver(&self) -> &str {
        &self.solver
    }

    /// Class labels, if the model is a classifier.
    #[must_use]
    pub fn labels(&self) -> &[i32] {
        &self.labels
    }

    /// Feature weights; weight `i` applies to feature `i + 1`.
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Decision value for a dense normalized vector.
    #[must_use]
    pub fn decision_value(&self, x: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(x)
            .map(|(w, v)| w * v)
            .sum::<f64>()
            + self.bias_weight
    }
}

fn parse_num<N: std::str::FromStr>(key: &str, value: &str) -> Result<N>
where
    N::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::parse(format!("bad {} '{}': {}", key, value.trim(), e)))
}

impl Regressor for LinearModel {
    fn predict_score(&self, features: &FeaturePack, normalizer: &dyn FeatureNormalizer) -> f64 {
        if features.feature_count() < self.weights.len() {
            log::warn!(
                "scoring a pack with {} features against a model with {} weights",
                features.feature_count(),
                self.weights.len()
            );
        }
        self.decision_value(&normalizer.normalize(features))
    }
}

/// Keeps an entity when a regressor scores it at or above a threshold.
#[derive(Debug, Clone)]
pub struct ThresholdEntityFilter<R> {
    regressor: R,
    threshold: f64,
}

impl<R: Regressor> ThresholdEntityFilter<R> {
    /// Filter accepting scores `>= 0.0`.
    #[must_use]
    pub fn new(regressor: R) -> Self {
        Self::with_threshold(regressor, 0.0)
    }

    /// Filter accepting scores `>= threshold`.
    #[must_use]
    pub fn with_threshold(regressor: R, threshold: f64) -> Self {
        Self { regressor, threshold }
    }

    /// Acceptance threshold.
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl<R: Regressor> EntityFilter for ThresholdEntityFilter<R> {
    fn filter_entity(&self, features: &FeaturePack, normalizer: &dyn FeatureNormalizer) -> bool {
        self.regressor.predict_score(features, normalizer) >= self.threshold
    }
}

/// Keeps every entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEntityFilter;

impl EntityFilter for NoEntityFilter {
    fn filter_entity(&self, _features: &FeaturePack, _normalizer: &dyn FeatureNormalizer) -> bool {
        true
    }
}
