//! Feature normalizers: feature pack → dense numeric vector.
//!
//! | Normalizer | Set feature | Unset feature |
//! |------------|-------------|---------------|
//! | [`NoFeatureNormalizer`] | raw value | default value |
//! | [`ZScoreFeatureNormalizer`] | `(v - mean) / std`, `0` if `std == 0` | default value |
//!
//! Z-score statistics are fitted on training examples and dumped next to
//! the trained model, so inference normalizes exactly as training did.

use crate::learn::ExampleGatherer;
use crate::{Error, FeaturePack, FeatureSchema, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Maps a feature pack to a dense vector, one value per schema feature.
pub trait FeatureNormalizer: Send + Sync {
    /// Value used for unset features.
    fn default_value(&self) -> f64;

    /// Normalized value of the feature at a 0-based position.
    fn normalize_feature(&self, pack: &FeaturePack, position: usize) -> f64;

    /// Normalize every feature of the pack.
    fn normalize(&self, pack: &FeaturePack) -> Vec<f64> {
        (0..pack.feature_count())
            .map(|p| self.normalize_feature(pack, p))
            .collect()
    }
}

/// Identity normalizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoFeatureNormalizer {
    default_value: f64,
}

impl NoFeatureNormalizer {
    /// Unset features become 0.0.
    #[must_use]
    pub fn new() -> Self {
        Self { default_value: 0.0 }
    }

    /// Unset features become `default_value`.
    #[must_use]
    pub fn with_default(default_value: f64) -> Self {
        Self { default_value }
    }
}

impl Default for NoFeatureNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureNormalizer for NoFeatureNormalizer {
    fn default_value(&self) -> f64 {
        self.default_value
    }

    fn normalize_feature(&self, pack: &FeaturePack, position: usize) -> f64 {
        pack.value_at(position).unwrap_or(self.default_value)
    }
}

/// Mean and standard deviation of one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    /// Feature name
    pub name: String,
    /// Mean over the packs where the feature is set
    pub mean: f64,
    /// Population standard deviation over the same packs
    pub std_dev: f64,
    /// Number of packs where the feature is set
    pub count: usize,
}

/// Z-score normalizer fitted on training feature packs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZScoreFeatureNormalizer {
    schema: String,
    features: Vec<FeatureStats>,
    default_value: f64,
}

impl ZScoreFeatureNormalizer {
    /// Fit on every feature pack of a gatherer.
    pub fn from_gatherer<T, G>(gatherer: &ExampleGatherer<T, G>, default_value: f64) -> Result<Self> {
        Self::fit(gatherer.all_feature_packs(), default_value)
    }

    /// Fit on the given packs. All packs must share one dimension.
    pub fn fit<'a, I>(packs: I, default_value: f64) -> Result<Self>
    where
        I: IntoIterator<Item = &'a FeaturePack>,
    {
        let packs: Vec<&FeaturePack> = packs.into_iter().collect();
        let first = packs.first().ok_or(Error::UnknownFeatureDimension)?;
        let schema = first.schema().clone();
        let dim = schema.len();

        let mut sums = vec![0.0f64; dim];
        let mut counts = vec![0usize; dim];
        for pack in &packs {
            if pack.feature_count() != dim {
                return Err(Error::DimensionMismatch {
                    expected: dim,
                    actual: pack.feature_count(),
                });
            }
            for (pos, v) in pack.values().iter().enumerate() {
                if let Some(v) = v {
                    sums[pos] += v;
                    counts[pos] += 1;
                }
            }
        }
        let means: Vec<f64> = sums
            .iter()
            .zip(&counts)
            .map(|(s, &c)| if c == 0 { 0.0 } else { s / c as f64 })
            .collect();

        let mut squares = vec![0.0f64; dim];
        for pack in &packs {
            for (pos, v) in pack.values().iter().enumerate() {
                if let Some(v) = v {
                    squares[pos] += (v - means[pos]).powi(2);
                }
            }
        }

        let features = schema
            .feature_names()
            .iter()
            .enumerate()
            .map(|(pos, name)| FeatureStats {
                name: name.clone(),
                mean: means[pos],
                std_dev: if counts[pos] == 0 {
                    0.0
                } else {
                    (squares[pos] / counts[pos] as f64).sqrt()
                },
                count: counts[pos],
            })
            .collect();

        log::debug!(
            "fitted z-score normalizer on {} packs of schema '{}'",
            packs.len(),
            schema.name()
        );
        Ok(Self {
            schema: schema.name().to_string(),
            features,
            default_value,
        })
    }

    /// Per-feature statistics, in schema order.
    #[must_use]
    pub fn stats(&self) -> &[FeatureStats] {
        &self.features
    }

    /// Name of the schema the normalizer was fitted on.
    #[must_use]
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// Write the statistics as JSON.
    pub fn dump(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("dumped z-score normalizer to {}", path.display());
        Ok(())
    }

    /// Read statistics written by [`dump`](Self::dump).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Read statistics and check they match `schema` feature by feature.
    pub fn load_for(path: impl AsRef<Path>, schema: &FeatureSchema) -> Result<Self> {
        let norm = Self::load(path)?;
        norm.check_schema(schema)?;
        Ok(norm)
    }

    /// Check that the fitted features are exactly the schema's features.
    pub fn check_schema(&self, schema: &FeatureSchema) -> Result<()> {
        if self.features.len() != schema.len() {
            return Err(Error::DimensionMismatch {
                expected: schema.len(),
                actual: self.features.len(),
            });
        }
        for (stats, name) in self.features.iter().zip(schema.feature_names()) {
            if &stats.name != name {
                log::warn!(
                    "normalizer feature '{}' does not match schema feature '{}'",
                    stats.name,
                    name
                );
                return Err(Error::invalid_input(format!(
                    "normalizer fitted on feature '{}' where schema '{}' has '{}'",
                    stats.name,
                    schema.name(),
                    name
                )));
            }
        }
        Ok(())
    }
}

impl FeatureNormalizer for ZScoreFeatureNormalizer {
    fn default_value(&self) -> f64 {
        self.default_value
    }

    fn normalize_feature(&self, pack: &FeaturePack, position: usize) -> f64 {
        let Some(value) = pack.value_at(position) else {
            return self.default_value;
        };
        match self.features.get(position) {
            Some(stats) if stats.std_dev != 0.0 => (value - stats.mean) / stats.std_dev,
            _ => 0.0,
        }
    }
}
