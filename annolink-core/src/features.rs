//! Named feature vectors.
//!
//! A [`FeatureSchema`] fixes the names and order of the features a family of
//! candidates is described by (entity features, annotation features, binding
//! features). A [`FeaturePack`] holds one value slot per schema feature; a
//! slot may be unset, and normalizers decide what an unset slot becomes.
//!
//! Feature *indices* are 1-based everywhere they leave this crate (LIBSVM
//! and RankLib files, feature subsets). Positions are 0-based and only used
//! to address the value slots.

use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Ordered, named feature list shared by every pack of one kind.
#[derive(Clone)]
pub struct FeatureSchema {
    name: String,
    features: Vec<String>,
    positions: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Create a schema. Duplicate feature names are rejected.
    pub fn new<I, S>(name: impl Into<String>, features: I) -> Result<Arc<Self>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let features: Vec<String> = features.into_iter().map(Into::into).collect();
        let mut positions = HashMap::with_capacity(features.len());
        for (pos, f) in features.iter().enumerate() {
            if positions.insert(f.clone(), pos).is_some() {
                return Err(Error::invalid_input(format!(
                    "duplicate feature '{}' in schema '{}'",
                    f, name
                )));
            }
        }
        Ok(Arc::new(Self {
            name,
            features,
            positions,
        }))
    }

    /// Schema with features named `f1..f{count}`.
    #[must_use]
    pub fn numbered(name: impl Into<String>, count: usize) -> Arc<Self> {
        let features: Vec<String> = (1..=count).map(|i| format!("f{}", i)).collect();
        let positions = features
            .iter()
            .enumerate()
            .map(|(p, f)| (f.clone(), p))
            .collect();
        Arc::new(Self {
            name: name.into(),
            features,
            positions,
        })
    }

    /// Schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of features.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True if the schema defines no feature.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature names in schema order.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.features
    }

    /// 0-based position of a feature.
    #[must_use]
    pub fn position(&self, feature: &str) -> Option<usize> {
        self.positions.get(feature).copied()
    }

    /// 1-based index of a feature, as written to training files.
    #[must_use]
    pub fn index_of(&self, feature: &str) -> Option<usize> {
        self.position(feature).map(|p| p + 1)
    }

    /// Name of the feature at a 1-based index.
    #[must_use]
    pub fn name_at(&self, index: usize) -> Option<&str> {
        index
            .checked_sub(1)
            .and_then(|p| self.features.get(p))
            .map(String::as_str)
    }

    fn require(&self, feature: &str) -> Result<usize> {
        self.position(feature)
            .ok_or_else(|| Error::unknown_feature(feature, &self.name))
    }
}

impl PartialEq for FeatureSchema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.features == other.features
    }
}

impl fmt::Debug for FeatureSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureSchema")
            .field("name", &self.name)
            .field("features", &self.features.len())
            .finish()
    }
}

/// Feature values of one candidate.
#[derive(Clone)]
pub struct FeaturePack {
    schema: Arc<FeatureSchema>,
    values: Vec<Option<f64>>,
}

impl FeaturePack {
    /// A pack with every feature unset.
    #[must_use]
    pub fn empty(schema: Arc<FeatureSchema>) -> Self {
        let values = vec![None; schema.len()];
        Self { schema, values }
    }

    /// Build from one optional value per schema feature.
    pub fn from_values(schema: Arc<FeatureSchema>, values: Vec<Option<f64>>) -> Result<Self> {
        if values.len() != schema.len() {
            return Err(Error::invalid_input(format!(
                "schema '{}' has {} features, got {} values",
                schema.name(),
                schema.len(),
                values.len()
            )));
        }
        Ok(Self { schema, values })
    }

    /// Build from a dense vector where every feature is set.
    pub fn from_dense(schema: Arc<FeatureSchema>, values: &[f64]) -> Result<Self> {
        Self::from_values(schema, values.iter().copied().map(Some).collect())
    }

    /// Build from `(name, value)` pairs; features not listed stay unset.
    pub fn from_named<'a, I>(schema: Arc<FeatureSchema>, named: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut pack = Self::empty(schema);
        for (name, value) in named {
            pack.set(name, value)?;
        }
        Ok(pack)
    }

    /// Set a feature by name.
    pub fn set(&mut self, feature: &str, value: f64) -> Result<()> {
        let pos = self.schema.require(feature)?;
        self.values[pos] = Some(value);
        Ok(())
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, feature: &str, value: f64) -> Result<Self> {
        self.set(feature, value)?;
        Ok(self)
    }

    /// Value of a feature, `None` if unset or not in the schema.
    #[must_use]
    pub fn get(&self, feature: &str) -> Option<f64> {
        self.schema.position(feature).and_then(|p| self.values[p])
    }

    /// True if the feature is in the schema and set.
    #[must_use]
    pub fn is_set(&self, feature: &str) -> bool {
        self.get(feature).is_some()
    }

    /// Value at a 0-based position.
    #[must_use]
    pub fn value_at(&self, position: usize) -> Option<f64> {
        self.values.get(position).copied().flatten()
    }

    /// All value slots in schema order.
    #[must_use]
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Number of features (set or not).
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.values.len()
    }

    /// Schema this pack follows.
    #[must_use]
    pub fn schema(&self) -> &Arc<FeatureSchema> {
        &self.schema
    }

    /// Set features as `(name, value)` pairs, in schema order.
    pub fn set_features(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.schema
            .feature_names()
            .iter()
            .zip(&self.values)
            .filter_map(|(n, v)| v.map(|v| (n.as_str(), v)))
    }
}

impl PartialEq for FeaturePack {
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.schema, &other.schema) || self.schema == other.schema)
            && self.values == other.values
    }
}

impl fmt::Debug for FeaturePack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.set_features()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Arc<FeatureSchema> {
        FeatureSchema::new("entity", ["rank", "freq", "ed"]).unwrap()
    }

    #[test]
    fn duplicate_names_rejected() {
        assert!(FeatureSchema::new("x", ["a", "b", "a"]).is_err());
    }

    #[test]
    fn indices_are_one_based() {
        let s = schema();
        assert_eq!(s.index_of("rank"), Some(1));
        assert_eq!(s.index_of("ed"), Some(3));
        assert_eq!(s.name_at(2), Some("freq"));
        assert_eq!(s.name_at(0), None);
        assert_eq!(s.name_at(4), None);
    }

    #[test]
    fn named_pack_leaves_others_unset() {
        let p = FeaturePack::from_named(schema(), [("freq", 0.4)]).unwrap();
        assert_eq!(p.feature_count(), 3);
        assert!(p.is_set("freq"));
        assert!(!p.is_set("rank"));
        assert_eq!(p.get("freq"), Some(0.4));
        assert_eq!(p.values(), &[None, Some(0.4), None]);
    }

    #[test]
    fn unknown_feature_is_an_error() {
        let err = FeaturePack::empty(schema()).with("nope", 1.0).unwrap_err();
        assert!(matches!(err, Error::UnknownFeature { .. }));
    }

    #[test]
    fn wrong_length_rejected() {
        assert!(FeaturePack::from_dense(schema(), &[1.0, 2.0]).is_err());
    }

    #[test]
    fn equality_across_equal_schemas() {
        let a = FeaturePack::from_dense(schema(), &[1.0, 2.0, 3.0]).unwrap();
        let b = FeaturePack::from_dense(schema(), &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(a, b);
        let numbered = FeaturePack::from_dense(FeatureSchema::numbered("entity", 3), &[1.0, 2.0, 3.0])
            .unwrap();
        assert_ne!(a, numbered);
    }
}
