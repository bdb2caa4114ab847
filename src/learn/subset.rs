//! Feature subsets: which 1-based feature indices a problem or export uses.

use crate::{Error, Result};
use std::fmt;

/// Selection of features, by 1-based index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FeatureSubset {
    /// Every feature, `1..=dimension`.
    #[default]
    All,
    /// The listed indices, in the listed order.
    Only(Vec<usize>),
}

impl FeatureSubset {
    /// Subset of the given indices.
    pub fn only(indices: impl IntoIterator<Item = usize>) -> Self {
        FeatureSubset::Only(indices.into_iter().collect())
    }

    /// Parse a list such as `"1-3,5,7-9"`.
    ///
    /// `"all"` and the empty string select every feature.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(FeatureSubset::All);
        }
        let mut indices = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('-') {
                Some((lo, hi)) => {
                    let lo = parse_index(lo)?;
                    let hi = parse_index(hi)?;
                    if hi < lo {
                        return Err(Error::parse(format!("descending feature range '{}'", part)));
                    }
                    indices.extend(lo..=hi);
                }
                None => indices.push(parse_index(part)?),
            }
        }
        Ok(FeatureSubset::Only(indices))
    }

    /// Concrete indices for a gatherer of the given dimension.
    ///
    /// Every index must lie in `1..=dimension`.
    pub fn indices(&self, dimension: usize) -> Result<Vec<usize>> {
        match self {
            FeatureSubset::All => Ok(all_features(dimension)),
            FeatureSubset::Only(indices) => {
                if let Some(&bad) = indices.iter().find(|&&i| i == 0 || i > dimension) {
                    return Err(Error::InvalidFeatureIndex {
                        index: bad,
                        dimension,
                    });
                }
                Ok(indices.clone())
            }
        }
    }

    /// True if the 1-based index is selected.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        match self {
            FeatureSubset::All => index > 0,
            FeatureSubset::Only(indices) => indices.contains(&index),
        }
    }
}

impl fmt::Display for FeatureSubset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureSubset::All => write!(f, "all"),
            FeatureSubset::Only(indices) => write!(f, "{}", feature_list_repr(indices)),
        }
    }
}

fn parse_index(s: &str) -> Result<usize> {
    s.trim()
        .parse::<usize>()
        .map_err(|e| Error::parse(format!("bad feature index '{}': {}", s.trim(), e)))
}

/// `[1, 2, ..., count]`.
#[must_use]
pub fn all_features(count: usize) -> Vec<usize> {
    (1..=count).collect()
}

/// Compact representation of a feature list, used in model file names.
///
/// Indices are sorted and runs of consecutive indices collapse into
/// `lo-hi`: `[5, 1, 2, 3, 7, 8]` becomes `"1-3,5,7-8"`. Duplicates are not
/// merged (`[1, 2, 2]` gives `"1-2,2"`) so that names match models trained
/// before.
#[must_use]
pub fn feature_list_repr(features: &[usize]) -> String {
    let mut sorted = features.to_vec();
    sorted.sort_unstable();

    let mut repr = String::new();
    let mut last = 0usize;
    let mut block = 1usize;
    for (i, &current) in sorted.iter().enumerate() {
        if i == 0 {
            repr.push_str(&current.to_string());
        } else if current == last + 1 {
            if i == sorted.len() - 1 {
                repr.push_str(&format!("-{}", current));
            }
            block += 1;
        } else {
            if block > 1 {
                repr.push_str(&format!("-{}", last));
            }
            repr.push_str(&format!(",{}", current));
            block = 1;
        }
        last = current;
    }
    repr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repr_collapses_runs() {
        assert_eq!(feature_list_repr(&[5, 1, 2, 3, 7, 8]), "1-3,5,7-8");
        assert_eq!(feature_list_repr(&[1, 3]), "1,3");
        assert_eq!(feature_list_repr(&[1, 2]), "1-2");
        assert_eq!(feature_list_repr(&[4]), "4");
        assert_eq!(feature_list_repr(&[]), "");
    }

    #[test]
    fn repr_keeps_duplicates() {
        assert_eq!(feature_list_repr(&[1, 2, 2]), "1-2,2");
    }

    #[test]
    fn parse_ranges() {
        assert_eq!(
            FeatureSubset::parse("1-3, 5,7-8").unwrap(),
            FeatureSubset::Only(vec![1, 2, 3, 5, 7, 8])
        );
        assert_eq!(FeatureSubset::parse("all").unwrap(), FeatureSubset::All);
        assert!(FeatureSubset::parse("3-1").is_err());
        assert!(FeatureSubset::parse("x").is_err());
    }

    #[test]
    fn parse_then_display() {
        let s = FeatureSubset::parse("1-3,5").unwrap();
        assert_eq!(s.to_string(), "1-3,5");
    }

    #[test]
    fn indices_are_validated() {
        assert_eq!(FeatureSubset::All.indices(3).unwrap(), vec![1, 2, 3]);
        assert_eq!(FeatureSubset::only([3, 1]).indices(3).unwrap(), vec![3, 1]);
        assert!(matches!(
            FeatureSubset::only([0]).indices(3),
            Err(Error::InvalidFeatureIndex { index: 0, .. })
        ));
        assert!(matches!(
            FeatureSubset::only([4]).indices(3),
            Err(Error::InvalidFeatureIndex { index: 4, dimension: 3 })
        ));
    }
}
