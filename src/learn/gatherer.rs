//! Grouped example warehouse and training-data export.
//!
//! An [`ExampleGatherer`] collects the labeled feature packs produced while
//! processing a dataset, one [`Group`] per processed instance (query). The
//! groups are append-only and keep their insertion order: a group's index is
//! the `#id=` written to pointwise files, the `qid:` written to ranking files,
//! and the key that pairs it with its gold standard.
//!
//! ```text
//!            group 0 (query "armstrong moon")      group 1 (query "...")
//!          ┌───────────────────────────────────┐ ┌──────────────────────┐
//! examples │ (pack₀, +1.0) (pack₁, -1.0) ...   │ │ (pack₀, 0.66) ...    │
//! data     │  Armstrong     Louis_Armstrong    │ │  binding₀ ...        │
//! gold     │ {Armstrong, Moon}                 │ │ {...}                │
//!          └───────────────────────────────────┘ └──────────────────────┘
//! ```
//!
//! The feature dimension is fixed by the first non-empty group (or up front
//! with [`ExampleGatherer::with_dimension`]) and every later pack is checked
//! against it.
//!
//! # Export formats
//!
//! Pointwise (LIBSVM), one line per example, group-major:
//!
//! ```text
//! 1.00000 1:0.200000000 2:0.500000000  #id=0
//! ```
//!
//! Ranking (RankLib), one line per example, each group sorted by descending
//! target, rank starting at 1 and growing when the target changes:
//!
//! ```text
//! 1 qid:0 1:0.200000000 2:0.500000000
//! ```

use crate::learn::decimal::Fixed;
use crate::learn::normalize::FeatureNormalizer;
use crate::learn::problem::{to_nodes, FeatureNode, Problem};
use crate::learn::subset::FeatureSubset;
use crate::order::{sort_descending, TieOrder};
use crate::{Error, FeaturePack, Result};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// A feature pack and its training target.
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    /// Features of the candidate
    pub features: FeaturePack,
    /// Target: a class label (+1/-1) or a relevance value
    pub target: f64,
}

impl Example {
    /// Create an example.
    #[must_use]
    pub fn new(features: FeaturePack, target: f64) -> Self {
        Self { features, target }
    }

    /// Binary example: `+1.0` if the candidate is in the gold standard, `-1.0` otherwise.
    #[must_use]
    pub fn from_presence(features: FeaturePack, present: bool) -> Self {
        Self::new(features, if present { 1.0 } else { -1.0 })
    }
}

/// The examples of one instance, with optional per-example data and gold.
#[derive(Debug, Clone)]
pub struct Group<T, G> {
    examples: Vec<Example>,
    data: Option<Vec<T>>,
    gold: Option<G>,
}

impl<T, G> Group<T, G> {
    /// Group without candidate data or gold.
    #[must_use]
    pub fn new(examples: Vec<Example>) -> Self {
        Self {
            examples,
            data: None,
            gold: None,
        }
    }

    /// Attach the candidate each example was derived from.
    #[must_use]
    pub fn with_data(mut self, data: Vec<T>) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach the instance's gold standard.
    #[must_use]
    pub fn with_gold(mut self, gold: G) -> Self {
        self.gold = Some(gold);
        self
    }

    /// Examples in insertion order.
    #[must_use]
    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// Candidate data, one item per example.
    #[must_use]
    pub fn data(&self) -> Option<&[T]> {
        self.data.as_deref()
    }

    /// Gold standard of the instance.
    #[must_use]
    pub fn gold(&self) -> Option<&G> {
        self.gold.as_ref()
    }

    /// Number of examples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    /// True if the group has no example.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}

/// Per-group candidates paired back with their original data and the group gold.
#[derive(Debug, Clone)]
pub struct GroupCandidates<'a, X, T, G> {
    /// Index of the group in insertion order
    pub group: usize,
    /// `(features, candidate)` pairs in example order
    pub candidates: Vec<(X, &'a T)>,
    /// Gold standard of the group
    pub gold: Option<&'a G>,
}

/// Accumulates grouped examples and exports them for external trainers.
///
/// `T` is the candidate type each example was derived from (an entity, an
/// annotation, a binding) and `G` the per-instance gold standard.
#[derive(Debug, Clone)]
pub struct ExampleGatherer<T, G> {
    groups: Vec<Group<T, G>>,
    dimension: Option<usize>,
}

impl<T, G> Default for ExampleGatherer<T, G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, G> ExampleGatherer<T, G> {
    /// Empty gatherer; the dimension is taken from the first non-empty group.
    #[must_use]
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            dimension: None,
        }
    }

    /// Empty gatherer accepting only packs with `dimension` features.
    #[must_use]
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            groups: Vec::new(),
            dimension: Some(dimension),
        }
    }

    /// Append a group of examples without candidate data or gold.
    pub fn add_examples(&mut self, examples: Vec<Example>) -> Result<()> {
        self.add_group(Group::new(examples))
    }

    /// Append a group with its candidate data and gold standard.
    ///
    /// `data` must hold exactly one item per example.
    pub fn add_examples_with(&mut self, examples: Vec<Example>, data: Vec<T>, gold: G) -> Result<()> {
        self.add_group(Group::new(examples).with_data(data).with_gold(gold))
    }

    /// Append a group.
    ///
    /// The group is checked before anything is recorded: on error the
    /// gatherer is unchanged.
    pub fn add_group(&mut self, group: Group<T, G>) -> Result<()> {
        if let Some(data) = &group.data {
            if data.len() != group.examples.len() {
                return Err(Error::ShapeMismatch {
                    examples: group.examples.len(),
                    data: data.len(),
                });
            }
        }

        let mut dimension = self.dimension;
        for example in &group.examples {
            let actual = example.features.feature_count();
            match dimension {
                Some(expected) if expected != actual => {
                    return Err(Error::DimensionMismatch { expected, actual });
                }
                Some(_) => {}
                None => dimension = Some(actual),
            }
        }

        log::debug!(
            "group {}: {} examples{}",
            self.groups.len(),
            group.examples.len(),
            if group.data.is_some() { " with data" } else { "" }
        );
        self.dimension = dimension;
        self.groups.push(group);
        Ok(())
    }

    /// Total number of examples over all groups.
    #[must_use]
    pub fn examples_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    /// Number of groups.
    #[must_use]
    pub fn groups_count(&self) -> usize {
        self.groups.len()
    }

    /// True if no group was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups in insertion order.
    #[must_use]
    pub fn groups(&self) -> &[Group<T, G>] {
        &self.groups
    }

    /// Every feature pack, group-major then example order.
    #[must_use]
    pub fn all_feature_packs(&self) -> Vec<&FeaturePack> {
        self.examples().map(|(_, e)| &e.features).collect()
    }

    /// Number of features per pack, `None` until a pack has been seen.
    #[must_use]
    pub fn feature_count(&self) -> Option<usize> {
        self.dimension
    }

    /// Gold standard of every group, in group order.
    #[must_use]
    pub fn golds(&self) -> Vec<Option<&G>> {
        self.groups.iter().map(Group::gold).collect()
    }

    /// `(group index, example)` for every example.
    fn examples(&self) -> impl Iterator<Item = (usize, &Example)> {
        self.groups
            .iter()
            .enumerate()
            .flat_map(|(i, g)| g.examples.iter().map(move |e| (i, e)))
    }

    fn known_dimension(&self) -> Result<usize> {
        self.dimension.ok_or(Error::UnknownFeatureDimension)
    }

    /// Indices picked by `subset`; an empty gatherer picks nothing.
    fn picked(&self, subset: &FeatureSubset) -> Result<Vec<usize>> {
        match self.dimension {
            Some(dim) => subset.indices(dim),
            None => Ok(Vec::new()),
        }
    }

    /// One pointwise problem with every example of every group.
    pub fn generate_problem(
        &self,
        subset: &FeatureSubset,
        normalizer: &dyn FeatureNormalizer,
    ) -> Result<Problem> {
        let picked = self.picked(subset)?;
        let mut problem = Problem::new();
        for (_, example) in self.examples() {
            problem.push(
                to_nodes(&normalizer.normalize(&example.features), &picked),
                example.target,
            );
        }
        Ok(problem)
    }

    /// One pointwise problem per group, in group order.
    pub fn generate_problems_per_group(
        &self,
        subset: &FeatureSubset,
        normalizer: &dyn FeatureNormalizer,
    ) -> Result<Vec<Problem>> {
        let picked = self.picked(subset)?;
        Ok(self
            .groups
            .iter()
            .map(|group| {
                let mut problem = Problem::new();
                for example in &group.examples {
                    problem.push(
                        to_nodes(&normalizer.normalize(&example.features), &picked),
                        example.target,
                    );
                }
                problem
            })
            .collect())
    }

    fn group_data(&self, index: usize) -> Result<&[T]> {
        self.groups[index].data().ok_or_else(|| {
            Error::invalid_input(format!("group {} was added without candidate data", index))
        })
    }

    /// Normalized feature rows paired with their candidate, per group.
    ///
    /// Every group must carry candidate data.
    pub fn scored_candidates_per_group(
        &self,
        subset: &FeatureSubset,
        normalizer: &dyn FeatureNormalizer,
    ) -> Result<Vec<GroupCandidates<'_, Vec<FeatureNode>, T, G>>> {
        let picked = self.picked(subset)?;
        (0..self.groups.len())
            .map(|i| {
                let group = &self.groups[i];
                let data = self.group_data(i)?;
                let candidates = group
                    .examples
                    .iter()
                    .zip(data)
                    .map(|(e, d)| (to_nodes(&normalizer.normalize(&e.features), &picked), d))
                    .collect();
                Ok(GroupCandidates {
                    group: i,
                    candidates,
                    gold: group.gold(),
                })
            })
            .collect()
    }

    /// Raw feature packs paired with their candidate, per group.
    ///
    /// Every group must carry candidate data.
    pub fn feature_packs_per_group(&self) -> Result<Vec<GroupCandidates<'_, &FeaturePack, T, G>>> {
        (0..self.groups.len())
            .map(|i| {
                let group = &self.groups[i];
                let data = self.group_data(i)?;
                let candidates = group
                    .examples
                    .iter()
                    .zip(data)
                    .map(|(e, d)| (&e.features, d))
                    .collect();
                Ok(GroupCandidates {
                    group: i,
                    candidates,
                    gold: group.gold(),
                })
            })
            .collect()
    }

    /// Write every example as a LIBSVM line to `path`.
    ///
    /// With a subset, only the selected features are written. Fails before
    /// creating the file if no example was ever added.
    pub fn export_pointwise(
        &self,
        path: impl AsRef<Path>,
        normalizer: &dyn FeatureNormalizer,
        subset: Option<&FeatureSubset>,
    ) -> Result<()> {
        let path = path.as_ref();
        self.check_export(subset)?;
        let mut out = BufWriter::new(File::create(path)?);
        self.write_pointwise(&mut out, normalizer, subset)?;
        out.flush()?;
        log::info!(
            "exported {} examples in {} groups to {} (pointwise)",
            self.examples_count(),
            self.groups.len(),
            path.display()
        );
        Ok(())
    }

    /// Write every example as a LIBSVM line to `out`.
    pub fn write_pointwise<W: Write>(
        &self,
        out: &mut W,
        normalizer: &dyn FeatureNormalizer,
        subset: Option<&FeatureSubset>,
    ) -> Result<()> {
        self.check_export(subset)?;
        for (group, example) in self.examples() {
            let values = normalizer.normalize(&example.features);
            let mut line = format!("{} ", Fixed(example.target, 5));
            for (pos, value) in values.iter().enumerate() {
                if subset.map_or(true, |s| s.contains(pos + 1)) {
                    let _ = write!(line, "{}:{} ", pos + 1, Fixed(*value, 9));
                }
            }
            let _ = write!(line, " #id={}", group);
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }

    /// Write every group as RankLib lines to `path`.
    ///
    /// Equal targets are ordered later-first; see [`TieOrder`].
    pub fn export_ranking(&self, path: impl AsRef<Path>, normalizer: &dyn FeatureNormalizer) -> Result<()> {
        self.export_ranking_with(path, normalizer, TieOrder::default())
    }

    /// [`export_ranking`](Self::export_ranking) with an explicit tie order.
    pub fn export_ranking_with(
        &self,
        path: impl AsRef<Path>,
        normalizer: &dyn FeatureNormalizer,
        tie_order: TieOrder,
    ) -> Result<()> {
        let path = path.as_ref();
        self.check_export(None)?;
        let mut out = BufWriter::new(File::create(path)?);
        self.write_ranking(&mut out, normalizer, tie_order)?;
        out.flush()?;
        log::info!(
            "exported {} examples in {} groups to {} (ranking)",
            self.examples_count(),
            self.groups.len(),
            path.display()
        );
        Ok(())
    }

    /// Write every group as RankLib lines to `out`.
    pub fn write_ranking<W: Write>(
        &self,
        out: &mut W,
        normalizer: &dyn FeatureNormalizer,
        tie_order: TieOrder,
    ) -> Result<()> {
        self.check_export(None)?;
        for (group_id, group) in self.groups.iter().enumerate() {
            let mut sorted: Vec<&Example> = group.examples.iter().collect();
            sort_descending(&mut sorted, tie_order, |e| e.target);

            let mut rank = 0usize;
            let mut last = f64::NAN;
            for example in sorted {
                // NaN != NaN: the first example always opens rank 1
                if example.target != last {
                    last = example.target;
                    rank += 1;
                }
                let mut line = format!("{} qid:{} ", rank, group_id);
                for (pos, value) in normalizer.normalize(&example.features).iter().enumerate() {
                    let _ = write!(line, "{}:{} ", pos + 1, Fixed(*value, 9));
                }
                writeln!(out, "{}", line)?;
            }
        }
        Ok(())
    }

    fn check_export(&self, subset: Option<&FeatureSubset>) -> Result<()> {
        let dim = self.known_dimension()?;
        if let Some(subset) = subset {
            subset.indices(dim)?;
        }
        Ok(())
    }
}

#[cfg(feature = "parallel")]
impl<T: Send, G: Send> ExampleGatherer<T, G> {
    /// Build one group per instance in parallel and append them in input order.
    ///
    /// Group indices follow the position of the instance in `instances`,
    /// never completion order. On error nothing is appended.
    pub fn gather_parallel<I, F>(&mut self, instances: &[I], build: F) -> Result<()>
    where
        I: Sync,
        F: Fn(usize, &I) -> Result<Group<T, G>> + Sync + Send,
    {
        use rayon::prelude::*;

        let groups: Vec<Group<T, G>> = instances
            .par_iter()
            .enumerate()
            .map(|(i, instance)| build(i, instance))
            .collect::<Result<Vec<_>>>()?;

        let mut staged = self.clone_shape();
        for group in groups {
            staged.add_group(group)?;
        }
        self.dimension = staged.dimension;
        self.groups.append(&mut staged.groups);
        Ok(())
    }

    /// Empty gatherer with the same dimension constraint.
    fn clone_shape(&self) -> Self {
        Self {
            groups: Vec::new(),
            dimension: self.dimension,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learn::normalize::NoFeatureNormalizer;
    use crate::FeatureSchema;
    use std::sync::Arc;

    fn schema() -> Arc<FeatureSchema> {
        FeatureSchema::numbered("test", 2)
    }

    fn example(a: f64, b: f64, target: f64) -> Example {
        Example::new(FeaturePack::from_dense(schema(), &[a, b]).unwrap(), target)
    }

    #[test]
    fn presence_targets() {
        let p = FeaturePack::empty(schema());
        assert_eq!(Example::from_presence(p.clone(), true).target, 1.0);
        assert_eq!(Example::from_presence(p, false).target, -1.0);
    }

    #[test]
    fn dimension_latched_from_first_non_empty_group() {
        let mut g: ExampleGatherer<(), ()> = ExampleGatherer::new();
        assert_eq!(g.feature_count(), None);
        g.add_examples(vec![]).unwrap();
        assert_eq!(g.feature_count(), None);
        g.add_examples(vec![example(0.1, 0.2, 1.0)]).unwrap();
        assert_eq!(g.feature_count(), Some(2));
    }

    #[test]
    fn dimension_mismatch_leaves_state_unchanged() {
        let mut g: ExampleGatherer<(), ()> = ExampleGatherer::new();
        g.add_examples(vec![example(0.1, 0.2, 1.0)]).unwrap();
        let three = FeaturePack::from_dense(FeatureSchema::numbered("x", 3), &[1.0, 2.0, 3.0]).unwrap();
        let err = g
            .add_examples(vec![example(0.3, 0.4, 1.0), Example::new(three, 1.0)])
            .unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 2, actual: 3 }));
        assert_eq!(g.groups_count(), 1);
        assert_eq!(g.examples_count(), 1);
    }

    #[test]
    fn mixed_dimensions_inside_first_group_rejected() {
        let mut g: ExampleGatherer<(), ()> = ExampleGatherer::new();
        let three = FeaturePack::from_dense(FeatureSchema::numbered("x", 3), &[1.0, 2.0, 3.0]).unwrap();
        assert!(g
            .add_examples(vec![example(0.1, 0.2, 1.0), Example::new(three, 1.0)])
            .is_err());
        assert_eq!(g.feature_count(), None);
        assert!(g.is_empty());
    }

    #[test]
    fn fixed_dimension() {
        let mut g: ExampleGatherer<(), ()> = ExampleGatherer::with_dimension(3);
        assert!(matches!(
            g.add_examples(vec![example(0.1, 0.2, 1.0)]),
            Err(Error::DimensionMismatch { expected: 3, actual: 2 })
        ));
    }

    #[test]
    fn shape_mismatch_is_atomic() {
        let mut g: ExampleGatherer<&str, &str> = ExampleGatherer::new();
        let err = g
            .add_examples_with(vec![example(0.1, 0.2, 1.0)], vec!["a", "b"], "gold")
            .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { examples: 1, data: 2 }));
        assert!(g.is_empty());
        assert_eq!(g.feature_count(), None);
    }

    #[test]
    fn golds_follow_group_order() {
        let mut g: ExampleGatherer<&str, &str> = ExampleGatherer::new();
        g.add_examples_with(vec![example(0.1, 0.2, 1.0)], vec!["a"], "g0").unwrap();
        g.add_examples(vec![]).unwrap();
        g.add_examples_with(vec![], vec![], "g2").unwrap();
        assert_eq!(g.golds(), vec![Some(&"g0"), None, Some(&"g2")]);
    }

    #[test]
    fn problem_per_group_keeps_boundaries() {
        let mut g: ExampleGatherer<(), ()> = ExampleGatherer::new();
        g.add_examples(vec![example(0.1, 0.2, 1.0), example(0.3, 0.4, -1.0)]).unwrap();
        g.add_examples(vec![example(0.5, 0.6, 1.0)]).unwrap();
        let norm = NoFeatureNormalizer::new();

        let all = g.generate_problem(&FeatureSubset::All, &norm).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all.targets(), &[1.0, -1.0, 1.0]);

        let per = g
            .generate_problems_per_group(&FeatureSubset::only([2]), &norm)
            .unwrap();
        assert_eq!(per.len(), 2);
        assert_eq!(per[0].len(), 2);
        assert_eq!(per[1].rows()[0], vec![FeatureNode { index: 2, value: 0.6 }]);
    }

    #[test]
    fn empty_gatherer_gives_empty_problem() {
        let g: ExampleGatherer<(), ()> = ExampleGatherer::new();
        let p = g
            .generate_problem(&FeatureSubset::All, &NoFeatureNormalizer::new())
            .unwrap();
        assert!(p.is_empty());
    }

    #[test]
    fn candidates_need_group_data() {
        let mut g: ExampleGatherer<&str, &str> = ExampleGatherer::new();
        g.add_examples_with(vec![example(0.1, 0.2, 1.0)], vec!["a"], "g0").unwrap();
        let c = g.feature_packs_per_group().unwrap();
        assert_eq!(c.len(), 1);
        assert_eq!(*c[0].candidates[0].1, "a");
        assert_eq!(c[0].gold, Some(&"g0"));

        g.add_examples(vec![example(0.3, 0.4, 1.0)]).unwrap();
        assert!(g.feature_packs_per_group().is_err());
        assert!(g
            .scored_candidates_per_group(&FeatureSubset::All, &NoFeatureNormalizer::new())
            .is_err());
    }

    #[test]
    fn pointwise_line_format() {
        let mut g: ExampleGatherer<(), ()> = ExampleGatherer::new();
        g.add_examples(vec![example(0.2, 0.5, 1.0)]).unwrap();
        let mut out = Vec::new();
        g.write_pointwise(&mut out, &NoFeatureNormalizer::new(), None).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1.00000 1:0.200000000 2:0.500000000  #id=0\n"
        );
    }

    #[test]
    fn pointwise_subset_filters_features() {
        let mut g: ExampleGatherer<(), ()> = ExampleGatherer::new();
        g.add_examples(vec![example(0.2, 0.5, -1.0)]).unwrap();
        let mut out = Vec::new();
        g.write_pointwise(&mut out, &NoFeatureNormalizer::new(), Some(&FeatureSubset::only([2])))
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "-1.00000 2:0.500000000  #id=0\n");
    }

    #[test]
    fn ranking_ranks_and_qids() {
        let mut g: ExampleGatherer<(), ()> = ExampleGatherer::new();
        g.add_examples(vec![example(0.1, 0.1, 0.5), example(0.2, 0.2, 0.9)]).unwrap();
        g.add_examples(vec![example(0.3, 0.3, 1.0)]).unwrap();
        let mut out = Vec::new();
        g.write_ranking(&mut out, &NoFeatureNormalizer::new(), TieOrder::default())
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "1 qid:0 1:0.200000000 2:0.200000000 ",
                "2 qid:0 1:0.100000000 2:0.100000000 ",
                "1 qid:1 1:0.300000000 2:0.300000000 ",
            ]
        );
    }

    #[test]
    fn export_needs_dimension() {
        let g: ExampleGatherer<(), ()> = ExampleGatherer::new();
        let mut out = Vec::new();
        assert!(matches!(
            g.write_pointwise(&mut out, &NoFeatureNormalizer::new(), None),
            Err(Error::UnknownFeatureDimension)
        ));
        assert!(out.is_empty());
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn parallel_gathering_keeps_instance_order() {
        let instances: Vec<usize> = (0..64).collect();
        let mut g: ExampleGatherer<usize, usize> = ExampleGatherer::new();
        g.gather_parallel(&instances, |i, &inst| {
            Ok(Group::new(vec![example(inst as f64, 0.0, 1.0)])
                .with_data(vec![inst])
                .with_gold(i))
        })
        .unwrap();
        let golds: Vec<usize> = g.golds().into_iter().map(|x| *x.unwrap()).collect();
        assert_eq!(golds, instances);
    }
}
