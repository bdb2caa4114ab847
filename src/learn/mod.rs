//! Training-data warehousing: grouped examples, normalizers, problems and exports.
//!
//! # Example
//!
//! ```rust
//! use annolink::learn::{Example, ExampleGatherer, FeatureSubset, NoFeatureNormalizer};
//! use annolink::{FeaturePack, FeatureSchema};
//!
//! let schema = FeatureSchema::numbered("demo", 2);
//! let mut gatherer: ExampleGatherer<(), ()> = ExampleGatherer::new();
//! gatherer.add_examples(vec![
//!     Example::new(FeaturePack::from_dense(schema.clone(), &[0.2, 0.5])?, 1.0),
//!     Example::new(FeaturePack::from_dense(schema, &[0.9, 0.1])?, -1.0),
//! ])?;
//!
//! let problem = gatherer.generate_problem(&FeatureSubset::All, &NoFeatureNormalizer::new())?;
//! assert_eq!(problem.len(), 2);
//! # Ok::<(), annolink::Error>(())
//! ```

mod decimal;
mod gatherer;
mod normalize;
mod problem;
mod subset;

pub(crate) use decimal::Fixed;
pub use gatherer::{Example, ExampleGatherer, Group, GroupCandidates};
pub use normalize::{FeatureNormalizer, FeatureStats, NoFeatureNormalizer, ZScoreFeatureNormalizer};
pub use problem::{FeatureNode, Problem};
pub use subset::{all_features, feature_list_repr, FeatureSubset};

use crate::{Annotation, Binding, EntityId};
use std::collections::HashSet;

/// Entity-filter training data: one candidate entity per example.
pub type EntityGatherer = ExampleGatherer<EntityId, HashSet<EntityId>>;

/// Annotation regressor training data: one candidate span per example.
pub type AnnotationGatherer = ExampleGatherer<Annotation, HashSet<Annotation>>;

/// Binding regressor training data: one candidate binding per example.
pub type BindingGatherer = ExampleGatherer<Binding, HashSet<Annotation>>;
