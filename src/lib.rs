//! # annolink
//!
//! Training-data warehousing and greedy link-back for query entity annotation.
//!
//! - **Gathering**: grouped, labeled feature packs, one group per query
//! - **Export**: LIBSVM (pointwise) and RankLib (ranking) files for external trainers
//! - **Link-back**: scored candidate spans → disjoint final annotations
//! - **Evaluation**: micro/macro P/R/F1 and link-back threshold sweeps
//!
//! ## Quick Start
//!
//! ```rust
//! use annolink::learn::{Example, ExampleGatherer, NoFeatureNormalizer};
//! use annolink::{FeaturePack, FeatureSchema};
//!
//! let schema = FeatureSchema::numbered("demo", 2);
//! let mut gatherer: ExampleGatherer<(), ()> = ExampleGatherer::new();
//! gatherer.add_examples(vec![
//!     Example::new(FeaturePack::from_dense(schema.clone(), &[0.2, 0.5])?, 1.0),
//!     Example::new(FeaturePack::from_dense(schema, &[0.9, 0.1])?, -1.0),
//! ])?;
//!
//! let mut out = Vec::new();
//! gatherer.write_pointwise(&mut out, &NoFeatureNormalizer::new(), None)?;
//! assert_eq!(
//!     String::from_utf8_lossy(&out),
//!     "1.00000 1:0.200000000 2:0.500000000  #id=0\n\
//!      -1.00000 1:0.900000000 2:0.100000000  #id=0\n"
//! );
//! # Ok::<(), annolink::Error>(())
//! ```
//!
//! ## Link-back
//!
//! ```rust
//! use annolink::linkback::resolve;
//! use annolink::Annotation;
//!
//! let accepted = resolve(
//!     vec![
//!         (Annotation::new(0, 5, 1), 0.9),
//!         (Annotation::new(2, 4, 2), 0.8),
//!         (Annotation::new(10, 3, 3), 0.95),
//!     ],
//!     0.5,
//! );
//! assert_eq!(accepted.len(), 2);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Adds |
//! |---------|------|
//! | `cli` (default) | the `annolink` binary |
//! | `parallel` | `ExampleGatherer::gather_parallel` (rayon) |

#![warn(missing_docs)]

pub mod config;
mod error;
pub mod eval;
pub mod filter;
pub mod learn;
pub mod linkback;
pub mod models;
pub mod order;
pub mod train;

#[cfg(feature = "cli")]
pub mod cli;

pub use annolink_core::{Annotation, Binding, EntityId, FeaturePack, FeatureSchema, ScoredAnnotation};
pub use config::LinkerConfig;
pub use error::{Error, Result};
pub use order::TieOrder;
