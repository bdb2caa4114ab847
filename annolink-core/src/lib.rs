//! # annolink-core
//!
//! Core types shared by the annolink crates.
//!
//! This crate provides:
//! - **Annotation types**: `Annotation`, `ScoredAnnotation`, `EntityId`, `Binding`
//! - **Feature types**: `FeatureSchema`, `FeaturePack`
//!
//! Everything that learns, exports or links lives in `annolink`, which
//! re-exports these types.

#![warn(missing_docs)]

pub mod annotation;
pub mod error;
pub mod features;

pub use annotation::{Annotation, Binding, EntityId, ScoredAnnotation};
pub use error::{Error, Result};
pub use features::{FeaturePack, FeatureSchema};
