//! Evaluation of predicted annotation sets against gold.
//!
//! - [`SetMetrics`] / [`MetricsResultSet`]: per-instance counts, micro and macro P/R/F1
//! - [`ModelConfigurationResult`]: one trained configuration and how it did
//! - [`ThresholdSweep`]: link-back threshold selection on development data
//!
//! # Example
//!
//! ```rust
//! use annolink::eval::MetricsResultSet;
//! use std::collections::HashSet;
//!
//! let gold: HashSet<u32> = [1, 2].into_iter().collect();
//! let predicted: HashSet<u32> = [2, 3].into_iter().collect();
//! let metrics = MetricsResultSet::from_sets([(&gold, &predicted)]);
//! assert_eq!(metrics.global_tp(), 1);
//! assert!((metrics.micro_f1() - 0.5).abs() < 1e-12);
//! ```

mod metrics;
mod threshold;

pub use metrics::{MetricsResultSet, ModelConfigurationResult, ModelParams, SetMetrics};
pub use threshold::{best_point, SweepPoint, ThresholdSweep, MAX_SWEEP_POINTS};
