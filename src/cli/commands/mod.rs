//! Command implementations for the annolink CLI
//!
//! Each command has its own module with an `Args` type for the parser and a
//! `run` function returning a printable error.

pub mod config;
pub mod export;
pub mod resolve;
pub mod sweep;
pub mod train;
pub mod zscore;

// Re-export argument types for parser
pub use config::ConfigArgs;
pub use export::ExportArgs;
pub use resolve::ResolveArgs;
pub use sweep::SweepArgs;
pub use train::TrainArgs;
pub use zscore::ZscoreArgs;
