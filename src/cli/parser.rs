//! CLI argument parsing and structure definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands;

/// Training-data export, model training and link-back for query annotation
#[derive(Parser, Debug)]
#[command(name = "annolink")]
#[command(
    author,
    version,
    about = "Training-data export, model training and link-back for query annotation",
    long_about = r#"
annolink - gather, export, train and link back

INPUT (JSONL, one group per line):
  {"schema": ["f1", "f2"], "examples": [{"values": [0.2, null], "target": 1.0, "data": ...}], "gold": ...}

  `schema` is optional (features are named f1..fn), `null` marks an unset feature,
  `data` and `gold` are carried along untouched.

EXAMPLES:
  annolink export groups.jsonl -o train.dat
  annolink export groups.jsonl -o train.rank --format ranking --normalizer zscore.json
  annolink zscore groups.jsonl -o zscore.json
  annolink resolve candidates.json --threshold 0.6
  annolink train liblinear train.dat models/ann.model -s 12 -c 0.1
  annolink sweep devel.jsonl --model models/ann.model --normalizer zscore.json
  annolink config init
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log debug messages (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: platform config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export JSONL groups as a LIBSVM or RankLib training file
    #[command(visible_alias = "x")]
    Export(commands::ExportArgs),

    /// Fit a z-score normalizer on JSONL groups and dump it
    #[command(visible_alias = "z")]
    Zscore(commands::ZscoreArgs),

    /// Resolve scored candidate annotations into a disjoint set
    #[command(visible_alias = "r")]
    Resolve(commands::ResolveArgs),

    /// Run LIBLINEAR or RankLib on an exported problem
    #[command(visible_alias = "t")]
    Train(commands::TrainArgs),

    /// Evaluate link-back thresholds with a trained model
    #[command(visible_alias = "s")]
    Sweep(commands::SweepArgs),

    /// Show or create the configuration file
    Config(commands::ConfigArgs),
}
