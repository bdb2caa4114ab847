//! Zscore command - fit and dump a z-score normalizer

use clap::Parser;
use serde_json::Value;
use std::path::Path;

use super::super::output::log_info;
use super::super::utils::{format_error, load_config, log_success, parse_groups, read_input};
use crate::learn::{ExampleGatherer, ZScoreFeatureNormalizer};

/// Fit a z-score normalizer on JSONL groups
#[derive(Parser, Debug)]
pub struct ZscoreArgs {
    /// JSONL groups (`-` or absent: stdin)
    #[arg(value_name = "INPUT")]
    pub input: Option<String>,

    /// Where to dump the normalizer (JSON)
    #[arg(short, long, value_name = "PATH")]
    pub output: String,

    /// Value of unset features (default: from config)
    #[arg(long, value_name = "VALUE")]
    pub default_value: Option<f64>,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Fit and dump.
pub fn run(args: ZscoreArgs, config_path: Option<&Path>) -> Result<(), String> {
    let config = load_config(config_path)?;
    let text = read_input(args.input.as_deref())?;
    let gatherer: ExampleGatherer<Value, Value> =
        parse_groups(&text).map_err(|e| format_error("parse groups", &e))?;

    let default_value = args.default_value.unwrap_or(config.normalizer.default_value);
    let norm = ZScoreFeatureNormalizer::from_gatherer(&gatherer, default_value)
        .map_err(|e| format_error("fit normalizer", &e.to_string()))?;

    for stats in norm.stats() {
        log_info(
            &format!(
                "  {:<24} mean={:<12.6} std={:<12.6} n={}",
                stats.name, stats.mean, stats.std_dev, stats.count
            ),
            args.quiet,
        );
    }

    norm.dump(&args.output)
        .map_err(|e| format_error("dump normalizer", &e.to_string()))?;
    log_success(
        &format!(
            "Fitted {} features on {} examples, wrote {}",
            norm.stats().len(),
            gatherer.examples_count(),
            args.output
        ),
        args.quiet,
    );
    Ok(())
}
