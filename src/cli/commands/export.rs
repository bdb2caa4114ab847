//! Export command - JSONL groups to LIBSVM or RankLib training files

use clap::{Parser, ValueEnum};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use super::super::utils::{format_error, load_config, log_success, parse_groups, read_input};
use crate::learn::{
    ExampleGatherer, FeatureNormalizer, FeatureSubset, NoFeatureNormalizer, ZScoreFeatureNormalizer,
};
use crate::{FeatureSchema, TieOrder};

/// Training file layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// `<target> <idx>:<value> ... #id=<group>` (LIBSVM / LIBLINEAR)
    #[default]
    Pointwise,
    /// `<rank> qid:<group> <idx>:<value> ...` (RankLib)
    Ranking,
}

/// Export JSONL groups as a training file
#[derive(Parser, Debug)]
pub struct ExportArgs {
    /// JSONL groups (`-` or absent: stdin)
    #[arg(value_name = "INPUT")]
    pub input: Option<String>,

    /// Output training file
    #[arg(short, long, value_name = "PATH")]
    pub output: String,

    /// Output layout
    #[arg(long, default_value = "pointwise")]
    pub format: ExportFormat,

    /// Features to write, e.g. `1-3,5` (pointwise only)
    #[arg(long, value_name = "LIST")]
    pub features: Option<String>,

    /// Z-score normalizer dumped by `annolink zscore`
    #[arg(long, value_name = "PATH")]
    pub normalizer: Option<String>,

    /// Order of equal targets in ranking files (default: from config)
    #[arg(long, value_name = "ORDER")]
    pub tie_order: Option<TieOrder>,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Normalizer from a dump file, or the identity with the configured default value
///
/// A dump must match every feature schema of `gatherer`.
pub(crate) fn load_normalizer<T, G>(
    path: Option<&str>,
    default_value: f64,
    gatherer: &ExampleGatherer<T, G>,
) -> Result<Box<dyn FeatureNormalizer>, String> {
    let Some(p) = path else {
        return Ok(Box::new(NoFeatureNormalizer::with_default(default_value)));
    };
    let fail = |e: crate::Error| format_error("load normalizer", &format!("{}: {}", p, e));

    let mut schemas: Vec<&Arc<FeatureSchema>> = Vec::new();
    for pack in gatherer.all_feature_packs() {
        if !schemas.iter().any(|s| Arc::ptr_eq(s, pack.schema())) {
            schemas.push(pack.schema());
        }
    }
    let norm = match schemas.split_first() {
        Some((first, rest)) => {
            let norm = ZScoreFeatureNormalizer::load_for(p, first).map_err(fail)?;
            for schema in rest {
                norm.check_schema(schema).map_err(fail)?;
            }
            norm
        }
        None => ZScoreFeatureNormalizer::load(p).map_err(fail)?,
    };
    Ok(Box::new(norm))
}

/// Export groups read from the input.
pub fn run(args: ExportArgs, config_path: Option<&Path>) -> Result<(), String> {
    let config = load_config(config_path)?;
    let text = read_input(args.input.as_deref())?;
    let gatherer: ExampleGatherer<Value, Value> =
        parse_groups(&text).map_err(|e| format_error("parse groups", &e))?;

    let normalizer = load_normalizer(args.normalizer.as_deref(), config.normalizer.default_value, &gatherer)?;

    match args.format {
        ExportFormat::Pointwise => {
            let subset = args
                .features
                .as_deref()
                .map(FeatureSubset::parse)
                .transpose()
                .map_err(|e| format_error("parse feature list", &e.to_string()))?;
            gatherer
                .export_pointwise(&args.output, normalizer.as_ref(), subset.as_ref())
                .map_err(|e| format_error("export", &e.to_string()))?;
        }
        ExportFormat::Ranking => {
            if args.features.is_some() {
                return Err("--features applies to pointwise exports only".to_string());
            }
            let tie_order = args.tie_order.unwrap_or(config.linkback.tie_order);
            gatherer
                .export_ranking_with(&args.output, normalizer.as_ref(), tie_order)
                .map_err(|e| format_error("export", &e.to_string()))?;
        }
    }

    log_success(
        &format!(
            "Exported {} examples in {} groups to {}",
            gatherer.examples_count(),
            gatherer.groups_count(),
            args.output
        ),
        args.quiet,
    );
    Ok(())
}
