//! Sweep command - evaluate link-back thresholds on development data

use clap::{Parser, ValueEnum};
use std::path::Path;

use super::super::output::{color, metric_colored, write_output};
use super::super::utils::{format_error, load_config, parse_groups, read_input};
use super::export::load_normalizer;
use crate::eval::{best_point, ThresholdSweep};
use crate::learn::{all_features, AnnotationGatherer};
use crate::models::LinearModel;
use crate::TieOrder;

/// Format of the model file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ModelFormat {
    /// LIBLINEAR model (single weight column)
    #[default]
    Liblinear,
    /// RankLib linear ranker
    Ranklib,
}

/// Sweep link-back thresholds with a trained model
#[derive(Parser, Debug)]
pub struct SweepArgs {
    /// JSONL groups whose `data` are annotations and `gold` the gold annotations
    #[arg(value_name = "INPUT")]
    pub input: Option<String>,

    /// Trained model file
    #[arg(short, long, value_name = "PATH")]
    pub model: String,

    /// Model file format
    #[arg(long, default_value = "liblinear")]
    pub model_format: ModelFormat,

    /// Z-score normalizer used at training time
    #[arg(long, value_name = "PATH")]
    pub normalizer: Option<String>,

    /// First threshold
    #[arg(long, default_value_t = 0.0)]
    pub start: f64,

    /// Last threshold (inclusive)
    #[arg(long, default_value_t = 1.0)]
    pub end: f64,

    /// Threshold increment
    #[arg(long, default_value_t = 0.1)]
    pub step: f64,

    /// Cost the model was trained with, for the summary line
    #[arg(short, long, value_name = "C")]
    pub c: Option<f64>,

    /// Order of equal scores (default: from config)
    #[arg(long, value_name = "ORDER")]
    pub tie_order: Option<TieOrder>,

    /// Print the sweep as JSON
    #[arg(long)]
    pub json: bool,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,
}

/// Run the sweep.
pub fn run(args: SweepArgs, config_path: Option<&Path>) -> Result<(), String> {
    let config = load_config(config_path)?;
    let text = read_input(args.input.as_deref())?;
    let gatherer: AnnotationGatherer = parse_groups(&text).map_err(|e| format_error("parse groups", &e))?;

    let model = match args.model_format {
        ModelFormat::Liblinear => LinearModel::load_liblinear(&args.model),
        ModelFormat::Ranklib => LinearModel::load_ranklib(&args.model),
    }
    .map_err(|e| format_error("load model", &format!("{}: {}", args.model, e)))?;
    let normalizer = load_normalizer(args.normalizer.as_deref(), config.normalizer.default_value, &gatherer)?;

    let sweep = ThresholdSweep {
        tie_order: args.tie_order.unwrap_or(config.linkback.tie_order),
        ..ThresholdSweep::new(args.start, args.end, args.step)
    };
    let points = sweep
        .run(&gatherer, &model, normalizer.as_ref())
        .map_err(|e| format_error("sweep", &e.to_string()))?;

    if args.json {
        let json = serde_json::to_string_pretty(&points)
            .map_err(|e| format_error("serialize", &e.to_string()))?;
        return write_output(&format!("{}\n", json), args.output.as_deref());
    }

    let features = all_features(gatherer.feature_count().unwrap_or(0));
    let c = args.c.unwrap_or(-1.0);
    let examples = gatherer.examples_count();

    let mut out = String::new();
    for p in &points {
        out.push_str(&p.to_configuration(features.clone(), c, examples).readable());
        out.push('\n');
    }
    write_output(&out, args.output.as_deref())?;

    if let Some(best) = best_point(&points) {
        eprintln!(
            "{} threshold {:.3}: macro F1 {} (P {} R {}), micro F1 {}",
            color("1;36", "best"),
            best.threshold,
            metric_colored(best.metrics.macro_f1()),
            metric_colored(best.metrics.macro_precision()),
            metric_colored(best.metrics.macro_recall()),
            metric_colored(best.metrics.micro_f1())
        );
    }
    Ok(())
}
