//! Resolve command - greedy link-back over scored candidates

use clap::Parser;
use std::path::Path;

use super::super::output::write_output;
use super::super::utils::{format_error, load_config, read_input};
use crate::linkback::LinkBackResolver;
use crate::{Annotation, ScoredAnnotation, TieOrder};

/// Resolve scored candidate annotations
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// JSON array of `{start, length, entity, score}`, or JSONL with one array per query
    #[arg(value_name = "INPUT")]
    pub input: Option<String>,

    /// Minimum accepted score (default: from config)
    #[arg(short, long, value_name = "SCORE")]
    pub threshold: Option<f64>,

    /// Order of equal scores (default: from config)
    #[arg(long, value_name = "ORDER")]
    pub tie_order: Option<TieOrder>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,
}

/// Candidate sets of the input, one per query.
///
/// A document that parses as a single array is one query; otherwise every
/// non-empty line must be an array.
fn parse_queries(text: &str) -> Result<(Vec<Vec<ScoredAnnotation>>, bool), String> {
    if let Ok(single) = serde_json::from_str::<Vec<ScoredAnnotation>>(text) {
        return Ok((vec![single], true));
    }
    let mut queries = Vec::new();
    for (line_num, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let candidates: Vec<ScoredAnnotation> = serde_json::from_str(line)
            .map_err(|e| format!("line {}: invalid candidates: {}", line_num + 1, e))?;
        queries.push(candidates);
    }
    Ok((queries, false))
}

/// Resolve each query of the input and print the accepted annotations.
pub fn run(args: ResolveArgs, config_path: Option<&Path>) -> Result<(), String> {
    let config = load_config(config_path)?;
    let text = read_input(args.input.as_deref())?;
    let (queries, single) = parse_queries(&text).map_err(|e| format_error("parse input", &e))?;

    let resolver = LinkBackResolver::new(args.threshold.unwrap_or(config.linkback.threshold))
        .with_tie_order(args.tie_order.unwrap_or(config.linkback.tie_order));
    log::debug!(
        "resolving {} queries at threshold {}",
        queries.len(),
        resolver.threshold()
    );

    let mut out = String::new();
    for candidates in queries {
        let scored: Vec<(Annotation, f64)> =
            candidates.iter().map(|c| (c.annotation(), c.score)).collect();
        let accepted = resolver.resolve(scored);
        let line = if single {
            serde_json::to_string_pretty(&accepted)
        } else {
            serde_json::to_string(&accepted)
        }
        .map_err(|e| format_error("serialize", &e.to_string()))?;
        out.push_str(&line);
        out.push('\n');
    }
    write_output(&out, args.output.as_deref())
}
