//! Utility functions for CLI commands

use is_terminal::IsTerminal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use crate::learn::{Example, ExampleGatherer, Group};
use crate::{FeaturePack, FeatureSchema, LinkerConfig};

/// Read input from a file, or from stdin when the path is absent or `-`
pub fn read_input(path: Option<&str>) -> Result<String, String> {
    match path {
        Some(p) if p != "-" => read_input_file(p),
        _ => {
            if io::stdin().is_terminal() {
                return Err("No input provided. Pass a file or pipe via stdin".to_string());
            }
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format_error("read stdin", &e.to_string()))?;
            Ok(buf)
        }
    }
}

/// Read a file with consistent error handling
pub fn read_input_file(path: &str) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format_error("read file", &format!("{}: {}", path, e)))
}

/// Format error message consistently
pub fn format_error(operation: &str, details: &str) -> String {
    format!("Failed to {}: {}", operation, details)
}

/// Log success message with color (respects quiet flag)
pub fn log_success(msg: &str, quiet: bool) {
    if !quiet {
        use super::output::color;
        eprintln!("{} {}", color("32", "✓"), msg);
    }
}

/// Load the configuration named on the command line, or the default one
pub fn load_config(path: Option<&Path>) -> Result<LinkerConfig, String> {
    LinkerConfig::load_or_default(path).map_err(|e| format_error("load config", &e.to_string()))
}

#[derive(Debug, Deserialize)]
struct ExampleRecord<T> {
    values: Vec<Option<f64>>,
    target: f64,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct GroupRecord<T, G> {
    #[serde(default)]
    schema: Option<Vec<String>>,
    examples: Vec<ExampleRecord<T>>,
    gold: Option<G>,
}

/// Parse JSONL groups into a gatherer, one group per non-empty line
///
/// A line's `schema` applies to that line and the following ones until the
/// next `schema`; without any, features are named `f1..fn`.
pub fn parse_groups<T, G>(text: &str) -> Result<ExampleGatherer<T, G>, String>
where
    T: DeserializeOwned,
    G: DeserializeOwned,
{
    let mut gatherer = ExampleGatherer::new();
    let mut schema: Option<Arc<FeatureSchema>> = None;

    for (line_num, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let at = |msg: String| format!("line {}: {}", line_num + 1, msg);
        let record: GroupRecord<T, G> =
            serde_json::from_str(line).map_err(|e| at(format!("invalid JSON: {}", e)))?;

        if let Some(names) = record.schema {
            let name = format!("schema@{}", line_num + 1);
            schema = Some(FeatureSchema::new(name, names).map_err(|e| at(e.to_string()))?);
        }

        let with_data = record.examples.iter().filter(|e| e.data.is_some()).count();
        if with_data != 0 && with_data != record.examples.len() {
            return Err(at(format!(
                "{} of {} examples carry data; give it for all or none",
                with_data,
                record.examples.len()
            )));
        }

        let mut examples = Vec::with_capacity(record.examples.len());
        let mut data = Vec::with_capacity(with_data);
        for ex in record.examples {
            let s = match &schema {
                Some(s) => s.clone(),
                None => {
                    let s = FeatureSchema::numbered("numbered", ex.values.len());
                    schema = Some(s.clone());
                    s
                }
            };
            let pack = FeaturePack::from_values(s, ex.values).map_err(|e| at(e.to_string()))?;
            examples.push(Example::new(pack, ex.target));
            data.extend(ex.data);
        }

        let mut group = Group::new(examples);
        if with_data > 0 {
            group = group.with_data(data);
        }
        if let Some(gold) = record.gold {
            group = group.with_gold(gold);
        }
        gatherer.add_group(group).map_err(|e| at(e.to_string()))?;
    }
    Ok(gatherer)
}
