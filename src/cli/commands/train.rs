//! Train command - run LIBLINEAR or RankLib on an exported problem

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use super::super::utils::{format_error, load_config, log_success};
use crate::learn::FeatureSubset;
use crate::train::{command_line, write_feature_list_file, Trainer};

/// Run an external trainer
#[derive(Parser, Debug)]
pub struct TrainArgs {
    /// Trainer to run
    #[command(subcommand)]
    pub trainer: TrainerCommand,

    /// Print the trainer command instead of running it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// External trainer
#[derive(Subcommand, Debug)]
pub enum TrainerCommand {
    /// LIBLINEAR `train` on a pointwise file
    Liblinear(LibLinearArgs),
    /// RankLib on a ranking file
    Ranklib(RankLibArgs),
}

/// LIBLINEAR arguments
#[derive(Args, Debug)]
pub struct LibLinearArgs {
    /// Pointwise training file
    pub problem: PathBuf,

    /// Model file to write
    pub model: PathBuf,

    /// Solver type
    #[arg(short, long, default_value_t = 12)]
    pub solver: u32,

    /// Cost parameter
    #[arg(short, long, default_value_t = 1.0)]
    pub c: f64,
}

/// RankLib arguments
#[derive(Args, Debug)]
pub struct RankLibArgs {
    /// Ranking training file
    pub problem: PathBuf,

    /// Model file to write
    pub model: PathBuf,

    /// Ranker id (6: LambdaMART, 4: Coordinate Ascent)
    #[arg(long, default_value_t = 6)]
    pub ranker: u32,

    /// Metric to optimize on the training data
    #[arg(long, default_value = "NDCG@15")]
    pub metric: String,

    /// Restrict training to these features, e.g. `1-3,5`
    #[arg(long, value_name = "LIST")]
    pub features: Option<String>,

    /// Feature dimension; checks --features and expands `all`
    #[arg(long, value_name = "N")]
    pub dimension: Option<usize>,

    /// Validation ranking file
    #[arg(long, value_name = "PATH")]
    pub validate: Option<PathBuf>,
}

/// Path of the feature list written next to `model`.
fn feature_file_for(model: &Path) -> PathBuf {
    let mut name = model.as_os_str().to_owned();
    name.push(".features");
    PathBuf::from(name)
}

fn execute(
    trainer: &dyn Trainer,
    problem: &Path,
    model: &Path,
    dry_run: bool,
    quiet: bool,
) -> Result<(), String> {
    if dry_run {
        println!("{}", command_line(&trainer.command(problem, model)));
        return Ok(());
    }
    if let Some(dir) = model.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .map_err(|e| format_error("create model directory", &format!("{}: {}", dir.display(), e)))?;
    }
    trainer
        .train(problem, model)
        .map_err(|e| format_error("train", &e.to_string()))?;
    log_success(
        &format!("Trained {} model {}", trainer.name(), model.display()),
        quiet,
    );
    Ok(())
}

/// Run (or print) the trainer.
pub fn run(args: TrainArgs, config_path: Option<&Path>) -> Result<(), String> {
    let config = load_config(config_path)?;
    match args.trainer {
        TrainerCommand::Liblinear(a) => {
            let trainer = config.liblinear(a.solver, a.c);
            execute(&trainer, &a.problem, &a.model, args.dry_run, args.quiet)
        }
        TrainerCommand::Ranklib(a) => {
            let mut trainer = config.ranklib();
            trainer.ranker = a.ranker;
            trainer.metric = a.metric;
            trainer.validate = a.validate;

            if let Some(list) = &a.features {
                let subset =
                    FeatureSubset::parse(list).map_err(|e| format_error("parse feature list", &e.to_string()))?;
                let features = match (subset, a.dimension) {
                    (subset, Some(n)) => subset
                        .indices(n)
                        .map_err(|e| format_error("select features", &e.to_string()))?,
                    (FeatureSubset::Only(indices), None) => indices,
                    (FeatureSubset::All, None) => {
                        return Err("--features all needs --dimension".to_string());
                    }
                };
                let file = feature_file_for(&a.model);
                if !args.dry_run {
                    write_feature_list_file(&file, &features)
                        .map_err(|e| format_error("write feature list", &e.to_string()))?;
                }
                trainer.feature_file = Some(file);
            }

            execute(&trainer, &a.problem, &a.model, args.dry_run, args.quiet)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_file_sits_next_to_model() {
        assert_eq!(
            feature_file_for(Path::new("models/model_1-3_RL")),
            PathBuf::from("models/model_1-3_RL.features")
        );
    }
}
