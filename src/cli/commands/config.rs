//! Config command - Configuration management

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use super::super::output::color;
use super::super::utils::{format_error, load_config, log_success};
use crate::LinkerConfig;

/// Configuration management
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Action to perform
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Write a config file with the default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the config file location
    Path,
}

fn config_file(config_path: Option<&Path>) -> PathBuf {
    config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(LinkerConfig::default_path)
}

/// Show, create or locate the config file.
pub fn run(args: ConfigArgs, config_path: Option<&Path>) -> Result<(), String> {
    let path = config_file(config_path);

    match args.action {
        ConfigAction::Show => {
            let config = load_config(config_path)?;
            let text = config
                .to_toml()
                .map_err(|e| format_error("render config", &e.to_string()))?;
            if !path.exists() {
                eprintln!(
                    "{} {} does not exist, showing defaults",
                    color("33", "note:"),
                    path.display()
                );
            }
            print!("{}", text);
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                return Err(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ));
            }
            LinkerConfig::default()
                .save(&path)
                .map_err(|e| format_error("write config", &e.to_string()))?;
            log_success(&format!("Wrote {}", path.display()), false);
        }
        ConfigAction::Path => println!("{}", path.display()),
    }
    Ok(())
}
