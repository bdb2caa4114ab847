//! annolink - query annotation training data and link-back
//!
//! # Usage
//!
//! ```bash
//! # Export gathered groups for LIBLINEAR
//! annolink export groups.jsonl -o train.dat --features 1-3,5
//!
//! # Export for RankLib with z-score normalization
//! annolink zscore groups.jsonl -o zscore.json
//! annolink export groups.jsonl -o train.rank --format ranking --normalizer zscore.json
//!
//! # Train, then pick a link-back threshold on development data
//! annolink train liblinear train.dat models/model_1-3,5_AF_0.10000000 -c 0.1
//! annolink sweep devel.jsonl --model models/model_1-3,5_AF_0.10000000
//!
//! # Resolve scored candidates
//! annolink resolve candidates.json --threshold 0.6
//! ```

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use annolink::cli::commands;
use annolink::cli::output::color;
use annolink::cli::{Cli, Commands};

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "annolink=debug" } else { "warn" })
    });
    // Library code logs through `log`; the fmt subscriber bridges it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config.as_deref();
    let result: Result<(), String> = match cli.command {
        Commands::Export(args) => commands::export::run(args, config),
        Commands::Zscore(args) => commands::zscore::run(args, config),
        Commands::Resolve(args) => commands::resolve::run(args, config),
        Commands::Train(args) => commands::train::run(args, config),
        Commands::Sweep(args) => commands::sweep::run(args, config),
        Commands::Config(args) => commands::config::run(args, config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", color("31", "error:"), e);
            ExitCode::FAILURE
        }
    }
}
