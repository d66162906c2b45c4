mod cli;
mod commands;
mod input;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use rulebox_core::Config;
use tracing::info;

use crate::cli::{CliArgs, Command};

fn main() -> Result<ExitCode> {
    rulebox_core::load_dotenv();
    let args = CliArgs::parse();
    let config = Config::for_profile(&args.profile);

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.runtime.log_filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    config.log_summary();

    if config.runtime.worker_threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.runtime.worker_threads)
            .build_global()
            .context("failed to configure worker pool")?;
        info!(threads = config.runtime.worker_threads, "worker pool configured");
    }

    let mut eval = config.eval;
    if args.sequential {
        eval.parallel = false;
    }
    let rules_path = args.rules.clone().or_else(|| config.runtime.rules_path.clone());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let code = match args.command {
        Command::Label {
            input,
            unique,
            format,
        } => {
            let rules = commands::load_rules(&require_rules(rules_path)?, eval)?;
            let texts = input::read_texts(&input)?;
            commands::label(&rules, &texts, unique, format, &mut out)?;
            ExitCode::SUCCESS
        }
        Command::Validate { paths } => {
            let paths = if paths.is_empty() {
                vec![require_rules(rules_path)?]
            } else {
                paths
            };
            if commands::validate(&paths, &mut out)? {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Command::Explain { text } => {
            let rules = commands::load_rules(&require_rules(rules_path)?, eval)?;
            commands::explain(&rules, &text, &mut out)?;
            ExitCode::SUCCESS
        }
    };

    out.flush()?;
    Ok(code)
}

fn require_rules(path: Option<PathBuf>) -> Result<PathBuf> {
    path.context("no rule source given; pass --rules or set RULES_PATH")
}
