mod args;
mod commands;
pub mod defaults;
mod logger;
mod printing;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::process;

use args::Cli;
use commands::{config, run};

fn main() -> Result<()> {
    let cli = Cli::try_parse().unwrap_or_else(|e| exit_with_usage(e));
    logger::init(cli.verbose).context("Failed to install the logger")?;

    let configuration = match config::build_configuration(&cli) {
        Ok(c) => c,
        // Inconsistent flags are a usage error, like an out-of-range value.
        Err(e) if cli.config.is_none() => exit_with_usage(clap::Error::raw(
            ErrorKind::ValueValidation,
            format!("{e:#}\n"),
        )),
        Err(e) => return Err(e),
    };

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()?;
    }

    if let Some(path) = &cli.save_config {
        config::save_configuration(&configuration, path)?;
    }

    run::run_simulation(&configuration, &cli.output, cli.progress)
}

/// Print a parse error, followed by the usage line when a value was rejected.
fn exit_with_usage(e: clap::Error) -> ! {
    let _ = e.print();
    if matches!(e.kind(), ErrorKind::ValueValidation | ErrorKind::InvalidValue) {
        eprintln!("\n{}", Cli::command().render_usage());
    }
    process::exit(e.exit_code())
}
