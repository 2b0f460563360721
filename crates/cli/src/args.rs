use crate::defaults;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Transposim: transposable element dynamics in a diploid population
///
/// Each individual carries two pairs of chromosomes with a fixed number of
/// insertion sites. Elements copy themselves into empty sites, get excised,
/// and are shuffled by recombination; zygotes can be selected against their
/// element load.
#[derive(Parser, Debug, Clone)]
#[command(name = "transposim")]
#[command(author, version, about = "Simulates transposable element dynamics in a diploid population", long_about = None)]
pub struct Cli {
    /// Number of independent simulations (replicates)
    #[arg(short = 's', long, default_value_t = defaults::SIMULATIONS, value_parser = at_least_one)]
    pub simulations: usize,

    /// Number of diploid individuals
    #[arg(short = 'n', long, default_value_t = defaults::DIPLOIDS, value_parser = at_least_two)]
    pub diploids: usize,

    /// Number of generations
    #[arg(short = 'g', long, default_value_t = defaults::GENERATIONS)]
    pub generations: usize,

    /// Number of insertion sites per chromosome
    #[arg(short = 'c', long, default_value_t = defaults::SITES_PER_CHROMOSOME, value_parser = at_least_four)]
    pub sites: usize,

    /// Expected number of TEs per individual at generation 0
    #[arg(short = 'i', long, default_value_t = defaults::INITIAL_TES, value_parser = at_least_one)]
    pub initial_tes: usize,

    /// Transposition probability per TE of an individual without any TE (p0)
    #[arg(short = 't', long, default_value_t = defaults::TRANSPOSITION_RATE, value_parser = probability)]
    pub transposition: f64,

    /// Regulation of transposition by the load: rate = p0 / (1 + k * load)
    #[arg(short = 'k', long, default_value_t = defaults::REGULATION, value_parser = non_negative)]
    pub regulation: f64,

    /// Loss probability per TE per generation
    #[arg(short = 'l', long, default_value_t = defaults::LOSS_RATE, value_parser = probability)]
    pub loss: f64,

    /// Expected number of crossovers per chromosome pair and meiosis
    #[arg(short = 'd', long, default_value_t = defaults::MAP_DISTANCE, value_parser = non_negative)]
    pub map_distance: f64,

    /// Select zygotes on their TE load
    #[arg(short = 'S', long)]
    pub selection: bool,

    /// Selection multiplier: fitness = 1 - m * load^e
    #[arg(short = 'm', long, default_value_t = defaults::SEL_MULTIPLIER, value_parser = finite)]
    pub sel_multiplier: f64,

    /// Selection exponent: fitness = 1 - m * load^e
    #[arg(short = 'e', long, default_value_t = defaults::SEL_EXPONENT, value_parser = finite)]
    pub sel_exponent: f64,

    /// Seed of the random generator
    #[arg(short = 'r', long, default_value_t = defaults::SEED)]
    pub seed: u64,

    /// Output file (tab-separated, truncated if it exists)
    #[arg(short = 'o', long, default_value = defaults::OUTPUT)]
    pub output: PathBuf,

    /// Load the whole configuration from a JSON file instead of the flags above
    #[arg(
        long,
        conflicts_with_all = [
            "simulations", "diploids", "generations", "sites", "initial_tes",
            "transposition", "regulation", "loss", "map_distance", "selection",
            "sel_multiplier", "sel_exponent", "seed",
        ]
    )]
    pub config: Option<PathBuf>,

    /// Write the effective configuration as JSON before running
    #[arg(long)]
    pub save_config: Option<PathBuf>,

    /// Give each simulation its own random stream and run them in parallel
    #[arg(long)]
    pub independent_streams: bool,

    /// Number of threads used with --independent-streams
    ///
    /// If not specified, defaults to the number of logical CPUs.
    #[arg(long)]
    pub threads: Option<usize>,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn count_at_least(s: &str, min: usize) -> Result<usize, String> {
    let value: usize = s.parse().map_err(|e| format!("{e}"))?;
    if value < min {
        return Err(format!("must be at least {min}"));
    }
    Ok(value)
}

fn at_least_one(s: &str) -> Result<usize, String> {
    count_at_least(s, 1)
}

fn at_least_two(s: &str) -> Result<usize, String> {
    count_at_least(s, 2)
}

fn at_least_four(s: &str) -> Result<usize, String> {
    count_at_least(s, 4)
}

fn finite(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if !value.is_finite() {
        return Err("must be a finite number".to_string());
    }
    Ok(value)
}

fn probability(s: &str) -> Result<f64, String> {
    let value = finite(s)?;
    if !(0.0..=1.0).contains(&value) {
        return Err("must be between 0 and 1".to_string());
    }
    Ok(value)
}

fn non_negative(s: &str) -> Result<f64, String> {
    let value = finite(s)?;
    if value < 0.0 {
        return Err("must not be negative".to_string());
    }
    Ok(value)
}
