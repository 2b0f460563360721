use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use transposim_sim::evolution::{FitnessConfig, LoadFitness};
use transposim_sim::simulation::{Configuration, SimulationBuilder};

use crate::args::Cli;

/// Effective configuration of a run: the `--config` file when given,
/// otherwise the parameter flags.
pub fn build_configuration(cli: &Cli) -> Result<Configuration> {
    let mut config = match &cli.config {
        Some(path) => Configuration::from_json_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => from_flags(cli)?,
    };
    if cli.independent_streams {
        config.execution.independent_streams = true;
    }
    Ok(config)
}

fn from_flags(cli: &Cli) -> Result<Configuration> {
    let function = LoadFitness::new(cli.sel_multiplier, cli.sel_exponent)?;
    let fitness = if cli.selection {
        FitnessConfig::new(function)
    } else {
        FitnessConfig::neutral(function)
    };

    let config = SimulationBuilder::new()
        .replicates(cli.simulations)
        .population_size(cli.diploids)
        .generations(cli.generations)
        .sites_per_chromosome(cli.sites)
        .initial_elements(cli.initial_tes)
        .transposition(cli.transposition, cli.regulation)
        .loss_rate(cli.loss)
        .map_distance(cli.map_distance)
        .fitness(fitness)
        .seed(cli.seed)
        .build_configuration()?;
    Ok(config)
}

pub fn save_configuration(config: &Configuration, path: &Path) -> Result<()> {
    let json = config.to_json_string()?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write configuration to {}", path.display()))?;
    Ok(())
}
