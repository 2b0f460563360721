//! Simulation parameters and configuration.
//!
//! The master [`Configuration`] groups every parameter of a run and can be
//! round-tripped through JSON to reproduce a simulation setup exactly.

use crate::errors::ConfigError;
use crate::evolution::{FitnessConfig, LoadFitness, LossModel, RecombinationModel, TranspositionModel};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default number of consecutive rejected zygotes tolerated for one offspring slot.
pub const DEFAULT_MAX_VIABILITY_ATTEMPTS: usize = 100_000;

/// The master configuration struct.
/// Can be deserialized from a file to fully reproduce a simulation setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub execution: ExecutionConfig,
    pub genome: GenomeConfig,
    pub evolution: EvolutionConfig,
}

/// High-level run parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Number of independent replicates
    pub replicates: usize,
    /// Number of diploid individuals in the population
    pub population_size: usize,
    /// Number of generations per replicate
    pub total_generations: usize,
    /// Seed of the random stream
    pub seed: u64,
    /// Give each replicate its own random stream instead of one shared stream
    #[serde(default)]
    pub independent_streams: bool,
    /// Rejected zygotes tolerated per offspring slot before aborting
    #[serde(default = "default_max_viability_attempts")]
    pub max_viability_attempts: usize,
}

fn default_max_viability_attempts() -> usize {
    DEFAULT_MAX_VIABILITY_ATTEMPTS
}

/// Chromosome architecture and initial element content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomeConfig {
    /// Insertion sites per chromosome
    pub sites_per_chromosome: usize,
    /// Expected number of elements per individual at generation 0
    pub initial_elements: usize,
}

/// Grouped evolutionary parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    pub transposition: TranspositionConfig,
    pub recombination: RecombinationConfig,
    pub fitness: FitnessConfig,
}

/// Element copy and loss rates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TranspositionConfig {
    pub transposition: TranspositionModel,
    pub loss: LossModel,
}

impl TranspositionConfig {
    /// Create from raw rates, validating each.
    pub fn new(rate: f64, regulation: f64, loss_rate: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            transposition: TranspositionModel::new(rate, regulation)?,
            loss: LossModel::new(loss_rate)?,
        })
    }
}

/// Parameters for recombination processes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecombinationConfig {
    /// Recombination parameters
    pub params: RecombinationModel,
}

impl RecombinationConfig {
    /// Create new recombination configuration.
    pub fn new(params: RecombinationModel) -> Self {
        Self { params }
    }
}

impl ExecutionConfig {
    /// Create new execution configuration with a shared random stream.
    pub fn new(replicates: usize, population_size: usize, total_generations: usize, seed: u64) -> Self {
        Self {
            replicates,
            population_size,
            total_generations,
            seed,
            independent_streams: false,
            max_viability_attempts: DEFAULT_MAX_VIABILITY_ATTEMPTS,
        }
    }

    /// Use one random stream per replicate.
    pub fn with_independent_streams(mut self, independent: bool) -> Self {
        self.independent_streams = independent;
        self
    }

    /// Set the per-slot viability retry budget.
    pub fn with_max_viability_attempts(mut self, attempts: usize) -> Self {
        self.max_viability_attempts = attempts;
        self
    }
}

impl Configuration {
    /// Read and validate a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every parameter range.
    ///
    /// Deserialized models bypass their constructors, so they are rebuilt
    /// here through the validating ones.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let exec = &self.execution;
        if exec.replicates < 1 {
            return Err(invalid("number of simulations must be at least 1"));
        }
        if exec.population_size < 2 {
            return Err(invalid("number of diploids must be at least 2"));
        }
        if exec.max_viability_attempts < 1 {
            return Err(invalid("viability retry budget must be at least 1"));
        }
        if self.genome.sites_per_chromosome < 4 {
            return Err(invalid("number of sites per chromosome must be at least 4"));
        }
        if self.genome.initial_elements < 1 {
            return Err(invalid("initial number of TEs per individual must be at least 1"));
        }
        let capacity = 4 * self.genome.sites_per_chromosome;
        if self.genome.initial_elements > capacity {
            return Err(invalid(&format!(
                "initial number of TEs per individual ({}) exceeds the {capacity} available sites",
                self.genome.initial_elements
            )));
        }

        let t = &self.evolution.transposition;
        TranspositionModel::new(t.transposition.rate(), t.transposition.regulation())?;
        LossModel::new(t.loss.rate())?;
        RecombinationModel::new(self.evolution.recombination.params.map_distance())?;
        let f = &self.evolution.fitness.function;
        LoadFitness::new(f.multiplier, f.exponent)?;
        Ok(())
    }
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::InvalidParameter(msg.to_string())
}
