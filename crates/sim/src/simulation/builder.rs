//! Builder pattern for creating simulations.
//!
//! Provides a fluent API for configuring and creating simulations with
//! sensible defaults and comprehensive validation.

use crate::errors::ConfigError;
use crate::evolution::{FitnessConfig, LoadFitness, RecombinationModel};
use crate::simulation::{
    Configuration, EvolutionConfig, ExecutionConfig, GenomeConfig, RecombinationConfig,
    Simulation, TranspositionConfig, DEFAULT_MAX_VIABILITY_ATTEMPTS,
};

/// Builder for constructing Simulation instances with a fluent API.
///
/// Population size, generation count, chromosome length and initial load
/// are required; every rate defaults to the classic parameter set.
///
/// # Examples
///
/// ```
/// use transposim_sim::simulation::SimulationBuilder;
///
/// let sim = SimulationBuilder::new()
///     .population_size(50)
///     .generations(100)
///     .sites_per_chromosome(31)
///     .initial_elements(10)
///     .transposition(0.01, 0.05)
///     .loss_rate(0.005)
///     .seed(42)
///     .build()
///     .unwrap();
/// assert_eq!(sim.population().size(), 50);
/// ```
#[derive(Debug, Clone)]
pub struct SimulationBuilder {
    // Required parameters
    population_size: Option<usize>,
    generations: Option<usize>,
    sites_per_chromosome: Option<usize>,
    initial_elements: Option<usize>,

    // Evolutionary parameters (with defaults)
    transposition_rate: f64,
    regulation: f64,
    loss_rate: f64,
    map_distance: f64,
    fitness: FitnessConfig,

    // Execution
    replicates: usize,
    seed: u64,
    independent_streams: bool,
    max_viability_attempts: usize,
}

impl Default for SimulationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationBuilder {
    /// Create a new simulation builder with default values.
    pub fn new() -> Self {
        Self {
            population_size: None,
            generations: None,
            sites_per_chromosome: None,
            initial_elements: None,
            transposition_rate: 0.01,
            regulation: 0.05,
            loss_rate: 0.005,
            map_distance: 90.0,
            fitness: FitnessConfig::neutral(LoadFitness {
                multiplier: 0.001,
                exponent: 1.5,
            }),
            replicates: 1,
            seed: 1859,
            independent_streams: false,
            max_viability_attempts: DEFAULT_MAX_VIABILITY_ATTEMPTS,
        }
    }

    /// Set the population size (required).
    pub fn population_size(mut self, size: usize) -> Self {
        self.population_size = Some(size);
        self
    }

    /// Set the number of generations to run (required).
    pub fn generations(mut self, generations: usize) -> Self {
        self.generations = Some(generations);
        self
    }

    /// Set the number of insertion sites per chromosome (required).
    pub fn sites_per_chromosome(mut self, sites: usize) -> Self {
        self.sites_per_chromosome = Some(sites);
        self
    }

    /// Set the expected number of elements per founding individual (required).
    pub fn initial_elements(mut self, elements: usize) -> Self {
        self.initial_elements = Some(elements);
        self
    }

    /// Set the base transposition rate and its regulation coefficient.
    pub fn transposition(mut self, rate: f64, regulation: f64) -> Self {
        self.transposition_rate = rate;
        self.regulation = regulation;
        self
    }

    /// Set the per-element loss rate (default: 0.005).
    pub fn loss_rate(mut self, rate: f64) -> Self {
        self.loss_rate = rate;
        self
    }

    /// Set the expected number of crossovers per chromosome pair and meiosis
    /// (default: 90).
    pub fn map_distance(mut self, distance: f64) -> Self {
        self.map_distance = distance;
        self
    }

    /// Set the fitness configuration (default: neutral).
    pub fn fitness(mut self, fitness: FitnessConfig) -> Self {
        self.fitness = fitness;
        self
    }

    /// Set the number of replicates (default: 1).
    pub fn replicates(mut self, replicates: usize) -> Self {
        self.replicates = replicates;
        self
    }

    /// Set the random seed for reproducibility (default: 1859).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Give each replicate its own random stream (default: one shared stream).
    pub fn independent_streams(mut self, independent: bool) -> Self {
        self.independent_streams = independent;
        self
    }

    /// Set the per-slot viability retry budget.
    pub fn max_viability_attempts(mut self, attempts: usize) -> Self {
        self.max_viability_attempts = attempts;
        self
    }

    /// Assemble and validate the configuration without building a simulation.
    pub fn build_configuration(&self) -> Result<Configuration, ConfigError> {
        let population_size = self
            .population_size
            .ok_or(ConfigError::MissingRequired("population_size"))?;
        let generations = self
            .generations
            .ok_or(ConfigError::MissingRequired("generations"))?;
        let sites_per_chromosome = self
            .sites_per_chromosome
            .ok_or(ConfigError::MissingRequired("sites_per_chromosome"))?;
        let initial_elements = self
            .initial_elements
            .ok_or(ConfigError::MissingRequired("initial_elements"))?;

        let config = Configuration {
            execution: ExecutionConfig::new(self.replicates, population_size, generations, self.seed)
                .with_independent_streams(self.independent_streams)
                .with_max_viability_attempts(self.max_viability_attempts),
            genome: GenomeConfig {
                sites_per_chromosome,
                initial_elements,
            },
            evolution: EvolutionConfig {
                transposition: TranspositionConfig::new(
                    self.transposition_rate,
                    self.regulation,
                    self.loss_rate,
                )?,
                recombination: RecombinationConfig::new(RecombinationModel::new(self.map_distance)?),
                fitness: self.fitness,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Build and validate the simulation of the first replicate.
    pub fn build(self) -> Result<Simulation, ConfigError> {
        let config = self.build_configuration()?;
        Simulation::from_seed(&config, 1)
    }
}
