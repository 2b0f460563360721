//! Simulation engine for one replicate.
//!
//! A replicate starts from a random founding population and, each
//! generation, replaces the population by its offspring, then applies element
//! losses and transpositions. It stops early when the population no longer
//! carries any element.

use crate::errors::{ConfigError, PopulationError, RunError, SimulationError};
use crate::evolution::{LossModel, TranspositionModel};
use crate::genome::Individual;
use crate::simulation::{Configuration, Population};
use crate::storage::{GenerationStats, Recorder};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::{Deserialize, Serialize};

/// Lifecycle of a replicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationStatus {
    /// Population built, generation 0, nothing run yet
    Initialized,
    /// At least one generation has been run
    Running,
    /// Every configured generation has been run
    Completed,
    /// Stopped because no element was left
    ExtinctEarly,
}

/// Event counts of one generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationEvents {
    pub losses: usize,
    pub transpositions: usize,
}

/// Result of a call to [`Simulation::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A new generation was produced
    Advanced(GenerationEvents),
    /// The population carries no element; nothing was changed
    Extinct,
}

/// What a finished replicate reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub replicate: usize,
    pub generations_run: usize,
    pub status: SimulationStatus,
    pub final_load: usize,
}

/// Main simulation engine.
///
/// The engine owns its random generator. Replicates sharing one stream hand
/// it over with [`Simulation::into_rng`].
#[derive(Debug)]
pub struct Simulation<R = Xoshiro256PlusPlus> {
    /// Current population
    population: Population,
    /// Transposition rate and regulation
    transposition: TranspositionModel,
    /// Loss rate
    loss: LossModel,
    /// Replicate identifier (1-based)
    replicate: usize,
    /// Current generation
    generation: usize,
    /// Number of generations to run
    total_generations: usize,
    status: SimulationStatus,
    rng: R,
}

impl Simulation<Xoshiro256PlusPlus> {
    /// Create a replicate with a fresh generator seeded from the configuration.
    pub fn from_seed(config: &Configuration, replicate: usize) -> Result<Self, ConfigError> {
        let rng = Xoshiro256PlusPlus::seed_from_u64(config.execution.seed);
        Self::new(config, replicate, rng)
    }
}

impl<R: Rng> Simulation<R> {
    /// Validate `config` and build the founding population, drawing from `rng`.
    pub fn new(config: &Configuration, replicate: usize, mut rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let evo = &config.evolution;
        let population = Population::random(
            &mut rng,
            config.execution.population_size,
            config.genome.sites_per_chromosome,
            config.genome.initial_elements,
            evo.recombination.params,
            evo.fitness,
        )?;
        Self::with_population(config, replicate, population, rng)
    }

    /// Start from given individuals instead of a random founding population.
    ///
    /// Their number and chromosome length must match `config`.
    pub fn from_individuals(
        config: &Configuration,
        replicate: usize,
        individuals: Vec<Individual>,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let expected = config.execution.population_size;
        if individuals.len() != expected {
            return Err(PopulationError::SizeMismatch {
                expected,
                found: individuals.len(),
            }
            .into());
        }
        let evo = &config.evolution;
        let population = Population::new(individuals, evo.recombination.params, evo.fitness)?;
        if population.sites_per_chromosome() != config.genome.sites_per_chromosome {
            return Err(PopulationError::ArchitectureMismatch {
                expected_sites: config.genome.sites_per_chromosome,
                found_sites: population.sites_per_chromosome(),
            }
            .into());
        }
        Self::with_population(config, replicate, population, rng)
    }

    fn with_population(
        config: &Configuration,
        replicate: usize,
        population: Population,
        rng: R,
    ) -> Result<Self, ConfigError> {
        let population =
            population.with_max_viability_attempts(config.execution.max_viability_attempts);
        debug!(
            "replicate {replicate}: founding population of {} individuals carries {} TEs",
            population.size(),
            population.total_load()
        );

        Ok(Self {
            population,
            transposition: config.evolution.transposition.transposition,
            loss: config.evolution.transposition.loss,
            replicate,
            generation: 0,
            total_generations: config.execution.total_generations,
            status: SimulationStatus::Initialized,
            rng,
        })
    }

    /// Get the current population.
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Get current generation number.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn total_generations(&self) -> usize {
        self.total_generations
    }

    pub fn replicate(&self) -> usize {
        self.replicate
    }

    pub fn status(&self) -> SimulationStatus {
        self.status
    }

    /// Statistics of the current generation.
    pub fn statistics(&self) -> GenerationStats {
        GenerationStats::from_population(self.replicate, self.generation, &self.population)
    }

    /// Give back the generator, to continue the stream in another replicate.
    pub fn into_rng(self) -> R {
        self.rng
    }

    /// Advance by one generation.
    ///
    /// Without any element left, the population is not touched, the status
    /// becomes `ExtinctEarly` and `StepOutcome::Extinct` is returned.
    pub fn step(&mut self) -> Result<StepOutcome, SimulationError> {
        if self.population.total_load() == 0 {
            self.status = SimulationStatus::ExtinctEarly;
            return Ok(StepOutcome::Extinct);
        }
        self.status = SimulationStatus::Running;

        self.population.make_new_generation(&mut self.rng)?;
        let losses = self.population.loss(&mut self.rng, &self.loss)?;
        let transpositions = self.population.transposition(&mut self.rng, &self.transposition)?;
        self.generation += 1;

        debug!(
            "replicate {} generation {}: {losses} losses, {transpositions} transpositions",
            self.replicate, self.generation
        );
        Ok(StepOutcome::Advanced(GenerationEvents {
            losses,
            transpositions,
        }))
    }

    /// Run every remaining generation, recording generation 0 first and then
    /// each new generation.
    pub fn run<Rec: Recorder + ?Sized>(&mut self, recorder: &mut Rec) -> Result<RunSummary, RunError> {
        self.run_with(recorder, |_| {})
    }

    /// Like [`Simulation::run`], calling `on_generation` after each recorded
    /// generation (including generation 0).
    pub fn run_with<Rec, F>(&mut self, recorder: &mut Rec, mut on_generation: F) -> Result<RunSummary, RunError>
    where
        Rec: Recorder + ?Sized,
        F: FnMut(&GenerationStats),
    {
        let initial = self.statistics();
        recorder.record(&initial)?;
        on_generation(&initial);

        while self.generation < self.total_generations {
            match self.step()? {
                StepOutcome::Advanced(_) => {
                    let stats = self.statistics();
                    debug!("{stats}");
                    recorder.record(&stats)?;
                    on_generation(&stats);
                }
                StepOutcome::Extinct => {
                    info!(
                        "replicate {}: no TE left at generation {}, stopping",
                        self.replicate, self.generation
                    );
                    break;
                }
            }
        }
        if self.status != SimulationStatus::ExtinctEarly {
            self.status = SimulationStatus::Completed;
        }

        Ok(RunSummary {
            replicate: self.replicate,
            generations_run: self.generation,
            status: self.status,
            final_load: self.population.total_load(),
        })
    }
}
