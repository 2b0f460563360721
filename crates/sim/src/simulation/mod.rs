//! Simulation engine and population management.
//!
//! This module provides the generation loop of one replicate, the driver
//! running every replicate of a configuration, and population management.

//! Re-exports
//!
//! The most commonly used simulation types are re-exported here for
//! convenience so consumers can import them from `transposim_sim::simulation`.
//!
//! - `Simulation`: the engine that runs the generations of one replicate.
//! - `Population`: in-memory container for individuals used during simulation.
//! - `SimulationBuilder`: fluent builder for constructing `Simulation` instances
//!   with sensible defaults and validation.
//! - `run_replicates`: runs every replicate of a `Configuration`.

pub mod builder;
pub mod configs;
pub mod engine;
pub mod population;
pub mod replicates;

pub use builder::SimulationBuilder;
pub use configs::{
    Configuration, EvolutionConfig, ExecutionConfig, GenomeConfig, RecombinationConfig,
    TranspositionConfig, DEFAULT_MAX_VIABILITY_ATTEMPTS,
};
pub use engine::{GenerationEvents, RunSummary, Simulation, SimulationStatus, StepOutcome};
pub use population::Population;
pub use replicates::{replicate_streams, run_replicates, run_replicates_with};
