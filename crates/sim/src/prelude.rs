//! Commonly used imports for convenience.
//!
//! This prelude module provides a convenient way to import the most commonly
//! used types and traits in the transposim library.
//!
//! # Example
//!
//! ```
//! use transposim_sim::prelude::*;
//! use std::str::FromStr;
//!
//! let chr = Chromosome::from_str("0110").unwrap();
//! assert_eq!(chr.load(), 2);
//! ```

pub use crate::errors;
pub use crate::evolution::{
    FitnessConfig, IndividualFitness, LoadFitness, LossModel, RecombinationModel,
    TranspositionModel,
};
pub use crate::genome::{Chromosome, Haplotype, Individual, LinkageGroup, Locus};
pub use crate::simulation::{
    run_replicates, Configuration, Population, Simulation, SimulationBuilder, SimulationStatus,
};
pub use crate::storage::{GenerationStats, Recorder, TsvRecorder};
