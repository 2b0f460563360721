//! Evolutionary processes acting on element-bearing genomes:
//! - **Recombination**: Poisson crossovers between homologues
//! - **Transposition / loss**: per-element copy and excision rates
//! - **Selection**: zygote viability against element load

pub mod recombination;
pub mod selection;
pub mod transposition;

pub use recombination::RecombinationModel;
pub use selection::{FitnessConfig, IndividualFitness, LoadFitness};
pub use transposition::{LossModel, TranspositionModel};
