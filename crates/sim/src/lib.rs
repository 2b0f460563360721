//! # Simulation Crate
//!
//! The `sim` crate provides the core logic of a transposable element
//! population simulation. Diploid individuals carry two linkage groups with
//! a fixed number of insertion sites per chromosome. Each generation is made
//! by sampling parents, building recombined gametes, optionally selecting
//! zygotes on their element load, and then applying element losses and
//! transpositions.

pub mod base;
pub mod errors;
pub mod evolution;
pub mod genome;
pub mod simulation;
pub mod storage;
pub mod prelude;

pub use genome::{Chromosome, Individual};
pub use simulation::{Configuration, Population, Simulation};
