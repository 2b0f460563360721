//! Genome structures: chromosomes of insertion sites, haplotypes, and diploid
//! individuals.

mod chromosome;
mod haplotype;
mod individual;
mod locus;

pub use chromosome::Chromosome;
pub use haplotype::Haplotype;
pub use individual::Individual;
pub use locus::{LinkageGroup, Locus};
