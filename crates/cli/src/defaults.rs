//! Default values of the command-line parameters.
//! The classic parameter set: ten diploids with 31 sites per chromosome.

pub const SIMULATIONS: usize = 1;
pub const DIPLOIDS: usize = 10;
pub const GENERATIONS: usize = 10;
pub const SITES_PER_CHROMOSOME: usize = 31;
pub const INITIAL_TES: usize = 10;

// Transposition and loss
pub const TRANSPOSITION_RATE: f64 = 0.01;
pub const REGULATION: f64 = 0.05;
pub const LOSS_RATE: f64 = 0.005;

// Recombination: expected crossovers per chromosome pair and meiosis
pub const MAP_DISTANCE: f64 = 90.0;

// Selection: fitness = 1 - multiplier * load^exponent
pub const SEL_MULTIPLIER: f64 = 0.001;
pub const SEL_EXPONENT: f64 = 1.5;

pub const SEED: u64 = 1859;
pub const OUTPUT: &str = "data.tsv";
