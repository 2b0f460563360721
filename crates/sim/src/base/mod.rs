//! Base utilities: random draw helpers and descriptive statistics.

pub mod random;
pub mod stats;
