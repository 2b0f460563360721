//! Storage module for persisting simulation data.
//!
//! This module turns each generation into a row of summary statistics and
//! writes the rows, framed by the run parameters, as a TSV file.

mod recorder;
pub mod types;

pub use recorder::{
    format_elapsed, format_row, format_significant, format_timestamp, prologue_entries, Recorder,
    RecorderStats, TsvRecorder, FILLED_COLUMNS,
};
pub use types::{GenerationStats, COLUMNS};
