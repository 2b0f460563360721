//! Tab-separated recording of per-generation statistics.
//!
//! A run produces one file made of a `#key=value` prologue listing every
//! parameter, a header line, one row per (replicate, generation), and an
//! epilogue with the start and end times of the run.

use crate::errors::RecorderError;
use crate::simulation::Configuration;
use crate::storage::types::{GenerationStats, COLUMNS};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const SEP: &str = "\t";

/// Number of leading columns actually filled in each row.
pub const FILLED_COLUMNS: usize = 12;

/// Sink for generation statistics.
pub trait Recorder {
    /// Record one row.
    fn record(&mut self, stats: &GenerationStats) -> Result<(), RecorderError>;
}

/// Keeps rows in memory, in recording order.
impl Recorder for Vec<GenerationStats> {
    fn record(&mut self, stats: &GenerationStats) -> Result<(), RecorderError> {
        self.push(stats.clone());
        Ok(())
    }
}

/// Counters about what a recorder has written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecorderStats {
    /// Number of data rows written
    pub rows_written: usize,
    /// Number of comment lines written (prologue and epilogue)
    pub comment_lines: usize,
}

/// Writes the statistics table as TSV.
#[derive(Debug)]
pub struct TsvRecorder<W: Write> {
    writer: W,
    stats: RecorderStats,
}

impl TsvRecorder<BufWriter<File>> {
    /// Create (or truncate) the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, RecorderError> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> TsvRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            stats: RecorderStats::default(),
        }
    }

    /// What has been written so far.
    pub fn stats(&self) -> &RecorderStats {
        &self.stats
    }

    /// Write one `#key=value` line per parameter.
    pub fn write_prologue(&mut self, config: &Configuration) -> Result<(), RecorderError> {
        for (key, value) in prologue_entries(config) {
            writeln!(self.writer, "#{key}={value}")?;
            self.stats.comment_lines += 1;
        }
        Ok(())
    }

    /// Write the column names.
    pub fn write_header(&mut self) -> Result<(), RecorderError> {
        writeln!(self.writer, "{}", COLUMNS.join(SEP))?;
        Ok(())
    }

    /// Write the start and end times of the run and the elapsed wall time.
    ///
    /// Times are written in UTC, in the `ctime` layout.
    pub fn write_epilogue(&mut self, start: SystemTime, end: SystemTime) -> Result<(), RecorderError> {
        let elapsed = end.duration_since(start).unwrap_or(Duration::ZERO);
        writeln!(self.writer, "#startTime: {}", format_timestamp(start))?;
        writeln!(self.writer, "#endTime: {}", format_timestamp(end))?;
        writeln!(self.writer, "#elapsed time: {}", format_elapsed(elapsed))?;
        self.stats.comment_lines += 3;
        Ok(())
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> Result<W, RecorderError> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> Recorder for TsvRecorder<W> {
    fn record(&mut self, stats: &GenerationStats) -> Result<(), RecorderError> {
        writeln!(self.writer, "{}", format_row(stats))?;
        self.stats.rows_written += 1;
        Ok(())
    }
}

/// Parameter names and values, in prologue order.
pub fn prologue_entries(config: &Configuration) -> Vec<(&'static str, String)> {
    let exec = &config.execution;
    let evo = &config.evolution;
    vec![
        ("nbSimu", exec.replicates.to_string()),
        ("nbDiploids", exec.population_size.to_string()),
        ("nbGen", exec.total_generations.to_string()),
        ("nbSitesPerChr", config.genome.sites_per_chromosome.to_string()),
        ("initNbTEsPerInd", config.genome.initial_elements.to_string()),
        ("probTransp0", evo.transposition.transposition.rate().to_string()),
        ("k", evo.transposition.transposition.regulation().to_string()),
        ("probLoss", evo.transposition.loss.rate().to_string()),
        ("totalMapDist", evo.recombination.params.map_distance().to_string()),
        ("zygoteSelection", evo.fitness.zygote_selection.to_string()),
        ("selMult", evo.fitness.function.multiplier.to_string()),
        ("selExp", evo.fitness.function.exponent.to_string()),
        ("seed", exec.seed.to_string()),
    ]
}

/// One data row: the first twelve columns, tab-separated.
pub fn format_row(s: &GenerationStats) -> String {
    let fields = [
        s.replicate.to_string(),
        s.generation.to_string(),
        s.total.to_string(),
        format_significant(s.mean),
        format_significant(s.variance),
        format_significant(s.std_dev),
        s.min.to_string(),
        format_significant(s.q25),
        format_significant(s.median),
        format_significant(s.q75),
        s.max.to_string(),
        format_significant(s.prop_empty_loci),
    ];
    debug_assert_eq!(fields.len(), FILLED_COLUMNS);
    fields.join(SEP)
}

/// Format with three significant digits, trailing zeros removed, switching to
/// exponent notation for very small or large magnitudes (like C's `%.3g`).
pub fn format_significant(x: f64) -> String {
    const DIGITS: i32 = 3;
    if x == 0.0 {
        return "0".to_string();
    }
    if !x.is_finite() {
        return x.to_string();
    }
    // Exponent after rounding to the requested precision.
    let sci = format!("{:.*e}", (DIGITS - 1) as usize, x);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= DIGITS {
        let mantissa = trim_fraction(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    } else {
        let decimals = (DIGITS - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{x:.decimals$}")).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// `HHh MMm SSs`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!(
        "{:02}h {:02}m {:02}s",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

/// Render a time as `Thu Jan  1 00:16:40 1970`, in UTC.
///
/// Times before the Unix epoch are rendered as the epoch.
pub fn format_timestamp(time: SystemTime) -> String {
    const WEEKDAYS: [&str; 7] = ["Thu", "Fri", "Sat", "Sun", "Mon", "Tue", "Wed"];
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];

    let secs = time.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
    let days = secs / 86_400;
    let of_day = secs % 86_400;

    // Civil date from a day count, with years starting on March 1st.
    let z = days + 719_468;
    let era = z / 146_097;
    let doe = z % 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + u64::from(month <= 2);

    format!(
        "{} {} {:>2} {:02}:{:02}:{:02} {}",
        WEEKDAYS[(days % 7) as usize],
        MONTHS[(month - 1) as usize],
        day,
        of_day / 3600,
        (of_day % 3600) / 60,
        of_day % 60,
        year
    )
}
