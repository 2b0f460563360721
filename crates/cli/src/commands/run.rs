use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::path::Path;
use std::time::SystemTime;
use transposim_sim::simulation::{Configuration, run_replicates_with};
use transposim_sim::storage::TsvRecorder;

use crate::printing::{print_parameters, print_summary};

/// Run every simulation of `config` and write the statistics table to `output`.
pub fn run_simulation(config: &Configuration, output: &Path, show_progress: bool) -> Result<()> {
    println!("🧬 Transposim - Running Simulation");
    println!("============================================");
    print_parameters(config);

    let start = SystemTime::now();
    let mut recorder = TsvRecorder::create(output)
        .with_context(|| format!("Failed to create output file {}", output.display()))?;
    recorder
        .write_prologue(config)
        .context("Failed to write the parameters")?;
    recorder.write_header().context("Failed to write the header")?;

    let exec = &config.execution;
    // Generation 0 is recorded too.
    let total_rows = exec.replicates * (exec.total_generations + 1);
    let pb = if show_progress {
        let pb = ProgressBar::new(total_rows as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {per_sec}",
                )
                .context("Invalid progress bar template")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    info!(
        "running {} simulation(s) of {} generations",
        exec.replicates, exec.total_generations
    );
    let summaries = run_replicates_with(config, &mut recorder, |_| {
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    })
    .context("Simulation aborted")?;

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    recorder
        .write_epilogue(start, SystemTime::now())
        .context("Failed to write the run times")?;
    let stats = recorder.stats().clone();
    recorder
        .finish()
        .with_context(|| format!("Failed to flush {}", output.display()))?;

    print_summary(&summaries, &stats, output);
    Ok(())
}
