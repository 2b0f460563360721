//! Running every replicate of a configuration.
//!
//! By default all replicates draw from one random stream, in order: replicate
//! `r + 1` starts where replicate `r` stopped. With independent streams each
//! replicate gets its own generator, obtained by jumping the seeded one, and
//! replicates run in parallel. Rows always reach the recorder in replicate
//! order.

use crate::errors::RunError;
use crate::simulation::{Configuration, RunSummary, Simulation};
use crate::storage::{GenerationStats, Recorder};
use log::info;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

/// One generator per replicate, each `2^128` draws apart.
pub fn replicate_streams(seed: u64, count: usize) -> Vec<Xoshiro256PlusPlus> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut streams = Vec::with_capacity(count);
    for _ in 0..count {
        streams.push(rng.clone());
        rng.jump();
    }
    streams
}

/// Run all replicates of `config`, sending every row to `recorder`.
pub fn run_replicates<Rec: Recorder + ?Sized>(
    config: &Configuration,
    recorder: &mut Rec,
) -> Result<Vec<RunSummary>, RunError> {
    run_replicates_with(config, recorder, |_| {})
}

/// Like [`run_replicates`], calling `on_generation` for every generation of
/// every replicate as soon as it is computed.
///
/// With independent streams the callback may be called from several threads.
pub fn run_replicates_with<Rec, F>(
    config: &Configuration,
    recorder: &mut Rec,
    on_generation: F,
) -> Result<Vec<RunSummary>, RunError>
where
    Rec: Recorder + ?Sized,
    F: Fn(&GenerationStats) + Sync,
{
    config.validate()?;
    let summaries = if config.execution.independent_streams {
        run_independent(config, recorder, &on_generation)?
    } else {
        run_shared(config, recorder, &on_generation)?
    };
    for s in &summaries {
        info!(
            "replicate {}: {:?} after {} generations, {} TEs left",
            s.replicate, s.status, s.generations_run, s.final_load
        );
    }
    Ok(summaries)
}

fn run_shared<Rec, F>(
    config: &Configuration,
    recorder: &mut Rec,
    on_generation: &F,
) -> Result<Vec<RunSummary>, RunError>
where
    Rec: Recorder + ?Sized,
    F: Fn(&GenerationStats) + Sync,
{
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(config.execution.seed);
    let mut summaries = Vec::with_capacity(config.execution.replicates);
    for replicate in 1..=config.execution.replicates {
        let mut sim = Simulation::new(config, replicate, rng)?;
        summaries.push(sim.run_with(recorder, on_generation)?);
        rng = sim.into_rng();
    }
    Ok(summaries)
}

fn run_independent<Rec, F>(
    config: &Configuration,
    recorder: &mut Rec,
    on_generation: &F,
) -> Result<Vec<RunSummary>, RunError>
where
    Rec: Recorder + ?Sized,
    F: Fn(&GenerationStats) + Sync,
{
    let streams = replicate_streams(config.execution.seed, config.execution.replicates);
    let results = streams
        .into_par_iter()
        .enumerate()
        .map(|(i, rng)| -> Result<_, RunError> {
            let mut sim = Simulation::new(config, i + 1, rng)?;
            let mut rows: Vec<GenerationStats> = Vec::new();
            let summary = sim.run_with(&mut rows, on_generation)?;
            Ok((rows, summary))
        })
        .collect::<Result<Vec<_>, RunError>>()?;

    let mut summaries = Vec::with_capacity(results.len());
    for (rows, summary) in results {
        for row in &rows {
            recorder.record(row)?;
        }
        summaries.push(summary);
    }
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{SimulationBuilder, SimulationStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn config(replicates: usize, independent: bool) -> Configuration {
        SimulationBuilder::new()
            .population_size(15)
            .generations(6)
            .sites_per_chromosome(20)
            .initial_elements(8)
            .replicates(replicates)
            .independent_streams(independent)
            .build_configuration()
            .unwrap()
    }

    #[test]
    fn test_streams_differ() {
        let streams = replicate_streams(7, 3);
        assert_eq!(streams.len(), 3);
        assert_ne!(streams[0], streams[1]);
        assert_ne!(streams[1], streams[2]);
        assert_eq!(streams, replicate_streams(7, 3));
    }

    #[test]
    fn test_shared_stream_rows_in_order() {
        let mut rows: Vec<GenerationStats> = Vec::new();
        let summaries = run_replicates(&config(3, false), &mut rows).unwrap();
        assert_eq!(summaries.len(), 3);
        assert!(summaries
            .iter()
            .all(|s| s.status == SimulationStatus::Completed || s.status == SimulationStatus::ExtinctEarly));
        let replicates: Vec<usize> = rows.iter().map(|r| r.replicate).collect();
        let mut sorted = replicates.clone();
        sorted.sort();
        assert_eq!(replicates, sorted);
        assert_eq!(rows[0].generation, 0);
    }

    #[test]
    fn test_shared_stream_continues() {
        // The second replicate does not restart the stream.
        let mut rows: Vec<GenerationStats> = Vec::new();
        run_replicates(&config(2, false), &mut rows).unwrap();
        let first: Vec<_> = rows.iter().filter(|r| r.replicate == 1).collect();
        let second: Vec<_> = rows.iter().filter(|r| r.replicate == 2).collect();
        assert_ne!(
            first.iter().map(|r| r.total).collect::<Vec<_>>(),
            second.iter().map(|r| r.total).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_independent_streams_reproducible() {
        let c = config(4, true);
        let mut a: Vec<GenerationStats> = Vec::new();
        let mut b: Vec<GenerationStats> = Vec::new();
        run_replicates(&c, &mut a).unwrap();
        run_replicates(&c, &mut b).unwrap();
        assert_eq!(a, b);
        let replicates: Vec<usize> = a.iter().map(|r| r.replicate).collect();
        let mut sorted = replicates.clone();
        sorted.sort();
        assert_eq!(replicates, sorted);
    }

    #[test]
    fn test_callback_sees_every_row() {
        let count = AtomicUsize::new(0);
        let mut rows: Vec<GenerationStats> = Vec::new();
        run_replicates_with(&config(2, true), &mut rows, |_| {
            count.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
        assert_eq!(count.load(Ordering::Relaxed), rows.len());
    }

    #[test]
    fn test_invalid_configuration() {
        let mut c = config(1, false);
        c.execution.replicates = 0;
        let mut rows: Vec<GenerationStats> = Vec::new();
        assert!(matches!(
            run_replicates(&c, &mut rows),
            Err(RunError::Config(_))
        ));
    }
}
