//! End-to-end runs: configuration, replicates and the TSV file.

use transposim_sim::errors::{RunError, SimulationError};
use transposim_sim::evolution::{FitnessConfig, LoadFitness};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use transposim_sim::genome::Individual;
use transposim_sim::simulation::{
    Configuration, Simulation, SimulationBuilder, SimulationStatus, run_replicates,
};
use transposim_sim::storage::{COLUMNS, FILLED_COLUMNS, GenerationStats, Recorder, TsvRecorder};
use std::time::SystemTime;

fn classic() -> SimulationBuilder {
    SimulationBuilder::new()
        .population_size(10)
        .generations(10)
        .sites_per_chromosome(31)
        .initial_elements(10)
}

fn write_run(config: &Configuration, path: &std::path::Path) -> Result<(), RunError> {
    let start = SystemTime::now();
    let mut recorder = TsvRecorder::create(path)?;
    recorder.write_prologue(config)?;
    recorder.write_header()?;
    run_replicates(config, &mut recorder)?;
    recorder.write_epilogue(start, SystemTime::now())?;
    recorder.finish()?;
    Ok(())
}

#[test]
fn test_tsv_file_layout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.tsv");
    let config = classic().replicates(2).build_configuration().unwrap();
    write_run(&config, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    let prologue: Vec<&str> = lines.iter().take_while(|l| l.starts_with('#')).copied().collect();
    assert_eq!(prologue.len(), 13);
    assert_eq!(prologue[0], "#nbSimu=2");
    assert_eq!(lines[13], COLUMNS.join("\t"));

    let rows: Vec<&str> = lines[14..]
        .iter()
        .filter(|l| !l.starts_with('#'))
        .copied()
        .collect();
    // Two replicates of generations 0..=10, unless one went extinct.
    assert!(rows.len() <= 22);
    assert!(rows.iter().all(|r| r.split('\t').count() == FILLED_COLUMNS));
    assert!(rows[0].starts_with("1\t0\t"));

    let epilogue: Vec<&str> = lines.iter().rev().take(3).copied().collect();
    assert!(epilogue[0].starts_with("#elapsed time: "));
    assert!(epilogue[1].starts_with("#endTime: "));
    assert!(epilogue[2].starts_with("#startTime: "));
}

#[test]
fn test_rerun_truncates_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.tsv");
    let config = classic().build_configuration().unwrap();
    write_run(&config, &path).unwrap();
    let first = std::fs::read_to_string(&path).unwrap();
    write_run(&config, &path).unwrap();
    let second = std::fs::read_to_string(&path).unwrap();
    assert_eq!(first.lines().count(), second.lines().count());
}

#[test]
fn test_population_size_is_preserved() {
    let mut sim = classic().population_size(25).generations(15).build().unwrap();
    while sim.generation() < sim.total_generations() {
        sim.step().unwrap();
        assert_eq!(sim.population().size(), 25);
    }
}

#[test]
fn test_statistics_stay_in_range() {
    let config = classic()
        .population_size(30)
        .generations(30)
        .transposition(0.05, 0.0)
        .fitness(FitnessConfig::new(LoadFitness::new(0.001, 1.5).unwrap()))
        .build_configuration()
        .unwrap();
    let mut rows: Vec<GenerationStats> = Vec::new();
    run_replicates(&config, &mut rows).unwrap();
    for row in &rows {
        assert!((0.0..=1.0).contains(&row.prop_empty_loci));
        assert!(row.min as f64 <= row.q25 && row.q25 <= row.median);
        assert!(row.median <= row.q75 && row.q75 <= row.max as f64);
        assert!((row.mean * 30.0 - row.total as f64).abs() < 1e-9);
    }
}

#[test]
fn test_strong_selection_exhausts_viability_budget() {
    // Every zygote carrying an element has fitness below zero.
    let result = classic()
        .initial_elements(40)
        .fitness(FitnessConfig::new(LoadFitness::new(10.0, 1.0).unwrap()))
        .max_viability_attempts(50)
        .build()
        .unwrap()
        .step();
    assert!(matches!(
        result,
        Err(SimulationError::ViabilityExhausted { attempts: 50 })
    ));
}

#[test]
fn test_extinct_replicate_is_reported() {
    let config = classic().build_configuration().unwrap();
    let individuals = vec![Individual::empty(31); 10];
    let rng = Xoshiro256PlusPlus::seed_from_u64(config.execution.seed);
    let mut sim = Simulation::from_individuals(&config, 1, individuals, rng).unwrap();
    let mut rows: Vec<GenerationStats> = Vec::new();
    let summary = sim.run(&mut rows).unwrap();
    assert_eq!(summary.status, SimulationStatus::ExtinctEarly);
    assert_eq!(summary.final_load, 0);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].prop_empty_loci, 1.0);
}

struct FailingRecorder;

impl Recorder for FailingRecorder {
    fn record(&mut self, _: &GenerationStats) -> Result<(), transposim_sim::errors::RecorderError> {
        Err(std::io::Error::other("disk full").into())
    }
}

#[test]
fn test_recorder_failure_stops_run() {
    let config = classic().build_configuration().unwrap();
    assert!(matches!(
        run_replicates(&config, &mut FailingRecorder),
        Err(RunError::Recorder(_))
    ));
}
