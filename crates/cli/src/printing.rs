use std::path::Path;
use transposim_sim::simulation::{Configuration, RunSummary, SimulationStatus};
use transposim_sim::storage::RecorderStats;

pub fn print_parameters(config: &Configuration) {
    let exec = &config.execution;
    let genome = &config.genome;
    let transposition = &config.evolution.transposition;
    let recombination = &config.evolution.recombination;
    let fitness = &config.evolution.fitness;

    println!("\n📋 Simulation Configuration");
    println!("  • Simulations: {} [-s, --simulations]", exec.replicates);
    println!("  • Diploids: {} [-n, --diploids]", exec.population_size);
    println!("  • Generations: {} [-g, --generations]", exec.total_generations);
    println!("  • Random Seed: {} [-r, --seed]", exec.seed);
    if exec.independent_streams {
        println!("  • Random Streams: one per simulation [--independent-streams]");
    } else {
        println!("  • Random Streams: shared by all simulations");
    }

    println!("\n🧬 Genome Structure");
    println!("  • Linkage Groups: 2 (diploid, 4 chromosomes per individual)");
    println!(
        "  • Sites per Chromosome: {} [-c, --sites]",
        genome.sites_per_chromosome
    );
    println!(
        "  • Initial TEs per Individual: {} [-i, --initial-tes]",
        genome.initial_elements
    );

    println!("\n⚡ Transposition Parameters");
    println!(
        "  • Base Rate (p0): {} [-t, --transposition]",
        transposition.transposition.rate()
    );
    println!(
        "  • Regulation (k): {} [-k, --regulation]",
        transposition.transposition.regulation()
    );
    println!("  • Loss Rate: {} [-l, --loss]", transposition.loss.rate());

    println!("\n🔀 Recombination Parameters");
    println!(
        "  • Map Distance: {} expected crossovers per chromosome pair and meiosis [-d, --map-distance]",
        recombination.params.map_distance()
    );

    println!("\n🎯 Fitness & Selection");
    if fitness.is_neutral() {
        println!("  • Regime: Neutral Evolution (No Selection) [-S, --selection]");
    } else {
        println!("  • Regime: Zygote Selection [-S, --selection]");
        println!(
            "    - Fitness: 1 - {} × load^{} [-m, -e]",
            fitness.function.multiplier, fitness.function.exponent
        );
    }
    println!();
}

pub fn print_summary(summaries: &[RunSummary], stats: &RecorderStats, output: &Path) {
    println!("\n✓ Simulation complete!");
    for s in summaries {
        let status = match s.status {
            SimulationStatus::ExtinctEarly => "no TE left",
            SimulationStatus::Completed => "completed",
            SimulationStatus::Running | SimulationStatus::Initialized => "interrupted",
        };
        println!(
            "  • Simulation {}: {} after {} generations, {} TEs",
            s.replicate, status, s.generations_run, s.final_load
        );
    }
    println!(
        "  Rows written: {} to {}",
        stats.rows_written,
        output.display()
    );
}
