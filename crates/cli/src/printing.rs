use cellevo_sim::evolution::{EventCountDistribution, EventKind, LengthDistribution};
use cellevo_sim::simulation::{Configuration, LengthStatistics, LineageTree, ReferenceConfig};

pub fn print_parameters(config: &Configuration) {
    let execution = &config.execution;
    let evolution = &config.evolution;

    println!("\n📋 Simulation Configuration");
    println!(
        "  • Generations: {} ({} leaves) [-g, --generations]",
        execution.generations,
        1u64 << execution.generations
    );
    if let Some(seed) = execution.seed {
        println!("  • Random Seed: {seed} [--seed]");
    } else {
        println!("  • Random Seed: Random [--seed]");
    }
    println!(
        "  • Overlap Tracking: {} [--track-overlaps]",
        if execution.track_overlaps { "On" } else { "Off" }
    );
    println!("  • Parallel Depth: {} [--parallel-depth]", execution.parallel_depth);

    println!("\n🧬 Founder Reference");
    match &config.reference {
        ReferenceConfig::Uniform { base, lengths } => {
            println!("  • Source: Uniform ({base})");
            print_lengths(lengths);
        }
        ReferenceConfig::Random { lengths } => {
            println!("  • Source: Random bases");
            print_lengths(lengths);
        }
        ReferenceConfig::Fasta { path } => {
            println!("  • Source: FASTA {}", path.display());
        }
    }

    println!("\n⚡ Event Model");
    let count = match evolution.event_count {
        EventCountDistribution::Poisson => "Poisson",
        EventCountDistribution::Fixed => "Fixed",
    };
    println!(
        "  • Events per Division: {:.2} ({count}) [-e, --average-events]",
        evolution.average_events
    );
    for kind in EventKind::ALL {
        let probability = evolution.event_table.probability(kind);
        match evolution.lengths.for_kind(kind) {
            Some(dist) => println!(
                "    - {:<26} {:>6.3}  runs: {}",
                kind.name(),
                probability,
                describe_length(dist)
            ),
            None => println!("    - {:<26} {:>6.3}", kind.name(), probability),
        }
    }
    println!();
}

fn print_lengths(lengths: &[usize]) {
    let total: usize = lengths.iter().sum();
    println!("  • Chromosomes: {}", lengths.len());
    println!("  • Total Length: {total} bp");
}

fn describe_length(dist: &LengthDistribution) -> String {
    match dist {
        LengthDistribution::Uniform => "uniform".to_string(),
        LengthDistribution::TruncatedExponential { rate } => format!("exponential (rate {rate})"),
        LengthDistribution::LogUniform => "log-uniform".to_string(),
    }
}

pub fn print_statistics(tree: &LineageTree, stats: &LengthStatistics) {
    println!("\n📊 Lineage Summary");
    println!("  • Leaves: {}", stats.leaf_count);
    println!("  • Total Cells: {}", tree.node_count());
    println!("  • Recorded Events: {}", tree.event_count());
    println!("  • Mean Genome Length: {:.2} bp", stats.mean_genome_length);

    println!("\n  Chromosome    Mean Length      Std Dev");
    for (i, (mean, sd)) in stats
        .mean_chromosome_length
        .iter()
        .zip(&stats.stddev_chromosome_length)
        .enumerate()
    {
        println!("  chr{:<9} {:>12.2} {:>12.2}", i + 1, mean, sd);
    }
    println!();
}
