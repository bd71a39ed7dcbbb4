use anyhow::{Context, Result};
use cellevo_sim::evolution::{
    EventCountDistribution, EventTable, LengthDistribution, LengthSamplers,
};
use cellevo_sim::simulation::{
    Configuration, EvolutionConfig, ExecutionConfig, ReferenceConfig,
};

use crate::args::{InitArgs, LengthKind, ReferenceKind};
use crate::printing::print_parameters;

pub fn init_simulation(args: &InitArgs) -> Result<()> {
    println!("🧬 Cellevo - Cell Lineage Simulator");
    println!("============================================\n");
    println!("Initializing configuration: {}", args.output.display());

    let config = build_config(args)?;
    print_parameters(&config);

    config
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    println!("✓ Configuration initialized successfully!");
    println!("\nNext steps:");
    println!("  cellevo run -c {}", args.output.display());
    println!(
        "  cellevo reconstruct -c {} --leaf 0 -o leaf0.fasta",
        args.output.display()
    );
    Ok(())
}

/// Translate command line options into a validated configuration.
pub fn build_config(args: &InitArgs) -> Result<Configuration> {
    let event_table = match &args.event_weights {
        Some(weights) => EventTable::from_weights(weights).context("Invalid event weights")?,
        None => EventTable::uniform(),
    };
    let distribution = match args.length_distribution {
        LengthKind::Uniform => LengthDistribution::Uniform,
        LengthKind::Exponential => LengthDistribution::TruncatedExponential {
            rate: args.length_rate,
        },
        LengthKind::LogUniform => LengthDistribution::LogUniform,
    };
    let event_count = if args.fixed_events {
        EventCountDistribution::Fixed
    } else {
        EventCountDistribution::Poisson
    };

    let reference = match &args.fasta {
        Some(path) => ReferenceConfig::Fasta { path: path.clone() },
        None => {
            let lengths = args
                .lengths
                .clone()
                .unwrap_or_else(|| vec![args.chromosome_length; args.chromosomes]);
            match args.reference {
                ReferenceKind::Uniform => ReferenceConfig::Uniform {
                    base: args.base,
                    lengths,
                },
                ReferenceKind::Random => ReferenceConfig::Random { lengths },
            }
        }
    };

    let config = Configuration {
        execution: ExecutionConfig {
            generations: args.generations,
            seed: args.seed,
            track_overlaps: args.track_overlaps,
            parallel_depth: args.parallel_depth,
        },
        evolution: EvolutionConfig {
            average_events: args.average_events,
            event_count,
            event_table,
            lengths: LengthSamplers::all(distribution),
        },
        reference,
    };
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
