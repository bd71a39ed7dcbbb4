use anyhow::{Context, Result};
use cellevo_sim::simulation::{LengthStatistics, Simulation};
use serde::Serialize;

use super::{load_config, spinner};
use crate::args::{OutputFormat, RunArgs};
use crate::printing::{print_parameters, print_statistics};

/// JSON report of a run.
#[derive(Serialize)]
struct RunReport<'a> {
    seed: Option<u64>,
    generations: usize,
    cell_count: usize,
    event_count: usize,
    events_per_generation: Vec<usize>,
    statistics: &'a LengthStatistics,
}

pub fn run_simulation(args: &RunArgs) -> Result<()> {
    let config = load_config(&args.config, args.seed)?;
    let pretty = args.format == OutputFormat::Pretty;

    if pretty {
        println!("🧬 Cellevo - Growing Lineage");
        println!("============================================");
        print_parameters(&config);
    }

    let sim = Simulation::from_config(config).context("Failed to set up simulation")?;
    let pb = spinner("Growing lineage tree...", pretty && !args.no_progress)?;
    let outcome = sim.run();
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let outcome = outcome.context("Simulation failed")?;

    match args.format {
        OutputFormat::Pretty => {
            print_statistics(&outcome.tree, &outcome.statistics);
            println!("✓ Simulation complete!");
        }
        OutputFormat::Json => {
            let report = RunReport {
                seed: sim.config().execution.seed,
                generations: outcome.tree.generations(),
                cell_count: outcome.tree.node_count(),
                event_count: outcome.tree.event_count(),
                events_per_generation: outcome.tree.events_per_generation(),
                statistics: &outcome.statistics,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to encode report")?
            );
        }
    }
    Ok(())
}
