use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use cellevo_sim::simulation::{LineagePath, MaterializedGenome, Simulation};

use super::{load_config, spinner};
use crate::args::ReconstructArgs;
use crate::utils::{write_fasta, write_overlaps};

/// Grow the configured lineage and write the requested cells as FASTA.
///
/// Status goes to stderr so FASTA can be piped from stdout.
pub fn reconstruct(args: &ReconstructArgs) -> Result<()> {
    let config = load_config(&args.config, args.seed)?;
    if config.execution.seed.is_none() {
        log::warn!("no seed configured; this lineage cannot be grown again");
    }
    let track_overlaps = args.overlaps.is_some() || config.execution.track_overlaps;
    let sim = Simulation::from_config(config).context("Failed to set up simulation")?;

    let pb = spinner("Growing lineage tree...", true)?;
    let tree = sim.grow();
    if let Some(pb) = &pb {
        pb.set_message("Replaying events...");
    }
    let genomes = tree.and_then(|tree| {
        let reconstructor = sim
            .reconstructor()
            .with_salt(args.salt)
            .with_overlaps(track_overlaps);
        match args.generation {
            Some(generation) => reconstructor.materialize(&tree, generation),
            None => {
                let path = target_path(args, tree.generations())?;
                Ok(vec![reconstructor.materialize_path(&tree, &path)?])
            }
        }
    });
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let genomes = genomes.context("Reconstruction failed")?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let mut out = BufWriter::new(file);
            write_fasta(&mut out, &genomes)
                .and_then(|_| out.flush())
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "✓ Wrote {} genome(s) to {}",
                genomes.len(),
                path.display()
            );
        }
        None => {
            let mut out = io::stdout().lock();
            write_fasta(&mut out, &genomes).context("Failed to write FASTA to stdout")?;
        }
    }

    if let Some(path) = &args.overlaps {
        write_overlap_file(path, &genomes)?;
    }
    Ok(())
}

fn target_path(
    args: &ReconstructArgs,
    generations: usize,
) -> cellevo_sim::Result<LineagePath> {
    match (&args.path, args.leaf) {
        (Some(text), _) => text.parse(),
        (None, Some(leaf)) => LineagePath::from_leaf_index(leaf, generations),
        // clap requires one target
        (None, None) => Ok(LineagePath::root()),
    }
}

fn write_overlap_file(path: &std::path::Path, genomes: &[MaterializedGenome]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    let rows = write_overlaps(&mut out, genomes)
        .and_then(|rows| out.flush().map(|_| rows))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    eprintln!("✓ Wrote {rows} overlap track(s) to {}", path.display());
    Ok(())
}
