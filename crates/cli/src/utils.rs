use std::io::{self, Write};

use cellevo_sim::simulation::{MaterializedChromosome, MaterializedGenome};

use crate::defaults::FASTA_WIDTH;

/// Record name for one chromosome of a reconstructed cell.
pub fn record_name(genome: &MaterializedGenome, chr: &MaterializedChromosome) -> String {
    format!("gen{}_{}_chr{}", genome.generation, genome.path, chr.id)
}

/// Write every chromosome of `genomes` as FASTA records.
pub fn write_fasta<W: Write>(out: &mut W, genomes: &[MaterializedGenome]) -> io::Result<()> {
    for genome in genomes {
        for chr in &genome.chromosomes {
            writeln!(out, ">{}", record_name(genome, chr))?;
            let text = chr.sequence.to_string();
            for line in text.as_bytes().chunks(FASTA_WIDTH) {
                out.write_all(line)?;
                out.write_all(b"\n")?;
            }
        }
    }
    Ok(())
}

/// Write overlap tracks as TSV, one row per chromosome: record name, then
/// one count per base. Chromosomes without a track are skipped.
pub fn write_overlaps<W: Write>(out: &mut W, genomes: &[MaterializedGenome]) -> io::Result<usize> {
    let mut rows = 0;
    for genome in genomes {
        for chr in &genome.chromosomes {
            if let Some(track) = &chr.overlaps {
                writeln!(out, "{}\t{track}", record_name(genome, chr))?;
                rows += 1;
            }
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellevo_sim::base::Nucleotide;
    use cellevo_sim::simulation::SimulationBuilder;

    fn genomes() -> Vec<MaterializedGenome> {
        let sim = SimulationBuilder::new()
            .generations(1)
            .average_events(0.0)
            .uniform_reference(Nucleotide::C, vec![130, 5])
            .track_overlaps(true)
            .seed(1)
            .build()
            .unwrap();
        let tree = sim.grow().unwrap();
        sim.reconstructor().materialize(&tree, 1).unwrap()
    }

    #[test]
    fn test_fasta_layout() {
        let mut buf = Vec::new();
        write_fasta(&mut buf, &genomes()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ">gen1_L_chr1");
        assert_eq!(lines[1].len(), 60);
        assert_eq!(lines[3].len(), 10);
        assert_eq!(lines[4], ">gen1_L_chr2");
        assert_eq!(lines[5], "CCCCC");
        assert!(text.contains(">gen1_R_chr2\nCCCCC\n"));
    }

    #[test]
    fn test_overlap_rows() {
        let mut buf = Vec::new();
        let rows = write_overlaps(&mut buf, &genomes()).unwrap();
        assert_eq!(rows, 4);
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("gen1_R_chr2\t0\t0\t0\t0\t0\n"));
    }
}
