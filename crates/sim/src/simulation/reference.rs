//! Reference genome tables: the founder's chromosome sequences.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use rand::Rng;

use crate::base::{Nucleotide, Sequence};
use crate::errors::{Result, SimulationError};
use crate::genome::{Chromosome, ChromosomeId, Dna};

/// Ordered chromosome sequences; chromosome `i + 1` is entry `i`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceTable {
    sequences: Vec<Sequence>,
}

impl ReferenceTable {
    /// Build from sequences in id order. Every sequence must be non-empty.
    pub fn new(sequences: Vec<Sequence>) -> Result<Self> {
        if sequences.is_empty() {
            return Err(SimulationError::Reference(
                "reference table has no chromosomes".into(),
            ));
        }
        if let Some(i) = sequences.iter().position(Sequence::is_empty) {
            return Err(SimulationError::Reference(format!(
                "chromosome {} has an empty sequence",
                i + 1
            )));
        }
        Ok(Self { sequences })
    }

    /// One chromosome per entry of `lengths`, every base set to `base`.
    pub fn uniform(base: Nucleotide, lengths: &[usize]) -> Result<Self> {
        Self::new(lengths.iter().map(|&len| Sequence::uniform(base, len)).collect())
    }

    /// One chromosome per entry of `lengths`, bases drawn uniformly.
    pub fn random<R: Rng + ?Sized>(lengths: &[usize], rng: &mut R) -> Result<Self> {
        Self::new(lengths.iter().map(|&len| Sequence::random(len, rng)).collect())
    }

    /// Build from `(id, sequence)` pairs. Ids must run `1, 2, ..., N` in
    /// order.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (ChromosomeId, S)>,
        S: AsRef<str>,
    {
        let mut sequences = Vec::new();
        for (i, (id, text)) in pairs.into_iter().enumerate() {
            if id != i + 1 {
                return Err(SimulationError::Reference(format!(
                    "expected chromosome id {}, found {id}",
                    i + 1
                )));
            }
            let seq = Sequence::from_str(text.as_ref()).map_err(|e| {
                SimulationError::Reference(format!("chromosome {id}: {e}"))
            })?;
            sequences.push(seq);
        }
        Self::new(sequences)
    }

    /// Read a FASTA file: one record per chromosome, in id order.
    pub fn from_fasta_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_fasta(BufReader::new(file))
    }

    /// Parse FASTA records from `reader`. Headers are ignored beyond
    /// separating records.
    pub fn from_fasta<R: BufRead>(reader: R) -> Result<Self> {
        let records = parse_fasta(reader)?;
        Self::from_pairs(
            records
                .into_iter()
                .enumerate()
                .map(|(i, (_, seq))| (i + 1, seq)),
        )
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    pub fn get(&self, id: ChromosomeId) -> Option<&Sequence> {
        id.checked_sub(1).and_then(|i| self.sequences.get(i))
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn lengths(&self) -> Vec<usize> {
        self.sequences.iter().map(Sequence::len).collect()
    }

    /// The founder's abstract genome.
    pub fn abstract_dna(&self) -> Result<Dna> {
        Dna::from_lengths(&self.lengths())
    }

    /// A genome with every chromosome materialized from this table.
    pub fn materialized_dna(&self) -> Result<Dna> {
        let chromosomes = self
            .sequences
            .iter()
            .enumerate()
            .map(|(i, seq)| Chromosome::with_sequence(i + 1, seq.clone()))
            .collect::<Result<Vec<_>>>()?;
        Dna::from_chromosomes(chromosomes)
    }
}

/// Parse FASTA records into `(header, sequence)` pairs.
///
/// Blank lines are skipped and sequence lines are concatenated. A record
/// without sequence data is an error, as is a file with no records.
pub fn parse_fasta<R: BufRead>(reader: R) -> Result<Vec<(String, String)>> {
    let mut records = Vec::new();
    let mut current: Option<(String, String)> = None;

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('>') {
            if let Some(record) = current.take() {
                records.push(finish_record(record)?);
            }
            let name = header.split_whitespace().next().unwrap_or_default();
            current = Some((name.to_string(), String::new()));
        } else {
            match current.as_mut() {
                Some((_, seq)) => seq.push_str(line),
                None => {
                    return Err(SimulationError::Reference(
                        "sequence data before the first FASTA header".into(),
                    ))
                }
            }
        }
    }
    if let Some(record) = current {
        records.push(finish_record(record)?);
    }

    if records.is_empty() {
        return Err(SimulationError::Reference(
            "no sequences found in FASTA input".into(),
        ));
    }
    Ok(records)
}

fn finish_record((name, seq): (String, String)) -> Result<(String, String)> {
    if seq.is_empty() {
        return Err(SimulationError::Reference(format!(
            "FASTA record '{name}' has no sequence"
        )));
    }
    Ok((name, seq))
}
