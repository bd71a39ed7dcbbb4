//! The event catalog.
//!
//! Each event has two appliers: `apply_abstract` updates chromosome lengths,
//! the active set and overlap tracks; `apply_concrete` performs the positional
//! splice on materialized sequences. Growth uses the former only, while
//! reconstruction replays both in lock-step.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::base::{Nucleotide, Sequence};
use crate::errors::{OutOfBounds, Result, SimulationError};
use crate::genome::{ChromosomeId, Dna};

/// The kinds of event, in the order used by the cumulative probability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Deletion,
    Insertion,
    Translocation,
    ReciprocalTranslocation,
    Duplication,
    PointInsertion,
    PointDeletion,
    PointReplacement,
}

impl EventKind {
    pub const COUNT: usize = 8;

    /// All kinds in table order.
    pub const ALL: [EventKind; Self::COUNT] = [
        Self::Deletion,
        Self::Insertion,
        Self::Translocation,
        Self::ReciprocalTranslocation,
        Self::Duplication,
        Self::PointInsertion,
        Self::PointDeletion,
        Self::PointReplacement,
    ];

    /// Position in `ALL`.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// True for single-base mutations.
    pub const fn is_mutation(self) -> bool {
        matches!(
            self,
            Self::PointInsertion | Self::PointDeletion | Self::PointReplacement
        )
    }

    /// True for multi-base rearrangements.
    pub const fn is_rearrangement(self) -> bool {
        !self.is_mutation()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Deletion => "Deletion",
            Self::Insertion => "Insertion",
            Self::Translocation => "Translocation",
            Self::ReciprocalTranslocation => "Reciprocal Translocation",
            Self::Duplication => "Duplication",
            Self::PointInsertion => "Point Insertion",
            Self::PointDeletion => "Point Deletion",
            Self::PointReplacement => "Point Replacement",
        }
    }

    const fn family(self) -> &'static str {
        if self.is_mutation() {
            "Mutation"
        } else {
            "Rearrangement"
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single recorded mutation or rearrangement.
///
/// Positions are 0-based and spans half-open. For moves, `destination` is an
/// offset into the sequence as it stands once the moved span has been cut
/// out (or, for duplications, into the unchanged sequence).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    /// Insert one base before `position`. A `base` of `None` is drawn at
    /// replay time.
    PointInsertion {
        chr: ChromosomeId,
        position: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        base: Option<Nucleotide>,
    },
    PointDeletion {
        chr: ChromosomeId,
        position: usize,
    },
    /// Replace the base at `position` with one of the three others.
    PointReplacement {
        chr: ChromosomeId,
        position: usize,
    },
    /// Insert `length` random bases before `position`.
    Insertion {
        chr: ChromosomeId,
        position: usize,
        length: usize,
    },
    Deletion {
        chr: ChromosomeId,
        position: usize,
        length: usize,
    },
    /// Move `[source, source + length)` to `destination` on the same
    /// chromosome.
    Translocation {
        chr: ChromosomeId,
        source: usize,
        length: usize,
        destination: usize,
    },
    /// Move `[source, source + length)` of `from` to `destination` on `to`.
    ReciprocalTranslocation {
        from: ChromosomeId,
        to: ChromosomeId,
        source: usize,
        length: usize,
        destination: usize,
    },
    /// Copy `[source, source + length)` to `destination` on the same
    /// chromosome.
    Duplication {
        chr: ChromosomeId,
        source: usize,
        length: usize,
        destination: usize,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PointInsertion { .. } => EventKind::PointInsertion,
            Self::PointDeletion { .. } => EventKind::PointDeletion,
            Self::PointReplacement { .. } => EventKind::PointReplacement,
            Self::Insertion { .. } => EventKind::Insertion,
            Self::Deletion { .. } => EventKind::Deletion,
            Self::Translocation { .. } => EventKind::Translocation,
            Self::ReciprocalTranslocation { .. } => EventKind::ReciprocalTranslocation,
            Self::Duplication { .. } => EventKind::Duplication,
        }
    }

    /// The chromosome the event acts on; for reciprocal translocations, the
    /// donor.
    pub fn chromosome(&self) -> ChromosomeId {
        match *self {
            Self::PointInsertion { chr, .. }
            | Self::PointDeletion { chr, .. }
            | Self::PointReplacement { chr, .. }
            | Self::Insertion { chr, .. }
            | Self::Deletion { chr, .. }
            | Self::Translocation { chr, .. }
            | Self::Duplication { chr, .. } => chr,
            Self::ReciprocalTranslocation { from, .. } => from,
        }
    }

    /// Net change in total genome length.
    pub fn length_delta(&self) -> isize {
        match *self {
            Self::PointInsertion { .. } => 1,
            Self::PointDeletion { .. } => -1,
            Self::Insertion { length, .. } | Self::Duplication { length, .. } => length as isize,
            Self::Deletion { length, .. } => -(length as isize),
            Self::PointReplacement { .. }
            | Self::Translocation { .. }
            | Self::ReciprocalTranslocation { .. } => 0,
        }
    }

    /// Apply the event to an abstract genome.
    ///
    /// The event is checked against the current lengths before anything
    /// changes, so a rejected event leaves `dna` untouched. A chromosome that
    /// reaches length zero is retired.
    pub fn apply_abstract(&self, dna: &mut Dna, generation: usize) -> Result<()> {
        if let Some(id) = self.update_lengths(dna, generation)? {
            log::info!("(generation {generation}) chromosome {id} has been removed by {self}");
        }
        Ok(())
    }

    /// Replay the event on a materialized genome: both the abstract state
    /// and the sequences move forward. Bases drawn at replay come from `rng`.
    pub fn replay<R: Rng + ?Sized>(
        &self,
        dna: &mut Dna,
        rng: &mut R,
        generation: usize,
    ) -> Result<()> {
        self.update_lengths(dna, generation)?;
        self.apply_concrete(dna, rng, generation)
    }

    /// Returns the id retired by this event, if any.
    fn update_lengths(&self, dna: &mut Dna, generation: usize) -> Result<Option<ChromosomeId>> {
        let retired = match *self {
            Self::PointInsertion { chr, position, .. } => {
                let len = self.active_length(dna, chr, generation)?;
                self.require(position <= len, generation, "position past chromosome end")?;
                let c = dna.chromosome_mut(chr)?;
                c.grow(1);
                c.update_overlaps(|t| t.insert_marked(position, 1));
                None
            }
            Self::PointDeletion { chr, position } => {
                let len = self.active_length(dna, chr, generation)?;
                self.require(position < len, generation, "position past chromosome end")?;
                self.shrink(dna, chr, position, 1, generation)?
            }
            Self::PointReplacement { chr, position } => {
                let len = self.active_length(dna, chr, generation)?;
                self.require(position < len, generation, "position past chromosome end")?;
                dna.chromosome_mut(chr)?.update_overlaps(|t| t.mark(position));
                None
            }
            Self::Insertion {
                chr,
                position,
                length,
            } => {
                let len = self.active_length(dna, chr, generation)?;
                self.require(length > 0, generation, "empty run")?;
                self.require(position <= len, generation, "position past chromosome end")?;
                let c = dna.chromosome_mut(chr)?;
                c.grow(length);
                c.update_overlaps(|t| t.insert_marked(position, length));
                None
            }
            Self::Deletion {
                chr,
                position,
                length,
            } => {
                let len = self.active_length(dna, chr, generation)?;
                self.require_span(position, length, len, generation)?;
                self.shrink(dna, chr, position, length, generation)?
            }
            Self::Translocation {
                chr,
                source,
                length,
                destination,
            } => {
                let len = self.active_length(dna, chr, generation)?;
                self.require_span(source, length, len, generation)?;
                self.require(
                    destination <= len - length,
                    generation,
                    "destination past end of excised chromosome",
                )?;
                dna.chromosome_mut(chr)?.update_overlaps(|t| {
                    let moved = t.excise_marked(source, length)?;
                    t.insert_counts(destination, &moved)?;
                    t.mark_boundary(source);
                    Some(())
                });
                None
            }
            Self::ReciprocalTranslocation {
                from,
                to,
                source,
                length,
                destination,
            } => {
                let from_len = self.active_length(dna, from, generation)?;
                let to_len = self.active_length(dna, to, generation)?;
                self.require(from != to, generation, "donor and recipient coincide")?;
                self.require_span(source, length, from_len, generation)?;
                self.require(destination <= to_len, generation, "destination past chromosome end")?;

                let (donor, recipient) = dna.pair_mut(from, to)?;
                donor.shrink(length).ok_or_else(|| self.invalid(generation, "span too long"))?;
                recipient.grow(length);

                let mut moved = None;
                donor.update_overlaps(|t| {
                    moved = Some(t.excise_marked(source, length)?);
                    t.mark_boundary(source);
                    Some(())
                });
                recipient.update_overlaps(|t| match &moved {
                    Some(counts) => t.insert_counts(destination, counts),
                    None => t.insert_marked(destination, length),
                });

                dna.retire_if_empty(from).then_some(from)
            }
            Self::Duplication {
                chr,
                source,
                length,
                destination,
            } => {
                let len = self.active_length(dna, chr, generation)?;
                self.require_span(source, length, len, generation)?;
                self.require(destination <= len, generation, "destination past chromosome end")?;
                let c = dna.chromosome_mut(chr)?;
                c.grow(length);
                c.update_overlaps(|t| {
                    let copied = t.copy_marked(source, length)?;
                    t.insert_counts(destination, &copied)?;
                    t.mark_boundary(source);
                    Some(())
                });
                None
            }
        };
        Ok(retired)
    }

    /// Splice the materialized sequences. Lengths are not touched.
    pub fn apply_concrete<R: Rng + ?Sized>(
        &self,
        dna: &mut Dna,
        rng: &mut R,
        generation: usize,
    ) -> Result<()> {
        let bounds = |e: OutOfBounds| self.invalid(generation, &e.to_string());
        match *self {
            Self::PointInsertion { chr, position, base } => {
                let base = base.unwrap_or_else(|| Nucleotide::random(rng));
                self.sequence(dna, chr, generation)?
                    .insert(position, base)
                    .map_err(bounds)
            }
            Self::PointDeletion { chr, position } => self
                .sequence(dna, chr, generation)?
                .remove(position)
                .map(|_| ())
                .map_err(bounds),
            Self::PointReplacement { chr, position } => {
                let seq = self.sequence(dna, chr, generation)?;
                let current = seq.get(position).ok_or(OutOfBounds {
                    index: position,
                    len: seq.len(),
                });
                let current = current.map_err(bounds)?;
                seq.set(position, current.random_other(rng)).map_err(bounds)
            }
            Self::Insertion {
                chr,
                position,
                length,
            } => {
                let inserted = Sequence::random(length, rng);
                self.sequence(dna, chr, generation)?
                    .insert_slice(position, inserted.as_slice())
                    .map_err(bounds)
            }
            Self::Deletion {
                chr,
                position,
                length,
            } => self
                .sequence(dna, chr, generation)?
                .excise(position, length)
                .map(|_| ())
                .map_err(bounds),
            Self::Translocation {
                chr,
                source,
                length,
                destination,
            } => {
                let seq = self.sequence(dna, chr, generation)?;
                let moved = seq.excise(source, length).map_err(bounds)?;
                seq.insert_slice(destination, &moved).map_err(bounds)
            }
            Self::ReciprocalTranslocation {
                from,
                to,
                source,
                length,
                destination,
            } => {
                let moved = self
                    .sequence(dna, from, generation)?
                    .excise(source, length)
                    .map_err(bounds)?;
                self.sequence(dna, to, generation)?
                    .insert_slice(destination, &moved)
                    .map_err(bounds)
            }
            Self::Duplication {
                chr,
                source,
                length,
                destination,
            } => {
                let seq = self.sequence(dna, chr, generation)?;
                let copied = seq.copy_range(source, length).map_err(bounds)?;
                seq.insert_slice(destination, &copied).map_err(bounds)
            }
        }
    }

    fn active_length(&self, dna: &Dna, id: ChromosomeId, generation: usize) -> Result<usize> {
        let len = dna.chromosome(id)?.length();
        if !dna.is_active(id) {
            return Err(self.invalid(generation, &format!("chromosome {id} is retired")));
        }
        Ok(len)
    }

    fn shrink(
        &self,
        dna: &mut Dna,
        chr: ChromosomeId,
        position: usize,
        length: usize,
        generation: usize,
    ) -> Result<Option<ChromosomeId>> {
        let c = dna.chromosome_mut(chr)?;
        c.shrink(length)
            .ok_or_else(|| self.invalid(generation, "span too long"))?;
        c.update_overlaps(|t| {
            t.remove(position, length)?;
            t.mark_boundary(position);
            Some(())
        });
        Ok(dna.retire_if_empty(chr).then_some(chr))
    }

    fn sequence<'a>(
        &self,
        dna: &'a mut Dna,
        id: ChromosomeId,
        generation: usize,
    ) -> Result<&'a mut Sequence> {
        dna.chromosome_mut(id)?
            .sequence_mut()
            .ok_or(SimulationError::MissingSequence {
                generation,
                chromosome: id,
            })
    }

    fn require_span(&self, start: usize, length: usize, len: usize, generation: usize) -> Result<()> {
        self.require(length > 0, generation, "empty run")?;
        self.require(
            start.checked_add(length).is_some_and(|end| end <= len),
            generation,
            "span past chromosome end",
        )
    }

    fn require(&self, condition: bool, generation: usize, reason: &str) -> Result<()> {
        if condition {
            Ok(())
        } else {
            Err(self.invalid(generation, reason))
        }
    }

    fn invalid(&self, generation: usize, reason: &str) -> SimulationError {
        SimulationError::InvalidEvent {
            generation,
            reason: format!("{self}: {reason}"),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind();
        write!(f, "{}->{}(", kind.family(), kind.name())?;
        match *self {
            Self::PointInsertion {
                chr,
                position,
                base,
            } => {
                write!(f, "chr: {chr}, pos: {position}")?;
                if let Some(base) = base {
                    write!(f, ", base: {base}")?;
                }
            }
            Self::PointDeletion { chr, position } | Self::PointReplacement { chr, position } => {
                write!(f, "chr: {chr}, pos: {position}")?
            }
            Self::Insertion {
                chr,
                position,
                length,
            }
            | Self::Deletion {
                chr,
                position,
                length,
            } => write!(f, "chr: {chr}, pos: {position}, len: {length}")?,
            Self::Translocation {
                chr,
                source,
                length,
                destination,
            }
            | Self::Duplication {
                chr,
                source,
                length,
                destination,
            } => write!(
                f,
                "chr: {chr}, from: {source}, len: {length}, to: {destination}"
            )?,
            Self::ReciprocalTranslocation {
                from,
                to,
                source,
                length,
                destination,
            } => write!(
                f,
                "chrs: ({from}, {to}), from: {source}, len: {length}, to: {destination}"
            )?,
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::Chromosome;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use std::str::FromStr;

    fn materialized(seqs: &[&str]) -> Dna {
        let chromosomes = seqs
            .iter()
            .enumerate()
            .map(|(i, s)| Chromosome::with_sequence(i + 1, Sequence::from_str(s).unwrap()).unwrap())
            .collect();
        Dna::from_chromosomes(chromosomes).unwrap()
    }

    fn replay(dna: &mut Dna, event: Event) {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(9);
        event.replay(dna, &mut rng, 1).unwrap();
        for chr in dna.chromosomes() {
            assert!(chr.is_consistent(), "{chr} out of step after {event}");
        }
    }

    fn seq(dna: &Dna, id: ChromosomeId) -> String {
        dna.chromosome(id).unwrap().sequence().unwrap().to_string()
    }

    #[test]
    fn test_point_insertion_with_fixed_base() {
        let mut dna = materialized(&["AAAAAAAAAA"]);
        replay(
            &mut dna,
            Event::PointInsertion {
                chr: 1,
                position: 5,
                base: Some(Nucleotide::G),
            },
        );
        assert_eq!(seq(&dna, 1), "AAAAAGAAAAA");
        assert_eq!(dna.chromosome(1).unwrap().length(), 11);
    }

    #[test]
    fn test_point_replacement_changes_base() {
        let mut dna = materialized(&["ACGT"]);
        replay(&mut dna, Event::PointReplacement { chr: 1, position: 2 });
        let s = seq(&dna, 1);
        assert_eq!(s.len(), 4);
        assert_ne!(&s[2..3], "G");
        assert_eq!(&s[..2], "AC");
    }

    #[test]
    fn test_deletion_removes_span() {
        let mut dna = materialized(&["ACGTACGTAC"]);
        replay(
            &mut dna,
            Event::Deletion {
                chr: 1,
                position: 2,
                length: 3,
            },
        );
        assert_eq!(seq(&dna, 1), "ACCGTAC");
    }

    #[test]
    fn test_translocation_uses_excised_coordinates() {
        let mut dna = materialized(&["ACGTTGCA"]);
        replay(
            &mut dna,
            Event::Translocation {
                chr: 1,
                source: 0,
                length: 2,
                destination: 6,
            },
        );
        assert_eq!(seq(&dna, 1), "GTTGCAAC");
        assert_eq!(dna.chromosome(1).unwrap().length(), 8);
    }

    #[test]
    fn test_reciprocal_translocation_moves_material() {
        let mut dna = materialized(&["CCCAAAAAAA", "TTTTTTTTTT"]);
        replay(
            &mut dna,
            Event::ReciprocalTranslocation {
                from: 1,
                to: 2,
                source: 0,
                length: 3,
                destination: 5,
            },
        );
        assert_eq!(seq(&dna, 1), "AAAAAAA");
        assert_eq!(seq(&dna, 2), "TTTTTCCCTTTTT");
    }

    #[test]
    fn test_duplication_keeps_original() {
        let mut dna = materialized(&["ACGT"]);
        replay(
            &mut dna,
            Event::Duplication {
                chr: 1,
                source: 1,
                length: 2,
                destination: 4,
            },
        );
        assert_eq!(seq(&dna, 1), "ACGTCG");
    }

    #[test]
    fn test_insertion_adds_random_run() {
        let mut dna = materialized(&["AAAA"]);
        replay(
            &mut dna,
            Event::Insertion {
                chr: 1,
                position: 4,
                length: 5,
            },
        );
        assert_eq!(dna.chromosome(1).unwrap().length(), 9);
        assert!(seq(&dna, 1).starts_with("AAAA"));
    }

    #[test]
    fn test_full_deletion_retires_chromosome() {
        let mut dna = Dna::from_lengths(&[3, 5]).unwrap();
        Event::Deletion {
            chr: 1,
            position: 0,
            length: 3,
        }
        .apply_abstract(&mut dna, 1)
        .unwrap();
        assert!(!dna.is_active(1));
        assert!(dna.is_consistent());

        // Retired chromosomes accept no further events
        let err = Event::PointInsertion {
            chr: 1,
            position: 0,
            base: None,
        }
        .apply_abstract(&mut dna, 1)
        .unwrap_err();
        assert!(matches!(err, SimulationError::InvalidEvent { generation: 1, .. }));
    }

    #[test]
    fn test_reciprocal_translocation_retires_donor() {
        let mut dna = Dna::from_lengths(&[2, 5]).unwrap();
        Event::ReciprocalTranslocation {
            from: 1,
            to: 2,
            source: 0,
            length: 2,
            destination: 5,
        }
        .apply_abstract(&mut dna, 3)
        .unwrap();
        assert_eq!(dna.lengths(), vec![0, 7]);
        assert!(!dna.is_active(1));
    }

    #[test]
    fn test_out_of_range_events_rejected_without_change() {
        let mut dna = Dna::from_lengths(&[5, 5]).unwrap();
        let bad = [
            Event::Deletion {
                chr: 1,
                position: 3,
                length: 3,
            },
            Event::Translocation {
                chr: 1,
                source: 0,
                length: 2,
                destination: 4,
            },
            Event::ReciprocalTranslocation {
                from: 1,
                to: 1,
                source: 0,
                length: 1,
                destination: 0,
            },
            Event::Duplication {
                chr: 2,
                source: 0,
                length: 0,
                destination: 0,
            },
            Event::PointDeletion { chr: 3, position: 0 },
        ];
        for event in bad {
            assert!(event.apply_abstract(&mut dna, 1).is_err(), "{event} accepted");
        }
        assert_eq!(dna.lengths(), vec![5, 5]);
    }

    #[test]
    fn test_concrete_without_sequence_is_missing() {
        let mut dna = Dna::from_lengths(&[5]).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
        let err = Event::PointDeletion { chr: 1, position: 0 }
            .apply_concrete(&mut dna, &mut rng, 4)
            .unwrap_err();
        assert!(matches!(
            err,
            SimulationError::MissingSequence {
                generation: 4,
                chromosome: 1
            }
        ));
    }

    #[test]
    fn test_overlap_tracks_follow_events() {
        let mut dna = materialized(&["AAAAAA"]);
        dna.enable_overlaps();
        replay(
            &mut dna,
            Event::Duplication {
                chr: 1,
                source: 1,
                length: 2,
                destination: 0,
            },
        );
        let track = dna.chromosome(1).unwrap().overlaps().unwrap().as_slice().to_vec();
        // Copied span lands at 0 with count 1; boundary around position 1
        assert_eq!(track, vec![2, 2, 0, 0, 0, 0, 0, 0]);

        replay(&mut dna, Event::PointInsertion { chr: 1, position: 8, base: None });
        let track = dna.chromosome(1).unwrap().overlaps().unwrap();
        assert_eq!(track.len(), 9);
        assert_eq!(track.as_slice()[8], 1);
    }

    #[test]
    fn test_display_names_family_and_kind() {
        let event = Event::Deletion {
            chr: 2,
            position: 4,
            length: 1,
        };
        assert_eq!(event.to_string(), "Rearrangement->Deletion(chr: 2, pos: 4, len: 1)");
        assert_eq!(event.length_delta(), -1);
        let event = Event::PointDeletion { chr: 1, position: 0 };
        assert!(event.to_string().starts_with("Mutation->Point Deletion"));
    }

    #[test]
    fn test_kind_order_matches_table() {
        for (i, kind) in EventKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
        assert!(EventKind::PointReplacement.is_mutation());
        assert!(EventKind::Duplication.is_rearrangement());
    }
}
