//! Random event generators.
//!
//! One generator per `EventKind`, each drawing legal parameters against the
//! current abstract genome. A generator returns `Ok(None)` when the genome
//! offers no valid target (no active chromosome, no chromosome long enough to
//! move a span within, fewer than two chromosomes for a reciprocal
//! translocation); the event is then skipped.

use rand::{Rng, RngCore};

use super::sampling::{run_length, LengthDistribution};
use super::{Event, EventKind, EventTable, LengthSamplers};
use crate::errors::Result;
use crate::genome::{ChromosomeId, Dna};

/// Draws the parameters of one event kind.
pub type Generator = fn(&Dna, &LengthSamplers, &mut dyn RngCore) -> Result<Option<Event>>;

impl EventKind {
    /// The generator for this kind.
    pub fn generator(self) -> Generator {
        match self {
            Self::Deletion => deletion,
            Self::Insertion => insertion,
            Self::Translocation => translocation,
            Self::ReciprocalTranslocation => reciprocal_translocation,
            Self::Duplication => duplication,
            Self::PointInsertion => point_insertion,
            Self::PointDeletion => point_deletion,
            Self::PointReplacement => point_replacement,
        }
    }
}

/// Draw a kind from `table` and generate an event of that kind.
pub fn random_event(
    dna: &Dna,
    table: &EventTable,
    lengths: &LengthSamplers,
    rng: &mut dyn RngCore,
) -> Result<Option<Event>> {
    let kind = table.sample(&mut *rng);
    let event = (kind.generator())(dna, lengths, rng)?;
    if event.is_none() {
        log::debug!("skipping {kind}: no valid target chromosome");
    }
    Ok(event)
}

/// An active chromosome chosen uniformly, with its length.
fn pick_active(dna: &Dna, rng: &mut dyn RngCore) -> Option<(ChromosomeId, usize)> {
    let count = dna.active_ids().len();
    if count == 0 {
        return None;
    }
    let id = dna.nth_active(rng.random_range(0..count))?;
    let len = dna.chromosome(id).ok()?.length();
    Some((id, len))
}

/// Run length for a span starting at `position` on a chromosome of `len`.
fn span(
    lengths: &LengthSamplers,
    kind: EventKind,
    len: usize,
    position: usize,
    rng: &mut dyn RngCore,
) -> Result<usize> {
    let dist = lengths
        .for_kind(kind)
        .copied()
        .unwrap_or(LengthDistribution::Uniform);
    run_length(&dist, len - position, rng)
}

fn point_insertion(dna: &Dna, _: &LengthSamplers, rng: &mut dyn RngCore) -> Result<Option<Event>> {
    Ok(pick_active(dna, rng).map(|(chr, len)| Event::PointInsertion {
        chr,
        position: rng.random_range(0..len),
        base: None,
    }))
}

fn point_deletion(dna: &Dna, _: &LengthSamplers, rng: &mut dyn RngCore) -> Result<Option<Event>> {
    Ok(pick_active(dna, rng).map(|(chr, len)| Event::PointDeletion {
        chr,
        position: rng.random_range(0..len),
    }))
}

fn point_replacement(
    dna: &Dna,
    _: &LengthSamplers,
    rng: &mut dyn RngCore,
) -> Result<Option<Event>> {
    Ok(pick_active(dna, rng).map(|(chr, len)| Event::PointReplacement {
        chr,
        position: rng.random_range(0..len),
    }))
}

fn insertion(dna: &Dna, lengths: &LengthSamplers, rng: &mut dyn RngCore) -> Result<Option<Event>> {
    let Some((chr, len)) = pick_active(dna, rng) else {
        return Ok(None);
    };
    let position = rng.random_range(0..len);
    let length = span(lengths, EventKind::Insertion, len, position, rng)?;
    Ok(Some(Event::Insertion {
        chr,
        position,
        length,
    }))
}

fn deletion(dna: &Dna, lengths: &LengthSamplers, rng: &mut dyn RngCore) -> Result<Option<Event>> {
    // Only active chromosomes are drawn, so the span is never empty
    let Some((chr, len)) = pick_active(dna, rng) else {
        return Ok(None);
    };
    let position = rng.random_range(0..len);
    let length = span(lengths, EventKind::Deletion, len, position, rng)?;
    Ok(Some(Event::Deletion {
        chr,
        position,
        length,
    }))
}

fn translocation(
    dna: &Dna,
    lengths: &LengthSamplers,
    rng: &mut dyn RngCore,
) -> Result<Option<Event>> {
    // A span can only move within a chromosome of at least two bases
    let candidates: Vec<(ChromosomeId, usize)> = dna
        .active_ids()
        .iter()
        .filter_map(|&id| {
            let len = dna.chromosome(id).ok()?.length();
            (len >= 2).then_some((id, len))
        })
        .collect();
    if candidates.is_empty() {
        return Ok(None);
    }
    let (chr, len) = candidates[rng.random_range(0..candidates.len())];
    if candidates.len() < dna.active_ids().len() {
        log::debug!("translocation restricted to chromosomes of length >= 2, drew {chr}");
    }

    let source = rng.random_range(0..len);
    let mut length = span(lengths, EventKind::Translocation, len, source, rng)?;
    if length == len {
        log::debug!("translocation run clamped from {length} to {}", len - 1);
        length = len - 1;
    }
    let destination = rng.random_range(0..len - length);
    Ok(Some(Event::Translocation {
        chr,
        source,
        length,
        destination,
    }))
}

fn reciprocal_translocation(
    dna: &Dna,
    lengths: &LengthSamplers,
    rng: &mut dyn RngCore,
) -> Result<Option<Event>> {
    let count = dna.active_ids().len();
    if count < 2 {
        return Ok(None);
    }
    let first = rng.random_range(0..count);
    // Shift past `first` to draw uniformly among the others
    let mut second = rng.random_range(0..count - 1);
    if second >= first {
        second += 1;
    }
    let (Some(from), Some(to)) = (dna.nth_active(first), dna.nth_active(second)) else {
        return Ok(None);
    };
    let from_len = dna.chromosome(from)?.length();
    let to_len = dna.chromosome(to)?.length();

    let source = rng.random_range(0..from_len);
    let length = span(
        lengths,
        EventKind::ReciprocalTranslocation,
        from_len,
        source,
        rng,
    )?;
    let destination = rng.random_range(0..to_len);
    Ok(Some(Event::ReciprocalTranslocation {
        from,
        to,
        source,
        length,
        destination,
    }))
}

fn duplication(dna: &Dna, lengths: &LengthSamplers, rng: &mut dyn RngCore) -> Result<Option<Event>> {
    let Some((chr, len)) = pick_active(dna, rng) else {
        return Ok(None);
    };
    let source = rng.random_range(0..len);
    let length = span(lengths, EventKind::Duplication, len, source, rng)?;
    let destination = rng.random_range(0..len);
    Ok(Some(Event::Duplication {
        chr,
        source,
        length,
        destination,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evolution::LengthDistribution;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn rng() -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(2024)
    }

    #[test]
    fn test_generated_events_always_apply() {
        let lengths = LengthSamplers::all(LengthDistribution::Uniform);
        let table = EventTable::uniform();
        let mut rng = rng();
        let mut dna = Dna::from_lengths(&[20, 3, 1, 50]).unwrap();
        for _ in 0..2000 {
            if let Some(event) = random_event(&dna, &table, &lengths, &mut rng).unwrap() {
                event.apply_abstract(&mut dna, 1).unwrap();
                assert!(dna.is_consistent());
            }
        }
    }

    #[test]
    fn test_every_kind_generates_valid_events() {
        let lengths = LengthSamplers::default();
        let mut rng = rng();
        for kind in EventKind::ALL {
            let mut dna = Dna::from_lengths(&[12, 9]).unwrap();
            for _ in 0..50 {
                match (kind.generator())(&dna, &lengths, &mut rng).unwrap() {
                    Some(event) => {
                        assert_eq!(event.kind(), kind);
                        event.apply_abstract(&mut dna, 1).unwrap();
                    }
                    None => assert!(dna.active_ids().len() < 2),
                }
            }
        }
    }

    #[test]
    fn test_no_active_chromosomes_skips() {
        let dna = Dna::from_lengths(&[0, 0]).unwrap();
        let lengths = LengthSamplers::default();
        let mut rng = rng();
        for kind in EventKind::ALL {
            assert!((kind.generator())(&dna, &lengths, &mut rng).unwrap().is_none());
        }
    }

    #[test]
    fn test_translocation_avoids_single_base_chromosomes() {
        let dna = Dna::from_lengths(&[1, 1, 2]).unwrap();
        let lengths = LengthSamplers::default();
        let mut rng = rng();
        for _ in 0..100 {
            match translocation(&dna, &lengths, &mut rng).unwrap() {
                Some(Event::Translocation {
                    chr,
                    length,
                    destination,
                    ..
                }) => {
                    assert_eq!(chr, 3);
                    assert_eq!(length, 1);
                    assert!(destination < 1);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        let short = Dna::from_lengths(&[1, 1]).unwrap();
        assert!(translocation(&short, &lengths, &mut rng).unwrap().is_none());
    }

    #[test]
    fn test_reciprocal_translocation_needs_two_chromosomes() {
        let lengths = LengthSamplers::default();
        let mut rng = rng();
        let single = Dna::from_lengths(&[10, 0]).unwrap();
        assert!(reciprocal_translocation(&single, &lengths, &mut rng)
            .unwrap()
            .is_none());

        let pair = Dna::from_lengths(&[10, 10]).unwrap();
        for _ in 0..100 {
            let Some(Event::ReciprocalTranslocation { from, to, .. }) =
                reciprocal_translocation(&pair, &lengths, &mut rng).unwrap()
            else {
                panic!("expected a reciprocal translocation");
            };
            assert_ne!(from, to);
        }
    }

    #[test]
    fn test_retired_chromosome_never_selected() {
        let mut dna = Dna::from_lengths(&[1, 30]).unwrap();
        Event::PointDeletion { chr: 1, position: 0 }
            .apply_abstract(&mut dna, 1)
            .unwrap();
        let lengths = LengthSamplers::default();
        let table = EventTable::uniform();
        let mut rng = rng();
        for _ in 0..500 {
            if let Some(event) = random_event(&dna, &table, &lengths, &mut rng).unwrap() {
                assert_ne!(event.chromosome(), 1, "{event}");
                if let Event::ReciprocalTranslocation { to, .. } = event {
                    assert_ne!(to, 1);
                }
            }
        }
    }
}
