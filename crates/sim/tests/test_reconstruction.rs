//! Integration tests for event replay onto reference sequences.

use cellevo_sim::base::Nucleotide;
use cellevo_sim::evolution::Event;
use cellevo_sim::genome::Cell;
use cellevo_sim::simulation::{
    LineagePath, LineageTree, Node, Reconstructor, ReferenceTable, SimulationBuilder,
};
use cellevo_sim::SimulationError;

/// One division: the left daughter carries `events`, the right one none.
fn single_division(reference: &ReferenceTable, events: Vec<Event>) -> LineageTree {
    let founder = Cell::founder(reference.abstract_dna().unwrap(), 11);
    let mut left = Cell::descendant(&founder, 12);
    for event in events {
        left.push_event(event).unwrap();
    }
    let right = Cell::descendant(&founder, 13);
    let root = Node::with_children(founder, Node::leaf(left), Node::leaf(right)).unwrap();
    LineageTree::new(root).unwrap()
}

fn left_leaf(reference: &ReferenceTable, tree: &LineageTree) -> Vec<String> {
    let path: LineagePath = "L".parse().unwrap();
    Reconstructor::new(reference)
        .materialize_path(tree, &path)
        .unwrap()
        .chromosomes
        .iter()
        .map(|c| c.sequence.to_string())
        .collect()
}

#[test]
fn test_point_insertion_of_fixed_base() {
    let reference = ReferenceTable::uniform(Nucleotide::A, &[10]).unwrap();
    let tree = single_division(
        &reference,
        vec![Event::PointInsertion {
            chr: 1,
            position: 5,
            base: Some(Nucleotide::G),
        }],
    );
    let leaf = tree.node(&"L".parse().unwrap()).unwrap();
    assert_eq!(leaf.cell().dna().chromosome(1).unwrap().length(), 11);
    assert_eq!(left_leaf(&reference, &tree), vec!["AAAAAGAAAAA"]);
}

#[test]
fn test_deletion_removes_span() {
    let reference = ReferenceTable::from_pairs([(1, "ACGTACGTAC")]).unwrap();
    let tree = single_division(
        &reference,
        vec![Event::Deletion {
            chr: 1,
            position: 2,
            length: 3,
        }],
    );
    // Indices [2, 5) of ACGTACGTAC are GTA
    assert_eq!(left_leaf(&reference, &tree), vec!["ACCGTAC"]);
}

#[test]
fn test_reciprocal_translocation_moves_between_chromosomes() {
    let reference =
        ReferenceTable::from_pairs([(1, "CCCGGGGGGG"), (2, "AAAAATTTTT")]).unwrap();
    let tree = single_division(
        &reference,
        vec![Event::ReciprocalTranslocation {
            from: 1,
            to: 2,
            source: 0,
            length: 3,
            destination: 5,
        }],
    );
    let leaf = tree.node(&"L".parse().unwrap()).unwrap();
    assert_eq!(leaf.cell().dna().lengths(), vec![7, 13]);
    assert_eq!(
        left_leaf(&reference, &tree),
        vec!["GGGGGGG", "AAAAACCCTTTTT"]
    );
}

#[test]
fn test_retired_chromosome_stays_empty() {
    let reference = ReferenceTable::from_pairs([(1, "ACG"), (2, "TTTT")]).unwrap();
    let tree = single_division(
        &reference,
        vec![Event::Deletion {
            chr: 1,
            position: 0,
            length: 3,
        }],
    );
    let leaf = tree.node(&"L".parse().unwrap()).unwrap();
    assert!(!leaf.cell().dna().is_active(1));
    assert_eq!(left_leaf(&reference, &tree), vec!["", "TTTT"]);

    // Further events on the retired chromosome are rejected
    let mut cell = leaf.cell().clone();
    let err = cell
        .push_event(Event::PointInsertion {
            chr: 1,
            position: 0,
            base: None,
        })
        .unwrap_err();
    assert!(matches!(err, SimulationError::InvalidEvent { .. }));
}

#[test]
fn test_path_and_generation_reconstruction_agree() {
    let sim = SimulationBuilder::new()
        .generations(4)
        .average_events(6.0)
        .random_reference(vec![400, 250, 120])
        .parallel_depth(2)
        .track_overlaps(true)
        .seed(2024)
        .build()
        .unwrap();
    let tree = sim.grow().unwrap();
    let all = sim.reconstructor().materialize(&tree, 4).unwrap();
    assert_eq!(all.len(), 16);

    for (index, genome) in all.iter().enumerate() {
        let path = LineagePath::from_leaf_index(index, 4).unwrap();
        assert_eq!(genome.path, path);
        let single = sim.reconstructor().materialize_path(&tree, &path).unwrap();
        assert_eq!(&single, genome);
    }
}

#[test]
fn test_intermediate_generation() {
    let sim = SimulationBuilder::new()
        .generations(3)
        .average_events(3.0)
        .uniform_reference(Nucleotide::C, vec![200])
        .seed(5)
        .build()
        .unwrap();
    let tree = sim.grow().unwrap();
    let genomes = sim.reconstructor().materialize(&tree, 1).unwrap();
    assert_eq!(genomes.len(), 2);
    for genome in &genomes {
        let node = tree.node(&genome.path).unwrap();
        assert_eq!(genome.total_length(), node.cell().dna().total_length());
    }
}

#[test]
fn test_salt_keeps_structure() {
    let sim = SimulationBuilder::new()
        .generations(3)
        .average_events(8.0)
        .uniform_reference(Nucleotide::A, vec![300, 300])
        .seed(77)
        .build()
        .unwrap();
    let tree = sim.grow().unwrap();
    let path: LineagePath = "RLR".parse().unwrap();
    let a = sim.reconstructor().materialize_path(&tree, &path).unwrap();
    let again = sim.reconstructor().materialize_path(&tree, &path).unwrap();
    let salted = sim
        .reconstructor()
        .with_salt(1)
        .materialize_path(&tree, &path)
        .unwrap();

    assert_eq!(a, again);
    for (x, y) in a.chromosomes.iter().zip(&salted.chromosomes) {
        assert_eq!(x.sequence.len(), y.sequence.len());
    }
}

#[test]
fn test_concurrent_visitor_sees_every_leaf() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let sim = SimulationBuilder::new()
        .generations(5)
        .average_events(2.0)
        .uniform_reference(Nucleotide::G, vec![100])
        .parallel_depth(3)
        .seed(3)
        .build()
        .unwrap();
    let tree = sim.grow().unwrap();
    let seen = AtomicUsize::new(0);
    sim.reconstructor()
        .for_each_at_generation(&tree, 5, |genome| {
            assert_eq!(genome.generation, 5);
            seen.fetch_add(1, Ordering::Relaxed);
            Ok(())
        })
        .unwrap();
    assert_eq!(seen.into_inner(), 32);
}
