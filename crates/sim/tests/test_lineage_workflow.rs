//! End-to-end lineage growth: reproducibility, invariants and statistics.

use cellevo_sim::base::Nucleotide;
use cellevo_sim::evolution::{EventCountDistribution, EventKind, EventTable, LengthDistribution};
use cellevo_sim::simulation::{Configuration, LineageTree, Simulation, SimulationBuilder};

fn builder(seed: u64) -> SimulationBuilder {
    SimulationBuilder::new()
        .generations(5)
        .average_events(6.0)
        .random_reference(vec![500, 300, 80])
        .seed(seed)
}

fn leaf_events(tree: &LineageTree) -> Vec<String> {
    tree.leaves()
        .flat_map(|c| c.events().iter().map(|e| e.to_string()))
        .collect()
}

#[test]
fn test_serial_and_parallel_runs_are_identical() {
    let serial = builder(42).parallel_depth(0).build().unwrap().grow().unwrap();
    let parallel = builder(42).parallel_depth(5).build().unwrap().grow().unwrap();
    assert_eq!(leaf_events(&serial), leaf_events(&parallel));
    let lengths = |t: &LineageTree| t.leaves().map(|c| c.dna().lengths()).collect::<Vec<_>>();
    assert_eq!(lengths(&serial), lengths(&parallel));
}

#[test]
fn test_different_seeds_differ() {
    let a = builder(1).build().unwrap().grow().unwrap();
    let b = builder(2).build().unwrap().grow().unwrap();
    assert_ne!(leaf_events(&a), leaf_events(&b));
}

#[test]
fn test_active_ids_match_lengths_everywhere() {
    // Deletion-heavy runs drive short chromosomes to zero
    let sim = SimulationBuilder::new()
        .generations(6)
        .average_events(4.0)
        .event_table(EventTable::from_weights(&[6.0, 0.0, 1.0, 1.0, 0.0, 0.0, 4.0, 0.0]).unwrap())
        .length_distribution(LengthDistribution::Uniform)
        .uniform_reference(Nucleotide::A, vec![6, 4, 200])
        .seed(99)
        .build()
        .unwrap();
    let tree = sim.grow().unwrap();
    let mut retired = 0;
    tree.walk(|_, node| {
        let dna = node.cell().dna();
        assert!(dna.is_consistent());
        retired += dna.chromosomes().len() - dna.active_ids().len();
    });
    assert!(retired > 0, "expected at least one retired chromosome");
}

#[test]
fn test_statistics_mean_matches_leaves() {
    let outcome = builder(7).build().unwrap().run().unwrap();
    let leaves: Vec<_> = outcome.tree.leaves().collect();
    assert_eq!(outcome.statistics.leaf_count, 32);

    let expected = leaves.iter().map(|c| c.dna().total_length() as f64).sum::<f64>() / 32.0;
    assert!((outcome.statistics.mean_genome_length - expected).abs() < 1e-9);

    let chr2_mean = leaves
        .iter()
        .map(|c| c.dna().chromosome(2).unwrap().length() as f64)
        .sum::<f64>()
        / 32.0;
    assert!((outcome.statistics.mean_chromosome_length[1] - chr2_mean).abs() < 1e-9);
}

#[test]
fn test_fixed_counts_of_single_kind() {
    let sim = SimulationBuilder::new()
        .generations(3)
        .average_events(3.0)
        .event_count(EventCountDistribution::Fixed)
        .event_table(EventTable::only(EventKind::Duplication))
        .uniform_reference(Nucleotide::T, vec![100])
        .seed(1)
        .build()
        .unwrap();
    let tree = sim.grow().unwrap();
    assert_eq!(tree.events_per_generation(), vec![0, 6, 12, 24]);
    for leaf in tree.leaves() {
        assert!(leaf.events().iter().all(|e| e.kind() == EventKind::Duplication));
        assert!(leaf.dna().total_length() > 100);
    }
}

#[test]
fn test_configuration_file_reproduces_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");
    let config = builder(31).configuration().unwrap();
    config.save(&path).unwrap();

    let first = Simulation::from_config(config).unwrap().run().unwrap();
    let again = Simulation::from_config(Configuration::load(&path).unwrap())
        .unwrap()
        .run()
        .unwrap();
    assert_eq!(first.statistics, again.statistics);
    assert_eq!(leaf_events(&first.tree), leaf_events(&again.tree));
}
