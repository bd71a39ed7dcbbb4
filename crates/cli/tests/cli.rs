use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

/// Write a small, seeded configuration and return its path.
fn init_small(dir: &Path, extra: &[&str]) -> std::path::PathBuf {
    let config = dir.join("config.json");
    Command::cargo_bin("cellevo")
        .unwrap()
        .arg("init")
        .arg("--output")
        .arg(&config)
        .args(["--generations", "3", "--lengths", "120,80", "--seed", "42"])
        .args(["--average-events", "3"])
        .args(extra)
        .assert()
        .success();
    config
}

#[test]
fn test_init_creates_config() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("cellevo.json");

    Command::cargo_bin("cellevo")
        .unwrap()
        .arg("init")
        .arg("--output")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Configuration initialized successfully!",
        ))
        .stdout(predicate::str::contains("Generations: 7"));

    let text = fs::read_to_string(&config).unwrap();
    assert!(text.contains("\"generations\": 7"));
    assert!(text.contains("\"source\": \"uniform\""));
}

#[test]
fn test_init_event_weights() {
    let temp = tempdir().unwrap();
    let config = init_small(
        temp.path(),
        &["--event-weights", "1,0,0,0,0,0,0,1", "--fixed-events"],
    );
    let text = fs::read_to_string(config).unwrap();
    assert!(text.contains("\"event_count\": \"fixed\""));
}

#[test]
fn test_init_rejects_too_many_generations() {
    let temp = tempdir().unwrap();
    Command::cargo_bin("cellevo")
        .unwrap()
        .arg("init")
        .arg("--output")
        .arg(temp.path().join("bad.json"))
        .args(["--generations", "31"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("generations"));
}

#[test]
fn test_init_rejects_bad_base() {
    let temp = tempdir().unwrap();
    Command::cargo_bin("cellevo")
        .unwrap()
        .arg("init")
        .arg("--output")
        .arg(temp.path().join("bad.json"))
        .args(["--base", "N"])
        .assert()
        .failure();
}

#[test]
fn test_run_pretty() {
    let temp = tempdir().unwrap();
    let config = init_small(temp.path(), &[]);

    Command::cargo_bin("cellevo")
        .unwrap()
        .arg("run")
        .arg("--config")
        .arg(&config)
        .arg("--no-progress")
        .assert()
        .success()
        .stdout(predicate::str::contains("Leaves: 8"))
        .stdout(predicate::str::contains("Simulation complete!"));
}

#[test]
fn test_run_json_is_reproducible() {
    let temp = tempdir().unwrap();
    let config = init_small(temp.path(), &[]);

    let run = || {
        let output = Command::cargo_bin("cellevo")
            .unwrap()
            .args(["--threads", "2", "run", "--format", "json", "--config"])
            .arg(&config)
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap()
    };
    let first = run();
    assert!(first.contains("\"leaf_count\": 8"));
    assert_eq!(first, run());
}

#[test]
fn test_run_missing_config() {
    let temp = tempdir().unwrap();
    Command::cargo_bin("cellevo")
        .unwrap()
        .arg("run")
        .arg("--config")
        .arg(temp.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_reconstruct_leaf_to_stdout() {
    let temp = tempdir().unwrap();
    let config = init_small(temp.path(), &[]);

    Command::cargo_bin("cellevo")
        .unwrap()
        .arg("reconstruct")
        .arg("--config")
        .arg(&config)
        .args(["--leaf", "5"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(">gen3_RLR_chr1\n"))
        .stdout(predicate::str::contains(">gen3_RLR_chr2\n"));
}

#[test]
fn test_reconstruct_path_matches_generation() {
    let temp = tempdir().unwrap();
    let config = init_small(temp.path(), &["--reference", "random"]);
    let all = temp.path().join("all.fasta");
    let one = temp.path().join("one.fasta");

    Command::cargo_bin("cellevo")
        .unwrap()
        .arg("reconstruct")
        .arg("--config")
        .arg(&config)
        .args(["--generation", "3", "--output"])
        .arg(&all)
        .assert()
        .success();
    Command::cargo_bin("cellevo")
        .unwrap()
        .arg("reconstruct")
        .arg("--config")
        .arg(&config)
        .args(["--path", "LRL", "--output"])
        .arg(&one)
        .assert()
        .success();

    let all = fs::read_to_string(all).unwrap();
    let one = fs::read_to_string(one).unwrap();
    assert_eq!(all.matches('>').count(), 16);
    assert!(all.contains(&one));
}

#[test]
fn test_reconstruct_writes_overlaps() {
    let temp = tempdir().unwrap();
    let config = init_small(temp.path(), &[]);
    let tsv = temp.path().join("overlaps.tsv");

    Command::cargo_bin("cellevo")
        .unwrap()
        .arg("reconstruct")
        .arg("--config")
        .arg(&config)
        .args(["--path", "LL", "--overlaps"])
        .arg(&tsv)
        .assert()
        .success();

    let text = fs::read_to_string(tsv).unwrap();
    assert!(text.starts_with("gen2_LL_chr1\t"));
}

#[test]
fn test_reconstruct_path_too_long() {
    let temp = tempdir().unwrap();
    let config = init_small(temp.path(), &[]);

    Command::cargo_bin("cellevo")
        .unwrap()
        .arg("reconstruct")
        .arg("--config")
        .arg(&config)
        .args(["--path", "LRLR"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Reconstruction failed"));
}

#[test]
fn test_reconstruct_requires_target() {
    let temp = tempdir().unwrap();
    let config = init_small(temp.path(), &[]);

    Command::cargo_bin("cellevo")
        .unwrap()
        .arg("reconstruct")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure();
}
