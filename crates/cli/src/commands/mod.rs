pub mod init;
pub mod reconstruct;
pub mod run;

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use cellevo_sim::simulation::Configuration;
use indicatif::{ProgressBar, ProgressStyle};

/// Load a configuration file, applying a seed override.
pub fn load_config(path: &Path, seed: Option<u64>) -> Result<Configuration> {
    let mut config = Configuration::load(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    if seed.is_some() {
        config.execution.seed = seed;
    }
    Ok(config)
}

/// A spinner for long running steps, or `None` when hidden.
pub fn spinner(message: &str, show: bool) -> Result<Option<ProgressBar>> {
    if !show {
        return Ok(None);
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .context("Invalid progress template")?,
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(Some(pb))
}
