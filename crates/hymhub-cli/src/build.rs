//! Build stage execution
//!
//! Configurations of all selected species are loaded before any stage runs,
//! so a bad `data.yml` aborts the build without touching the network.

use crate::error::{CliError, Result};
use crate::stages::{Stage, StageOutcome};
use hymhub_common::HymError;
use hymhub_ingest::progress::format_bytes;
use hymhub_ingest::{download_task, load_configs, Fetcher, IngestConfig, SpeciesConfig};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use tracing::{info, warn};

/// What to build, for which species, under which root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    pub root: PathBuf,
    pub species: Vec<String>,
    pub stages: Vec<Stage>,
}

/// Outcome of every requested stage, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub outcomes: Vec<(Stage, StageOutcome)>,
}

impl BuildSummary {
    pub fn not_implemented(&self) -> Vec<Stage> {
        self.outcomes
            .iter()
            .filter(|(_, outcome)| !outcome.is_completed())
            .map(|(stage, _)| *stage)
            .collect()
    }
}

impl fmt::Display for BuildSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Build summary:")?;
        for (stage, outcome) in &self.outcomes {
            match outcome {
                StageOutcome::Completed { species, bytes } => writeln!(
                    f,
                    "  {:<9} completed ({} species, {})",
                    stage.name(),
                    species,
                    format_bytes(*bytes)
                )?,
                StageOutcome::NotImplemented => {
                    writeln!(f, "  {:<9} not implemented, skipped", stage.name())?
                },
            }
        }
        Ok(())
    }
}

/// Run the requested stages in pipeline order
pub async fn run_build(options: &BuildOptions, ingest: IngestConfig) -> Result<BuildSummary> {
    let configs = load_configs(&options.root, &options.species).map_err(CliError::Config)?;
    info!(
        species = options.species.len(),
        root = %options.root.display(),
        "Loaded species configurations"
    );

    let mut summary = BuildSummary::default();
    for &stage in &options.stages {
        let outcome = match stage {
            Stage::Download => download(options, &configs, ingest.clone()).await?,
            other => {
                warn!(stage = %other, "Stage not implemented, skipping");
                StageOutcome::NotImplemented
            },
        };
        summary.outcomes.push((stage, outcome));
    }

    Ok(summary)
}

/// Download every selected species, one after another
async fn download(
    options: &BuildOptions,
    configs: &HashMap<String, SpeciesConfig>,
    ingest: IngestConfig,
) -> Result<StageOutcome> {
    let fetcher = Fetcher::new(ingest).map_err(CliError::Environment)?;

    let mut bytes = 0u64;
    for label in &options.species {
        let config = configs.get(label).ok_or_else(|| {
            CliError::Config(HymError::config(format!("no configuration loaded for species '{}'", label)))
        })?;
        bytes += download_task(&fetcher, config, &options.root)
            .await
            .map_err(|source| CliError::Download {
                species: label.clone(),
                source,
            })?;
    }

    Ok(StageOutcome::Completed {
        species: options.species.len(),
        bytes,
    })
}
