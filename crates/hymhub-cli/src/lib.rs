//! HymHub Build Driver
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Runs the requested build stages for each selected species.
//!
//! # Stages
//!
//! - **download** (`-d`): fetch genome, annotation, and proteins
//! - **format** (`-f`), **types** (`-t`), **stats** (`-s`), **cleanup** (`-c`):
//!   accepted, reported as not implemented

pub mod build;
pub mod error;
pub mod stages;

pub use build::{run_build, BuildOptions, BuildSummary};
pub use error::{CliError, Result};
pub use stages::{Stage, StageOutcome};

use clap::Parser;
use std::path::PathBuf;

/// HymHub - Hymenoptera genome data hub build
#[derive(Parser, Debug)]
#[command(name = "hymhub")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// HymHub root directory
    #[arg(short, long, default_value = ".")]
    pub root: PathBuf,

    /// Comma-separated list of species labels; defaults to all 16
    #[arg(long, value_name = "LIST")]
    pub species: Option<String>,

    /// Number of processors (only 1 is supported)
    #[arg(short = 'p', long = "num_procs", value_name = "N", default_value_t = 1)]
    pub num_procs: usize,

    /// Log file; defaults to standard error
    #[arg(short, long, value_name = "LOG")]
    pub logfile: Option<PathBuf>,

    /// Download data files
    #[arg(short, long)]
    pub download: bool,

    /// Format data files
    #[arg(short, long)]
    pub format: bool,

    /// Compute type-specific sequence files
    #[arg(short, long)]
    pub types: bool,

    /// Compute statistics
    #[arg(short, long)]
    pub stats: bool,

    /// Remove intermediate files
    #[arg(short, long)]
    pub cleanup: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Requested stages in execution order
    pub fn stages(&self) -> Vec<Stage> {
        [
            (self.download, Stage::Download),
            (self.format, Stage::Format),
            (self.types, Stage::Types),
            (self.stats, Stage::Stats),
            (self.cleanup, Stage::Cleanup),
        ]
        .into_iter()
        .filter_map(|(requested, stage)| requested.then_some(stage))
        .collect()
    }

    pub fn species_list(&self) -> Vec<String> {
        match self.species {
            Some(ref list) => hymhub_common::parse_species_list(list),
            None => hymhub_common::default_species(),
        }
    }

    /// Options for [`run_build`]; fails when no stage was requested
    pub fn build_options(&self) -> Result<BuildOptions> {
        let stages = self.stages();
        if stages.is_empty() {
            return Err(CliError::NoStages);
        }

        Ok(BuildOptions {
            root: self.root.clone(),
            species: self.species_list(),
            stages,
        })
    }
}
