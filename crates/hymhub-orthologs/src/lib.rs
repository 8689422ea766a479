//! HymHub Ortholog Selection
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Selects conserved orthologs from a hiLocus table: hiLoci spanning
//! Hymenoptera or Insects that have representatives in ants, bees,
//! *Polistes dominula*, and *Nasonia vitripennis*. Each selected member is
//! reported with the mRNA and protein of its iLocus.
//!
//! - **Lineages**: species membership and single-copy rules
//! - **Mapping**: per-species iLocus -> (mRNA, protein) table
//! - **Selector**: hiLocus filtering and the tab-separated report

pub mod lineage;
pub mod mapping;
pub mod selector;

use clap::Parser;
use std::path::PathBuf;

pub use lineage::{CopyMode, Lineage, Member, LINEAGES};
pub use mapping::{IsoformMap, Isoform};
pub use selector::{HilocusRecord, OrthologRow, OrthologSelector, SelectionStats};

/// Report conserved orthologs of a hiLocus table
#[derive(Parser, Debug)]
#[command(name = "hilocus-conserved")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// hiLocus table (tab-separated); reads standard input if omitted or "-"
    pub hiloci: Option<PathBuf>,

    /// Keep one representative of multi-copy species instead of skipping
    #[arg(short, long)]
    pub multiple: bool,

    /// HymHub root directory
    #[arg(short, long, default_value = ".")]
    pub rootdir: PathBuf,

    /// Comma-separated species whose mappings are loaded
    #[arg(long, value_name = "LIST")]
    pub species: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn copy_mode(&self) -> CopyMode {
        if self.multiple {
            CopyMode::Representative
        } else {
            CopyMode::SingleCopy
        }
    }

    pub fn species_list(&self) -> Vec<String> {
        match self.species {
            Some(ref list) => hymhub_common::parse_species_list(list),
            None => hymhub_common::default_species(),
        }
    }

    /// `None` when the table comes from standard input
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.hiloci.as_ref().filter(|p| p.as_os_str() != "-")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["hilocus-conserved"]).unwrap();
        assert_eq!(cli.copy_mode(), CopyMode::SingleCopy);
        assert_eq!(cli.rootdir, PathBuf::from("."));
        assert_eq!(cli.species_list().len(), 16);
        assert!(cli.input_path().is_none());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from([
            "hilocus-conserved",
            "-m",
            "-r",
            "/data/hymhub",
            "--species",
            "Amel,Pdom,Nvit",
            "hiloci.tsv",
        ])
        .unwrap();
        assert_eq!(cli.copy_mode(), CopyMode::Representative);
        assert_eq!(cli.species_list(), vec!["Amel", "Pdom", "Nvit"]);
        assert_eq!(cli.input_path(), Some(&PathBuf::from("hiloci.tsv")));
    }

    #[test]
    fn test_dash_means_stdin() {
        let cli = Cli::try_parse_from(["hilocus-conserved", "-"]).unwrap();
        assert!(cli.input_path().is_none());
    }
}
