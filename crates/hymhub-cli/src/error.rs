//! Error types for the HymHub build driver
//!
//! Messages are user-facing: each names what went wrong and, where there is
//! one, the fix.

use hymhub_common::HymError;
use thiserror::Error;

/// Result type alias for build driver operations
pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Error, Debug)]
pub enum CliError {
    /// No stage flag was given on the command line
    #[error("please specify build task(s)")]
    NoStages,

    /// Species configurations could not be loaded; nothing was run
    #[error("{0}. Check the species' data.yml.")]
    Config(#[source] HymError),

    /// A download step failed
    #[error("Download failed for species '{species}': {source}")]
    Download {
        species: String,
        #[source]
        source: HymError,
    },

    /// Ingest settings from the environment are invalid
    #[error("Environment error: {0}. Check the HYMHUB_* variables.")]
    Environment(#[source] HymError),
}
