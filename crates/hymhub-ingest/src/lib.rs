//! HymHub Ingest Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Downloads the raw genome sequence, annotation, and proteins of each
//! species from its configured source.
//!
//! # Supported Data Sources
//!
//! - **NCBI**: scaffold or chromosome assemblies on the NCBI genomes tree
//! - **NCBI FlyBase mirror**: per-chromosome *Drosophila* release files
//! - **Custom**: named handlers for species hosted elsewhere (`download_pdom`)
//!
//! # Example
//!
//! ```no_run
//! use hymhub_ingest::{config::{IngestConfig, SpeciesConfig}, dispatch, fetch::Fetcher};
//!
//! #[tokio::main]
//! async fn main() -> hymhub_common::Result<()> {
//!     let fetcher = Fetcher::new(IngestConfig::from_env()?)?;
//!     let config = SpeciesConfig::load(".", "Amel")?;
//!     dispatch::download_task(&fetcher, &config, ".").await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod dispatch;
pub mod fetch;
pub mod ncbi;
pub mod pdom;
pub mod progress;

pub use config::{load_configs, IngestConfig, SpeciesConfig};
pub use dispatch::{download_task, plan_download, DownloadPlan, Strategy};
pub use fetch::{Fetcher, Transfer};
