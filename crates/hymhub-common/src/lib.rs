//! HymHub Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging setup, and error handling for the HymHub workspace.
//!
//! - **Error Handling**: the fatal error taxonomy shared by every stage
//! - **Logging**: tracing subscriber setup writing to stderr or a log file
//! - **Types**: species labels and the per-species file layout

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{HymError, Result};
pub use types::{default_species, parse_species_list, SpeciesLayout, ALL_SPECIES};
