//! Species configuration (`data.yml`) and ingest settings
//!
//! Every species directory carries a `data.yml` describing where its genome,
//! annotation, and proteins come from. Configs are loaded once per run and
//! never modified afterwards.

use hymhub_common::{HymError, Result, SpeciesLayout};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

// ============================================================================
// Ingest Configuration Constants
// ============================================================================

/// Root of the NCBI genomes tree when `HYMHUB_NCBI_URL` is not set.
pub const DEFAULT_NCBI_URL: &str = "https://ftp.ncbi.nlm.nih.gov/genomes";

/// Per-request timeout when `HYMHUB_HTTP_TIMEOUT` is not set.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Where a species' data is downloaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// NCBI genomes FTP tree
    Ncbi,
    /// FlyBase release mirrored on the NCBI genomes tree
    NcbiFlybase,
    /// Species-specific handler named by `download_handler`
    Custom,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Ncbi => write!(f, "ncbi"),
            DataSource::NcbiFlybase => write!(f, "ncbi_flybase"),
            DataSource::Custom => write!(f, "custom"),
        }
    }
}

/// How NCBI distributes a genome sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenomeSeqType {
    /// One file of unplaced scaffolds
    Scaffolds,
    /// One file per assembled chromosome
    Chromosomes,
}

/// Named download procedures for `source: custom`.
///
/// Add a variant here when another species needs its own procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DownloadHandler {
    #[serde(rename = "download_pdom")]
    DownloadPdom,
}

impl std::fmt::Display for DownloadHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DownloadHandler::DownloadPdom => write!(f, "download_pdom"),
        }
    }
}

/// `genomeseq` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenomeSeq {
    #[serde(rename = "type", default)]
    pub kind: Option<GenomeSeqType>,

    /// Scaffold file name (`type: scaffolds`)
    #[serde(default)]
    pub filename: Option<String>,

    /// File name prefix shared by all chromosome files (`type: chromosomes`)
    #[serde(default)]
    pub prefix: Option<String>,

    /// Chromosome names, in download order (`type: chromosomes`)
    #[serde(default)]
    pub chromosomes: Vec<String>,

    /// Direct URL, custom sources only
    #[serde(default)]
    pub url: Option<String>,
}

/// `annotation` and `proteins` sections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteFile {
    #[serde(default)]
    pub filename: Option<String>,

    #[serde(default)]
    pub url: Option<String>,
}

/// One chromosome of a FlyBase release on the NCBI mirror
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlybaseChromosome {
    /// Directory under the release, e.g. `CHR_2`
    pub dir: String,

    /// RefSeq accession, e.g. `NT_033778`
    pub accession: String,
}

/// `flybase` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlybaseRelease {
    /// Release directory, e.g. `RELEASE_5_48`
    pub release: String,

    pub chromosomes: Vec<FlybaseChromosome>,
}

/// Parsed `data.yml` for one species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesConfig {
    /// Species label (directory name), filled in by the loader
    #[serde(skip)]
    pub label: String,

    /// Scientific name, e.g. "Apis mellifera"
    pub species: String,

    /// Common name
    #[serde(default)]
    pub common: Option<String>,

    pub source: DataSource,

    #[serde(default)]
    pub genomeseq: Option<GenomeSeq>,

    #[serde(default)]
    pub annotation: Option<RemoteFile>,

    #[serde(default)]
    pub proteins: Option<RemoteFile>,

    #[serde(default)]
    pub flybase: Option<FlybaseRelease>,

    #[serde(default)]
    pub download_handler: Option<DownloadHandler>,
}

impl SpeciesConfig {
    /// Parse a config document for the species `label`
    pub fn from_yaml(label: &str, content: &str) -> Result<Self> {
        let mut config: SpeciesConfig = serde_yaml::from_str(content)?;
        config.label = label.to_string();
        Ok(config)
    }

    /// Load `<root>/species/<label>/data.yml`
    pub fn load(root: impl AsRef<Path>, label: &str) -> Result<Self> {
        let path = SpeciesLayout::new(root, label).config_file();
        if !path.exists() {
            return Err(HymError::config(format!(
                "missing configuration file {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_yaml(label, &content)
            .map_err(|e| HymError::config(format!("{}: {}", path.display(), e)))?;

        debug!(species = %label, source = %config.source, "Loaded configuration");
        Ok(config)
    }
}

/// Load the configuration of every species in `species`.
///
/// The first missing or malformed file aborts the load.
pub fn load_configs(
    root: impl AsRef<Path>,
    species: &[String],
) -> Result<HashMap<String, SpeciesConfig>> {
    let root = root.as_ref();
    let mut configs = HashMap::with_capacity(species.len());
    for label in species {
        configs.insert(label.clone(), SpeciesConfig::load(root, label)?);
    }
    Ok(configs)
}

/// Settings for talking to remote servers
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Root of the NCBI genomes tree, without trailing slash
    pub ncbi_base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            ncbi_base_url: DEFAULT_NCBI_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("HymHub/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl IngestConfig {
    /// Load settings from environment variables
    ///
    /// - `HYMHUB_NCBI_URL`: root of the NCBI genomes tree
    /// - `HYMHUB_HTTP_TIMEOUT`: request timeout in seconds
    /// - `HYMHUB_USER_AGENT`: user agent string
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("HYMHUB_NCBI_URL") {
            config.ncbi_base_url = url.trim_end_matches('/').to_string();
        }

        if let Ok(timeout) = std::env::var("HYMHUB_HTTP_TIMEOUT") {
            config.timeout_secs = timeout.parse().map_err(|_| {
                HymError::config(format!("HYMHUB_HTTP_TIMEOUT must be seconds, got '{}'", timeout))
            })?;
        }

        if let Ok(agent) = std::env::var("HYMHUB_USER_AGENT") {
            config.user_agent = agent;
        }

        Ok(config)
    }

    pub fn with_ncbi_base_url(mut self, url: impl Into<String>) -> Self {
        self.ncbi_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }
}
