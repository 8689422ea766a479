//! Common types used across HymHub

use std::path::{Path, PathBuf};

/// Labels of every species HymHub curates, in processing order.
pub const ALL_SPECIES: [&str; 16] = [
    "Acep", "Ador", "Aech", "Aflo", "Amel", "Bimp", "Bter", "Cflo", "Dmel", "Hsal", "Mrot",
    "Nvit", "Pbar", "Pdom", "Sinv", "Tcas",
];

/// The full species list as owned labels
pub fn default_species() -> Vec<String> {
    ALL_SPECIES.iter().map(|s| s.to_string()).collect()
}

/// Parse a comma-separated species selection such as `"Amel,Hsal,Nvit"`.
///
/// Surrounding whitespace and empty items are dropped; order is preserved.
pub fn parse_species_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// File layout of one species under the HymHub root directory.
///
/// Everything for species `Amel` lives in `<root>/species/Amel/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesLayout {
    root: PathBuf,
    label: String,
}

impl SpeciesLayout {
    pub fn new(root: impl AsRef<Path>, label: impl Into<String>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// `<root>/species/<label>`
    pub fn dir(&self) -> PathBuf {
        self.root.join("species").join(&self.label)
    }

    /// Per-species configuration, `data.yml`
    pub fn config_file(&self) -> PathBuf {
        self.dir().join("data.yml")
    }

    /// Two columns: iLocus ID, mRNA ID
    pub fn ilocus_mrnas_file(&self) -> PathBuf {
        self.file_with_suffix("ilocus.mrnas.txt")
    }

    /// Two columns: protein ID, iLocus ID
    pub fn protein2ilocus_file(&self) -> PathBuf {
        self.file_with_suffix("protein2ilocus.txt")
    }

    /// Raw genome sequence as downloaded
    pub fn genome_file(&self) -> PathBuf {
        self.file_with_suffix("orig.fa.gz")
    }

    /// Raw genome annotation as downloaded
    pub fn annotation_file(&self) -> PathBuf {
        self.file_with_suffix("orig.gff3.gz")
    }

    /// Raw protein sequences as downloaded
    pub fn protein_file(&self) -> PathBuf {
        self.file_with_suffix("orig.faa.gz")
    }

    fn file_with_suffix(&self, suffix: &str) -> PathBuf {
        self.dir().join(format!("{}.{}", self.label, suffix))
    }
}
