//! iLocus -> (mRNA, protein) mapping
//!
//! Built per species from two whitespace-separated, two-column files:
//! `<Sp>.ilocus.mrnas.txt` (iLocus, mRNA) and `<Sp>.protein2ilocus.txt`
//! (protein, iLocus). Entries are keyed by species and iLocus ID together, so
//! identical IDs from different species never overwrite each other.

use hymhub_common::{HymError, Result, SpeciesLayout};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// The transcript and protein an iLocus resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Isoform {
    pub mrna: String,
    pub protein: String,
}

/// Mapping from (species, iLocus ID) to [`Isoform`]
#[derive(Debug, Default)]
pub struct IsoformMap {
    species: HashMap<String, HashMap<String, Isoform>>,
}

impl IsoformMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the mapping for every species in `species` from the files
    /// under `root`. Any missing file or unresolvable entry is fatal.
    pub fn build(root: impl AsRef<Path>, species: &[String]) -> Result<Self> {
        let root = root.as_ref();
        let mut map = Self::new();

        for label in species {
            let layout = SpeciesLayout::new(root, label.as_str());
            let mrna_path = layout.ilocus_mrnas_file();
            let protein_path = layout.protein2ilocus_file();

            let mrnas = BufReader::new(open(&mrna_path)?);
            let proteins = BufReader::new(open(&protein_path)?);
            map.add_species(
                label,
                mrnas,
                &mrna_path.display().to_string(),
                proteins,
                &protein_path.display().to_string(),
            )?;
        }

        info!(species = species.len(), iloci = map.len(), "Built iLocus mapping");
        Ok(map)
    }

    /// Add one species from an iLocus->mRNA table and a protein->iLocus table.
    ///
    /// The mRNA table is read fully first; each protein line must then name an
    /// iLocus present in it. Repeated keys keep the last value.
    pub fn add_species<M: BufRead, P: BufRead>(
        &mut self,
        label: &str,
        mrnas: M,
        mrna_name: &str,
        proteins: P,
        protein_name: &str,
    ) -> Result<()> {
        let mut ilocus2mrna: HashMap<String, String> = HashMap::new();
        let mut repeated = 0usize;
        for_each_pair(mrnas, mrna_name, |ilocus, mrna, _| {
            if ilocus2mrna.insert(ilocus, mrna).is_some() {
                repeated += 1;
            }
            Ok(())
        })?;
        if repeated > 0 {
            warn!(species = %label, file = %mrna_name, repeated, "Repeated iLocus IDs, keeping last");
        }

        let table = self.species.entry(label.to_string()).or_default();
        let mut repeated = 0usize;
        for_each_pair(proteins, protein_name, |protein, ilocus, line| {
            let mrna = ilocus2mrna.get(&ilocus).ok_or_else(|| {
                HymError::lookup(format!(
                    "{} line {}: iLocus '{}' of protein '{}' is not in the mRNA table for {}",
                    protein_name, line, ilocus, protein, label
                ))
            })?;
            let isoform = Isoform {
                mrna: mrna.clone(),
                protein,
            };
            if table.insert(ilocus, isoform).is_some() {
                repeated += 1;
            }
            Ok(())
        })?;
        if repeated > 0 {
            warn!(species = %label, file = %protein_name, repeated, "Repeated iLocus IDs, keeping last");
        }

        debug!(species = %label, iloci = table.len(), "Loaded species mapping");
        Ok(())
    }

    pub fn get(&self, species: &str, ilocus: &str) -> Option<&Isoform> {
        self.species.get(species).and_then(|t| t.get(ilocus))
    }

    /// Like [`get`](Self::get), but an unknown iLocus is a lookup error
    pub fn resolve(&self, species: &str, ilocus: &str) -> Result<&Isoform> {
        self.get(species, ilocus).ok_or_else(|| {
            HymError::lookup(format!("no mRNA/protein mapping for {} iLocus '{}'", species, ilocus))
        })
    }

    /// Total number of mapped iLoci across species
    pub fn len(&self) -> usize {
        self.species.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        HymError::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.display(), e),
        ))
    })
}

/// Call `f(first, second, line_number)` for every non-blank line of a
/// two-column file
fn for_each_pair<R, F>(reader: R, name: &str, mut f: F) -> Result<()>
where
    R: BufRead,
    F: FnMut(String, String, usize) -> Result<()>,
{
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = idx + 1;
        let mut fields = line.split_whitespace();
        match (fields.next(), fields.next(), fields.next()) {
            (None, _, _) => continue,
            (Some(first), Some(second), None) => f(first.to_string(), second.to_string(), lineno)?,
            _ => {
                let found = line.split_whitespace().count();
                return Err(HymError::parse(
                    name,
                    lineno,
                    format!("expected 2 columns, found {}", found),
                ));
            },
        }
    }
    Ok(())
}
