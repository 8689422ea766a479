//! *Polistes dominula* download handler (`download_handler: download_pdom`)
//!
//! The paper wasp genome is not on the NCBI genomes tree; its config names
//! the genome, annotation, and protein files by URL.

use crate::config::SpeciesConfig;
use crate::fetch::Transfer;
use hymhub_common::{HymError, Result, SpeciesLayout};

/// Genome, annotation, and protein transfers for the paper wasp.
///
/// All three URLs are required; a missing one fails before anything is
/// downloaded.
pub fn transfers(config: &SpeciesConfig, layout: &SpeciesLayout) -> Result<Vec<Transfer>> {
    let genome = required_url(
        config.genomeseq.as_ref().and_then(|g| g.url.as_deref()),
        config,
        "genomeseq.url",
    )?;
    let annotation = required_url(
        config.annotation.as_ref().and_then(|a| a.url.as_deref()),
        config,
        "annotation.url",
    )?;
    let proteins = required_url(
        config.proteins.as_ref().and_then(|p| p.url.as_deref()),
        config,
        "proteins.url",
    )?;

    Ok(vec![
        Transfer::single(genome, layout.genome_file()),
        Transfer::single(annotation, layout.annotation_file()),
        Transfer::single(proteins, layout.protein_file()),
    ])
}

fn required_url(url: Option<&str>, config: &SpeciesConfig, key: &str) -> Result<String> {
    url.map(str::to_string)
        .ok_or_else(|| HymError::config(format!("{}: missing '{}'", config.label, key)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const PDOM: &str = r#"
species: Polistes dominula
source: custom
download_handler: download_pdom
genomeseq:
  url: https://wasps.example.org/pdom/pdom-scaffolds-unmasked-r1.2.fa.gz
annotation:
  url: https://wasps.example.org/pdom/pdom-annot-r1.2.gff3.gz
proteins:
  url: https://wasps.example.org/pdom/pdom-annot-r1.2-proteins.fa.gz
"#;

    #[test]
    fn test_pdom_transfers() {
        let config = SpeciesConfig::from_yaml("Pdom", PDOM).unwrap();
        let transfers = transfers(&config, &SpeciesLayout::new("/hh", "Pdom")).unwrap();

        assert_eq!(transfers.len(), 3);
        assert_eq!(
            transfers[0].urls,
            vec!["https://wasps.example.org/pdom/pdom-scaffolds-unmasked-r1.2.fa.gz"]
        );
        assert_eq!(transfers[0].dest, PathBuf::from("/hh/species/Pdom/Pdom.orig.fa.gz"));
        assert_eq!(transfers[1].dest, PathBuf::from("/hh/species/Pdom/Pdom.orig.gff3.gz"));
        assert_eq!(transfers[2].dest, PathBuf::from("/hh/species/Pdom/Pdom.orig.faa.gz"));
    }

    #[test]
    fn test_missing_url() {
        let yaml = "species: Polistes dominula\nsource: custom\ndownload_handler: download_pdom\n";
        let config = SpeciesConfig::from_yaml("Pdom", yaml).unwrap();
        let err = transfers(&config, &SpeciesLayout::new("/hh", "Pdom")).unwrap_err();
        assert!(err.to_string().contains("genomeseq.url"));
    }
}
