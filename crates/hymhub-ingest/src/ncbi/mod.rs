//! NCBI genomes tree
//!
//! Remote layout, relative to the configured base URL, for a species whose
//! scientific name is `Apis mellifera`:
//!
//! - `Apis_mellifera/CHR_Un/<scaffold file>`
//! - `Apis_mellifera/Assembled_chromosomes/seq/<prefix><chromosome>.fa.gz`
//! - `Apis_mellifera/GFF/<annotation file>`
//! - `Apis_mellifera/protein/<protein file>`
//!
//! The FlyBase release of *Drosophila melanogaster* is mirrored per
//! chromosome under `Drosophila_melanogaster/<release>/<dir>/<accession>.*`.

use crate::config::{GenomeSeq, SpeciesConfig};
use crate::fetch::Transfer;
use hymhub_common::{HymError, Result, SpeciesLayout};

/// Protein file name when the config does not give one
pub const DEFAULT_PROTEIN_FILE: &str = "protein.fa.gz";

const FLYBASE_SPECIES_DIR: &str = "Drosophila_melanogaster";

/// Directory name of a species on the genomes tree
pub fn species_dir(scientific_name: &str) -> String {
    scientific_name.trim().replace(' ', "_")
}

fn species_url(base: &str, config: &SpeciesConfig) -> String {
    format!("{}/{}", base, species_dir(&config.species))
}

fn genomeseq(config: &SpeciesConfig) -> Result<&GenomeSeq> {
    config.genomeseq.as_ref().ok_or_else(|| {
        HymError::config(format!("{}: missing 'genomeseq' section", config.label))
    })
}

/// Unplaced scaffolds, one file
pub fn scaffolds(config: &SpeciesConfig, layout: &SpeciesLayout, base: &str) -> Result<Transfer> {
    let filename = genomeseq(config)?.filename.as_deref().ok_or_else(|| {
        HymError::config(format!(
            "{}: scaffold genomes need 'genomeseq.filename'",
            config.label
        ))
    })?;

    Ok(Transfer::single(
        format!("{}/CHR_Un/{}", species_url(base, config), filename),
        layout.genome_file(),
    ))
}

/// Assembled chromosomes, one file each, concatenated in config order
pub fn chromosomes(config: &SpeciesConfig, layout: &SpeciesLayout, base: &str) -> Result<Transfer> {
    let seq = genomeseq(config)?;
    let prefix = seq.prefix.as_deref().ok_or_else(|| {
        HymError::config(format!(
            "{}: chromosome genomes need 'genomeseq.prefix'",
            config.label
        ))
    })?;
    if seq.chromosomes.is_empty() {
        return Err(HymError::config(format!(
            "{}: chromosome genomes need a non-empty 'genomeseq.chromosomes' list",
            config.label
        )));
    }

    let root = species_url(base, config);
    let urls = seq
        .chromosomes
        .iter()
        .map(|chrom| format!("{}/Assembled_chromosomes/seq/{}{}.fa.gz", root, prefix, chrom))
        .collect();

    Ok(Transfer::concat(urls, layout.genome_file()))
}

/// Genome annotation (GFF3)
pub fn annotation(config: &SpeciesConfig, layout: &SpeciesLayout, base: &str) -> Result<Transfer> {
    let filename = config
        .annotation
        .as_ref()
        .and_then(|a| a.filename.as_deref())
        .ok_or_else(|| HymError::config(format!("{}: missing 'annotation.filename'", config.label)))?;

    Ok(Transfer::single(
        format!("{}/GFF/{}", species_url(base, config), filename),
        layout.annotation_file(),
    ))
}

/// Protein sequences
pub fn proteins(config: &SpeciesConfig, layout: &SpeciesLayout, base: &str) -> Result<Transfer> {
    let filename = config
        .proteins
        .as_ref()
        .and_then(|p| p.filename.as_deref())
        .unwrap_or(DEFAULT_PROTEIN_FILE);

    Ok(Transfer::single(
        format!("{}/protein/{}", species_url(base, config), filename),
        layout.protein_file(),
    ))
}

/// Genome, annotation, and proteins of a FlyBase release.
///
/// The mirror serves plain text per chromosome; each kind is concatenated
/// and compressed into the same output files the other sources produce.
pub fn flybase(config: &SpeciesConfig, layout: &SpeciesLayout, base: &str) -> Result<Vec<Transfer>> {
    let release = config.flybase.as_ref().ok_or_else(|| {
        HymError::config(format!("{}: missing 'flybase' section", config.label))
    })?;
    if release.chromosomes.is_empty() {
        return Err(HymError::config(format!(
            "{}: 'flybase.chromosomes' is empty",
            config.label
        )));
    }

    let urls_for = |ext: &str| -> Vec<String> {
        release
            .chromosomes
            .iter()
            .map(|chrom| {
                format!(
                    "{}/{}/{}/{}/{}.{}",
                    base, FLYBASE_SPECIES_DIR, release.release, chrom.dir, chrom.accession, ext
                )
            })
            .collect()
    };

    Ok(vec![
        Transfer::concat_compressed(urls_for("fna"), layout.genome_file()),
        Transfer::concat_compressed(urls_for("gff"), layout.annotation_file()),
        Transfer::concat_compressed(urls_for("faa"), layout.protein_file()),
    ])
}
