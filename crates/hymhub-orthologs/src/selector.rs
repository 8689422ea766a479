//! hiLocus filtering and the ortholog report
//!
//! A hiLocus is reported when its scope is Hymenoptera or Insects, both
//! Pdom and Nvit are among its species, and every lineage rule finds
//! members. Each member becomes one report row, resolved through the
//! [`IsoformMap`].

use crate::lineage::{CopyMode, Member, LINEAGES};
use crate::mapping::IsoformMap;
use hymhub_common::{HymError, Result};
use std::io::{Read, Write};
use tracing::{debug, info};

/// Column header of the report
pub const REPORT_HEADER: [&str; 6] = ["hiLocus", "iLocus", "Species", "Lineage", "Mrna", "Protein"];

/// Scope labels a hiLocus may carry to be considered
pub const ACCEPTED_SCOPES: [&str; 2] = ["Hymenoptera", "Insects"];

/// Species that must appear in every reported hiLocus
pub const REQUIRED_SPECIES: [&str; 2] = ["Pdom", "Nvit"];

const FIELD_ID: usize = 0;
const FIELD_SCOPE: usize = 4;
const FIELD_ILOCI: usize = 5;
const FIELD_SPECIES: usize = 6;
const MIN_FIELDS: usize = 7;

/// The columns of a hiLocus table row the selector uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HilocusRecord {
    pub id: String,
    pub scope: String,
    pub iloci: Vec<String>,
    pub species: Vec<String>,
}

impl HilocusRecord {
    pub fn from_fields<'a, I>(fields: I, source: &str, line: usize) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let values: Vec<&str> = fields.into_iter().collect();
        if values.len() < MIN_FIELDS {
            return Err(HymError::parse(
                source,
                line,
                format!("expected at least {} fields, found {}", MIN_FIELDS, values.len()),
            ));
        }

        Ok(Self {
            id: values[FIELD_ID].to_string(),
            scope: values[FIELD_SCOPE].to_string(),
            iloci: split_list(values[FIELD_ILOCI]),
            species: split_list(values[FIELD_SPECIES]),
        })
    }

    /// Scope and species checks, before any lineage classification
    pub fn is_candidate(&self) -> bool {
        ACCEPTED_SCOPES.contains(&self.scope.as_str())
            && REQUIRED_SPECIES
                .iter()
                .all(|required| self.species.iter().any(|s| s == required))
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// One line of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrthologRow {
    pub hilocus: String,
    pub ilocus: String,
    pub species: String,
    pub lineage: String,
    pub mrna: String,
    pub protein: String,
}

impl OrthologRow {
    fn fields(&self) -> [&str; 6] {
        [
            &self.hilocus,
            &self.ilocus,
            &self.species,
            &self.lineage,
            &self.mrna,
            &self.protein,
        ]
    }
}

/// Counters for one selector run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionStats {
    pub records: usize,
    pub candidates: usize,
    pub selected: usize,
    pub rows: usize,
}

/// Selects conserved single-copy orthologs from a hiLocus table
pub struct OrthologSelector<'a> {
    mapping: &'a IsoformMap,
    mode: CopyMode,
}

impl<'a> OrthologSelector<'a> {
    pub fn new(mapping: &'a IsoformMap, mode: CopyMode) -> Self {
        Self { mapping, mode }
    }

    /// Lineage members of a record in report order, or `None` if the record
    /// is filtered out
    pub fn members(&self, record: &HilocusRecord) -> Option<Vec<Member>> {
        if !record.is_candidate() {
            return None;
        }

        let mut members = Vec::new();
        for lineage in LINEAGES {
            match lineage.classify(&record.iloci, self.mode) {
                Some(found) => members.extend(found),
                None => {
                    debug!(hilocus = %record.id, lineage = %lineage, "No representative, skipping");
                    return None;
                },
            }
        }
        Some(members)
    }

    /// Report rows for one record; empty if the record is filtered out
    pub fn select(&self, record: &HilocusRecord) -> Result<Vec<OrthologRow>> {
        let Some(members) = self.members(record) else {
            return Ok(Vec::new());
        };

        members
            .into_iter()
            .map(|member| {
                let isoform = self.mapping.resolve(&member.species, &member.ilocus)?;
                Ok(OrthologRow {
                    hilocus: record.id.clone(),
                    ilocus: member.ilocus,
                    species: member.species,
                    lineage: member.lineage.to_string(),
                    mrna: isoform.mrna.clone(),
                    protein: isoform.protein.clone(),
                })
            })
            .collect()
    }

    /// Read a tab-separated hiLocus table from `input` and write the report,
    /// header first, to `output`
    pub fn run<R: Read, W: Write>(&self, input: R, output: W, source: &str) -> Result<SelectionStats> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(input);
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(output);

        writer.write_record(REPORT_HEADER)?;

        let mut stats = SelectionStats::default();
        let mut row = csv::StringRecord::new();
        while reader.read_record(&mut row)? {
            stats.records += 1;
            let line = row.position().map(|p| p.line() as usize).unwrap_or(stats.records);
            let record = HilocusRecord::from_fields(row.iter(), source, line)?;
            if record.is_candidate() {
                stats.candidates += 1;
            }

            let selected = self.select(&record)?;
            if !selected.is_empty() {
                stats.selected += 1;
            }
            for out in &selected {
                writer.write_record(out.fields())?;
                stats.rows += 1;
            }
        }

        writer.flush()?;
        info!(
            records = stats.records,
            candidates = stats.candidates,
            selected = stats.selected,
            rows = stats.rows,
            mode = ?self.mode,
            "hiLocus selection finished"
        );
        Ok(stats)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// One iLocus per species of interest, each mapped to XM_/XP_ IDs
    fn mapping() -> IsoformMap {
        let mut map = IsoformMap::new();
        for species in ["Hsal", "Cflo", "Amel", "Bter", "Pdom", "Nvit"] {
            let mrnas = format!("{s}ILC-1 {s}_XM1\n{s}ILC-2 {s}_XM2\n", s = species);
            let proteins = format!("{s}_XP1 {s}ILC-1\n{s}_XP2 {s}ILC-2\n", s = species);
            map.add_species(
                species,
                Cursor::new(mrnas),
                "mrnas",
                Cursor::new(proteins),
                "proteins",
            )
            .unwrap();
        }
        map
    }

    fn row(id: &str, scope: &str, iloci: &str, species: &str) -> String {
        format!("{id}\tx\tx\tx\t{scope}\t{iloci}\t{species}\n")
    }

    fn run(input: &str, mode: CopyMode) -> (String, SelectionStats) {
        let map = mapping();
        let selector = OrthologSelector::new(&map, mode);
        let mut out = Vec::new();
        let stats = selector.run(Cursor::new(input), &mut out, "hiloci.tsv").unwrap();
        (String::from_utf8(out).unwrap(), stats)
    }

    const FULL_ILOCI: &str = "HsalILC-1,CfloILC-1,AmelILC-1,PdomILC-1,NvitILC-1,DmelILC-9";
    const FULL_SPECIES: &str = "Amel,Cflo,Dmel,Hsal,Nvit,Pdom";

    #[test]
    fn test_conserved_hilocus_rows() {
        let input = row("HymHILC-0001", "Insects", FULL_ILOCI, FULL_SPECIES);
        let (out, stats) = run(&input, CopyMode::SingleCopy);

        let expected = "hiLocus\tiLocus\tSpecies\tLineage\tMrna\tProtein\n\
            HymHILC-0001\tHsalILC-1\tHsal\tAnts\tHsal_XM1\tHsal_XP1\n\
            HymHILC-0001\tCfloILC-1\tCflo\tAnts\tCflo_XM1\tCflo_XP1\n\
            HymHILC-0001\tAmelILC-1\tAmel\tBees\tAmel_XM1\tAmel_XP1\n\
            HymHILC-0001\tPdomILC-1\tPdom\tVespids\tPdom_XM1\tPdom_XP1\n\
            HymHILC-0001\tNvitILC-1\tNvit\tParasitoids\tNvit_XM1\tNvit_XP1\n";
        assert_eq!(out, expected);
        assert_eq!(stats.rows, 2 + 1 + 1 + 1);
        assert_eq!(stats.selected, 1);
    }

    #[test]
    fn test_missing_nvit_species_skipped() {
        let input = row("HymHILC-0002", "Hymenoptera", FULL_ILOCI, "Amel,Cflo,Hsal,Pdom");
        let (out, stats) = run(&input, CopyMode::SingleCopy);
        assert_eq!(out, "hiLocus\tiLocus\tSpecies\tLineage\tMrna\tProtein\n");
        assert_eq!(stats.candidates, 0);
    }

    #[test]
    fn test_other_scope_skipped() {
        let input = row("HymHILC-0003", "Arthropoda", FULL_ILOCI, FULL_SPECIES);
        let (_, stats) = run(&input, CopyMode::SingleCopy);
        assert_eq!(stats.rows, 0);
    }

    #[test]
    fn test_absent_lineage_skipped() {
        let input = row(
            "HymHILC-0004",
            "Hymenoptera",
            "AmelILC-1,PdomILC-1,NvitILC-1",
            "Amel,Nvit,Pdom",
        );
        let (_, stats) = run(&input, CopyMode::SingleCopy);
        assert_eq!(stats.candidates, 1);
        assert_eq!(stats.selected, 0);
    }

    #[test]
    fn test_multiple_copies_depend_on_mode() {
        let iloci = "HsalILC-1,AmelILC-1,AmelILC-2,PdomILC-1,NvitILC-1";
        let input = row("HymHILC-0005", "Insects", iloci, "Amel,Hsal,Nvit,Pdom");

        let (_, single) = run(&input, CopyMode::SingleCopy);
        assert_eq!(single.rows, 0);

        let (out, representative) = run(&input, CopyMode::Representative);
        assert_eq!(representative.rows, 4);
        assert!(out.contains("AmelILC-1\tAmel\tBees"));
        assert!(!out.contains("AmelILC-2"));
    }

    #[test]
    fn test_header_row_filtered() {
        let mut input = String::from("ID\tLength\tiLoci\tGenes\tScope\tMembers\tSpecies\n");
        input.push_str(&row("HymHILC-0006", "Insects", FULL_ILOCI, FULL_SPECIES));
        let (_, stats) = run(&input, CopyMode::SingleCopy);
        assert_eq!(stats.records, 2);
        assert_eq!(stats.rows, 5);
    }

    #[test]
    fn test_unmapped_member_is_fatal() {
        let iloci = "HsalILC-7,AmelILC-1,PdomILC-1,NvitILC-1";
        let input = row("HymHILC-0007", "Insects", iloci, "Amel,Hsal,Nvit,Pdom");
        let map = mapping();
        let selector = OrthologSelector::new(&map, CopyMode::SingleCopy);
        let err = selector
            .run(Cursor::new(input), Vec::new(), "hiloci.tsv")
            .unwrap_err();
        assert!(matches!(err, HymError::Lookup(_)));
    }

    #[test]
    fn test_short_row_is_parse_error() {
        let map = mapping();
        let selector = OrthologSelector::new(&map, CopyMode::SingleCopy);
        let err = selector
            .run(Cursor::new("HymHILC-0008\tx\tx\n"), Vec::new(), "hiloci.tsv")
            .unwrap_err();
        match err {
            HymError::Parse { file, line, .. } => {
                assert_eq!(file, "hiloci.tsv");
                assert_eq!(line, 1);
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rerun_is_identical() {
        let mut input = row("HymHILC-0001", "Insects", FULL_ILOCI, FULL_SPECIES);
        input.push_str(&row(
            "HymHILC-0009",
            "Hymenoptera",
            "NvitILC-2,PdomILC-2,BterILC-2,HsalILC-2",
            "Bter,Hsal,Nvit,Pdom",
        ));
        let (first, _) = run(&input, CopyMode::SingleCopy);
        let (second, _) = run(&input, CopyMode::SingleCopy);
        assert_eq!(first, second);
        assert_eq!(first.lines().count(), 1 + 5 + 4);
    }
}
