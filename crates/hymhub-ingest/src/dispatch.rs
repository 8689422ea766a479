//! Download dispatch
//!
//! A species' config selects exactly one top-level procedure by `source`,
//! and for NCBI exactly one genome procedure by `genomeseq.type`. The choice
//! is made up front into a [`DownloadPlan`], so a bad config fails before any
//! network traffic.

use crate::config::{DataSource, DownloadHandler, GenomeSeqType, IngestConfig, SpeciesConfig};
use crate::fetch::{Fetcher, Transfer};
use crate::progress::format_bytes;
use crate::{ncbi, pdom};
use hymhub_common::{HymError, Result, SpeciesLayout};
use std::path::Path;
use tracing::info;

/// Named download procedure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    NcbiScaffolds,
    NcbiChromosomes,
    NcbiAnnotation,
    NcbiProteins,
    NcbiFlybase,
    Custom(DownloadHandler),
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::NcbiScaffolds => write!(f, "ncbi scaffolds"),
            Strategy::NcbiChromosomes => write!(f, "ncbi chromosomes"),
            Strategy::NcbiAnnotation => write!(f, "ncbi annotation"),
            Strategy::NcbiProteins => write!(f, "ncbi proteins"),
            Strategy::NcbiFlybase => write!(f, "ncbi flybase"),
            Strategy::Custom(handler) => write!(f, "custom {}", handler),
        }
    }
}

/// One procedure and the transfers it performs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadStep {
    pub strategy: Strategy,
    pub transfers: Vec<Transfer>,
}

/// Ordered download steps for one species
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadPlan {
    pub label: String,
    pub steps: Vec<DownloadStep>,
}

impl DownloadPlan {
    pub fn strategies(&self) -> Vec<Strategy> {
        self.steps.iter().map(|s| s.strategy).collect()
    }

    pub fn transfers(&self) -> impl Iterator<Item = &Transfer> {
        self.steps.iter().flat_map(|s| s.transfers.iter())
    }
}

/// Build the download plan for one species
pub fn plan_download(
    config: &SpeciesConfig,
    root: impl AsRef<Path>,
    ingest: &IngestConfig,
) -> Result<DownloadPlan> {
    let layout = SpeciesLayout::new(root, config.label.as_str());
    let base = ingest.ncbi_base_url.as_str();

    let steps = match config.source {
        DataSource::Ncbi => {
            let kind = config
                .genomeseq
                .as_ref()
                .and_then(|g| g.kind)
                .ok_or_else(|| {
                    HymError::config(format!(
                        "{}: source 'ncbi' needs 'genomeseq.type' (scaffolds or chromosomes)",
                        config.label
                    ))
                })?;

            let genome = match kind {
                GenomeSeqType::Scaffolds => DownloadStep {
                    strategy: Strategy::NcbiScaffolds,
                    transfers: vec![ncbi::scaffolds(config, &layout, base)?],
                },
                GenomeSeqType::Chromosomes => DownloadStep {
                    strategy: Strategy::NcbiChromosomes,
                    transfers: vec![ncbi::chromosomes(config, &layout, base)?],
                },
            };

            vec![
                genome,
                DownloadStep {
                    strategy: Strategy::NcbiAnnotation,
                    transfers: vec![ncbi::annotation(config, &layout, base)?],
                },
                DownloadStep {
                    strategy: Strategy::NcbiProteins,
                    transfers: vec![ncbi::proteins(config, &layout, base)?],
                },
            ]
        },
        DataSource::NcbiFlybase => vec![DownloadStep {
            strategy: Strategy::NcbiFlybase,
            transfers: ncbi::flybase(config, &layout, base)?,
        }],
        DataSource::Custom => {
            let handler = config.download_handler.ok_or_else(|| {
                HymError::config(format!(
                    "{}: source 'custom' needs a 'download_handler'",
                    config.label
                ))
            })?;

            let transfers = match handler {
                DownloadHandler::DownloadPdom => pdom::transfers(config, &layout)?,
            };
            vec![DownloadStep {
                strategy: Strategy::Custom(handler),
                transfers,
            }]
        },
    };

    Ok(DownloadPlan {
        label: config.label.clone(),
        steps,
    })
}

/// Run the download task for one species, returning the bytes received
pub async fn download_task(
    fetcher: &Fetcher,
    config: &SpeciesConfig,
    root: impl AsRef<Path>,
) -> Result<u64> {
    let plan = plan_download(config, root, fetcher.config())?;
    info!(
        species = %plan.label,
        source = %config.source,
        steps = plan.steps.len(),
        "Starting download"
    );

    let mut received = 0u64;
    for step in &plan.steps {
        info!(species = %plan.label, step = %step.strategy, "Running download step");
        for transfer in &step.transfers {
            received += fetcher.run(transfer).await?;
        }
    }

    info!(species = %plan.label, size = %format_bytes(received), "Download finished");
    Ok(received)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    const SCAFFOLDS: &str = r#"
species: Harpegnathos saltator
source: ncbi
genomeseq:
  type: scaffolds
  filename: hsal_ref_HarSal_1.0_chrUn.fa.gz
annotation:
  filename: ref_HarSal_1.0_top_level.gff3.gz
"#;

    const CHROMOSOMES: &str = r#"
species: Apis mellifera
source: ncbi
genomeseq:
  type: chromosomes
  prefix: amel_ref_Amel_4.5_
  chromosomes: [chrLG1, chrLG2]
annotation:
  filename: ref_Amel_4.5_top_level.gff3.gz
proteins:
  filename: protein.fa.gz
"#;

    const FLYBASE: &str = r#"
species: Drosophila melanogaster
source: ncbi_flybase
flybase:
  release: RELEASE_5_48
  chromosomes:
    - { dir: CHR_2, accession: NT_033778 }
"#;

    const PDOM: &str = r#"
species: Polistes dominula
source: custom
download_handler: download_pdom
genomeseq: { url: "https://wasps.example.org/pdom.fa.gz" }
annotation: { url: "https://wasps.example.org/pdom.gff3.gz" }
proteins: { url: "https://wasps.example.org/pdom.faa.gz" }
"#;

    fn plan(label: &str, yaml: &str) -> Result<DownloadPlan> {
        let config = SpeciesConfig::from_yaml(label, yaml).unwrap();
        plan_download(&config, "/hh", &IngestConfig::default())
    }

    #[test]
    fn test_ncbi_scaffolds_plan() {
        let plan = plan("Hsal", SCAFFOLDS).unwrap();
        assert_eq!(
            plan.strategies(),
            vec![Strategy::NcbiScaffolds, Strategy::NcbiAnnotation, Strategy::NcbiProteins]
        );
        assert_eq!(plan.transfers().count(), 3);
    }

    #[test]
    fn test_ncbi_chromosomes_plan() {
        let plan = plan("Amel", CHROMOSOMES).unwrap();
        assert_eq!(
            plan.strategies(),
            vec![Strategy::NcbiChromosomes, Strategy::NcbiAnnotation, Strategy::NcbiProteins]
        );
        assert_eq!(plan.steps[0].transfers[0].urls.len(), 2);
    }

    #[test]
    fn test_flybase_plan() {
        let plan = plan("Dmel", FLYBASE).unwrap();
        assert_eq!(plan.strategies(), vec![Strategy::NcbiFlybase]);
        assert_eq!(plan.transfers().count(), 3);
    }

    #[test]
    fn test_custom_plan() {
        let plan = plan("Pdom", PDOM).unwrap();
        assert_eq!(
            plan.strategies(),
            vec![Strategy::Custom(DownloadHandler::DownloadPdom)]
        );
    }

    #[test]
    fn test_ncbi_without_genome_type_fails() {
        let yaml = "species: Apis mellifera\nsource: ncbi\nannotation:\n  filename: a.gff3.gz\n";
        let err = plan("Amel", yaml).unwrap_err();
        assert!(matches!(err, HymError::Config(_)));
    }

    #[test]
    fn test_custom_without_handler_fails() {
        let yaml = "species: Polistes dominula\nsource: custom\n";
        let err = plan("Pdom", yaml).unwrap_err();
        assert!(err.to_string().contains("download_handler"));
    }

    #[tokio::test]
    async fn test_download_task_scaffolds() {
        let server = MockServer::start().await;
        let files = [
            ("/genomes/Harpegnathos_saltator/CHR_Un/hsal_ref_HarSal_1.0_chrUn.fa.gz", "genome"),
            ("/genomes/Harpegnathos_saltator/GFF/ref_HarSal_1.0_top_level.gff3.gz", "gff3"),
            ("/genomes/Harpegnathos_saltator/protein/protein.fa.gz", "protein"),
        ];
        for (p, body) in files {
            Mock::given(method("GET"))
                .and(path(p))
                .respond_with(ResponseTemplate::new(200).set_body_string(body))
                .expect(1)
                .mount(&server)
                .await;
        }

        let root = TempDir::new().unwrap();
        let ingest = IngestConfig::default().with_ncbi_base_url(format!("{}/genomes", server.uri()));
        let fetcher = Fetcher::new(ingest).unwrap();
        let config = SpeciesConfig::from_yaml("Hsal", SCAFFOLDS).unwrap();

        let received = download_task(&fetcher, &config, root.path()).await.unwrap();
        assert_eq!(received, ("genome".len() + "gff3".len() + "protein".len()) as u64);

        let layout = SpeciesLayout::new(root.path(), "Hsal");
        assert_eq!(std::fs::read_to_string(layout.genome_file()).unwrap(), "genome");
        assert_eq!(std::fs::read_to_string(layout.annotation_file()).unwrap(), "gff3");
        assert_eq!(std::fs::read_to_string(layout.protein_file()).unwrap(), "protein");
    }

    #[tokio::test]
    async fn test_download_task_network_failure_propagates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let root = TempDir::new().unwrap();
        let fetcher = Fetcher::new(IngestConfig::default().with_ncbi_base_url(server.uri())).unwrap();
        let config = SpeciesConfig::from_yaml("Hsal", SCAFFOLDS).unwrap();

        let err = download_task(&fetcher, &config, root.path()).await.unwrap_err();
        assert!(matches!(err, HymError::Network(_)));
    }
}
