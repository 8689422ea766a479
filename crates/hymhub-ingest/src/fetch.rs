//! HTTP transfers from remote servers to species directories

use crate::config::IngestConfig;
use crate::progress::{create_download_progress, format_bytes};
use flate2::write::GzEncoder;
use flate2::Compression;
use futures::StreamExt;
use hymhub_common::{HymError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// One output file assembled from one or more remote files.
///
/// The payloads of `urls` are written to `dest` back to back, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub urls: Vec<String>,
    pub dest: PathBuf,
    /// Gzip-compress the payload while writing it
    pub compress: bool,
}

impl Transfer {
    /// A single remote file saved as-is
    pub fn single(url: impl Into<String>, dest: impl Into<PathBuf>) -> Self {
        Self {
            urls: vec![url.into()],
            dest: dest.into(),
            compress: false,
        }
    }

    /// Several remote files concatenated as-is
    pub fn concat(urls: Vec<String>, dest: impl Into<PathBuf>) -> Self {
        Self {
            urls,
            dest: dest.into(),
            compress: false,
        }
    }

    /// Several plain-text remote files concatenated and gzip-compressed
    pub fn concat_compressed(urls: Vec<String>, dest: impl Into<PathBuf>) -> Self {
        Self {
            urls,
            dest: dest.into(),
            compress: true,
        }
    }
}

/// Runs transfers over HTTP(S)
pub struct Fetcher {
    client: reqwest::Client,
    config: IngestConfig,
}

impl Fetcher {
    pub fn new(config: IngestConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Run one transfer, returning the number of bytes received.
    ///
    /// A failed transfer removes the partially written file.
    pub async fn run(&self, transfer: &Transfer) -> Result<u64> {
        if let Some(parent) = transfer.dest.parent() {
            std::fs::create_dir_all(parent)?;
        }

        match self.write_transfer(transfer).await {
            Ok(received) => {
                info!(
                    dest = %transfer.dest.display(),
                    files = transfer.urls.len(),
                    size = %format_bytes(received),
                    "Saved"
                );
                Ok(received)
            },
            Err(e) => {
                if let Err(rm) = std::fs::remove_file(&transfer.dest) {
                    warn!(dest = %transfer.dest.display(), error = %rm, "Could not remove partial file");
                }
                Err(e)
            },
        }
    }

    async fn write_transfer(&self, transfer: &Transfer) -> Result<u64> {
        let label = file_label(&transfer.dest);
        let file = BufWriter::new(File::create(&transfer.dest)?);
        let mut received = 0u64;

        if transfer.compress {
            let mut encoder = GzEncoder::new(file, Compression::default());
            for url in &transfer.urls {
                received += self.stream_into(url, &mut encoder, &label).await?;
            }
            encoder.finish()?.flush()?;
        } else {
            let mut writer = file;
            for url in &transfer.urls {
                received += self.stream_into(url, &mut writer, &label).await?;
            }
            writer.flush()?;
        }

        Ok(received)
    }

    /// Stream the body of `url` into `writer`
    async fn stream_into<W: Write>(&self, url: &str, writer: &mut W, label: &str) -> Result<u64> {
        info!(url = %url, "Downloading");
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(HymError::network(format!(
                "Failed to download {}: {}",
                url,
                response.status()
            )));
        }

        let pb = create_download_progress(response.content_length().unwrap_or(0), label);
        let mut received = 0u64;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            writer.write_all(&chunk)?;
            received += chunk.len() as u64;
            pb.set_position(received);
        }

        pb.finish_and_clear();
        debug!(url = %url, bytes = received, "Download complete");
        Ok(received)
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
