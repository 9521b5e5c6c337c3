//! Command-line crawling and offline extraction.
//!
//! Records are printed to stdout as JSON lines; logs go to stderr.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use pub_crawler::{
    CrawlConfig, Crawler, Extractor, ExtractionConfig, HttpFetcher, Record, RecordSink,
    SinkResult,
};
use server_core::init_tracing;
use tokio_util::sync::CancellationToken;
use url::Url;

#[derive(Parser)]
#[command(name = "crawl_cli")]
#[command(about = "Extract beer records from brewery pages")]
struct Cli {
    /// JSON file with extraction settings (labels, vocabulary, class patterns)
    #[arg(long, global = true)]
    extraction_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a seed page and every page it links to
    Crawl {
        /// Seed URL
        url: String,

        /// Maximum concurrent fetches
        #[arg(long, default_value_t = 8)]
        concurrency: usize,

        /// Per-fetch timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,

        /// Only follow links on the seed's host
        #[arg(long)]
        same_host: bool,

        /// Follow at most this many links
        #[arg(long)]
        max_links: Option<usize>,
    },

    /// Run one saved HTML page through the extractor
    Extract {
        /// Path to the HTML snapshot
        file: PathBuf,

        /// URL the snapshot was taken from (names are read from its slug)
        #[arg(long)]
        url: String,
    },
}

/// Writes each record to stdout as one JSON line.
struct StdoutSink;

#[async_trait]
impl RecordSink for StdoutSink {
    async fn accept(&self, records: &[Record]) -> SinkResult<()> {
        let mut out = std::io::stdout().lock();
        for record in records {
            serde_json::to_writer(&mut out, record)?;
            out.write_all(b"\n")?;
        }
        Ok(())
    }

    async fn flush(&self) -> SinkResult<()> {
        std::io::stdout().flush()?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let extractor = load_extractor(cli.extraction_config.as_deref()).await?;

    match cli.command {
        Commands::Crawl {
            url,
            concurrency,
            timeout,
            same_host,
            max_links,
        } => {
            let mut config = CrawlConfig::default()
                .with_concurrency(concurrency)
                .with_fetch_timeout(Duration::from_secs(timeout))
                .with_same_host_only(same_host);
            if let Some(max) = max_links {
                config = config.with_max_links(max);
            }

            let fetcher = HttpFetcher::new(&config).context("Failed to build HTTP client")?;
            let crawler = Crawler::new(Arc::new(fetcher), Arc::new(extractor), config);

            let cancel = CancellationToken::new();
            let on_ctrl_c = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_ctrl_c.cancel();
                }
            });

            let summary = crawler
                .crawl(&url, &StdoutSink, cancel)
                .await
                .with_context(|| format!("Crawl of {url} failed"))?;
            eprintln!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Commands::Extract { file, url } => {
            let url = Url::parse(&url).with_context(|| format!("Invalid URL: {url}"))?;
            let body = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;

            let records = extractor.extract_html(url, &body);
            let mut out = std::io::stdout().lock();
            for record in &records {
                serde_json::to_writer(&mut out, record)?;
                out.write_all(b"\n")?;
            }
            tracing::info!(records = records.len(), "Extraction complete");
        }
    }

    Ok(())
}

async fn load_extractor(path: Option<&Path>) -> Result<Extractor> {
    let config = match path {
        Some(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<ExtractionConfig>(&text)
                .with_context(|| format!("Invalid extraction config in {}", path.display()))?
        }
        None => ExtractionConfig::default(),
    };
    Extractor::new(&config).context("Invalid extraction config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_extractor_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extraction.json");
        let config = ExtractionConfig {
            max_region_matches: 3,
            ..ExtractionConfig::default()
        };
        tokio::fs::write(&path, serde_json::to_vec(&config).unwrap())
            .await
            .unwrap();

        let extractor = load_extractor(Some(&path)).await.unwrap();
        assert_eq!(extractor.max_region_matches(), 3);
    }

    #[tokio::test]
    async fn test_load_extractor_defaults_and_errors() {
        let extractor = load_extractor(None).await.unwrap();
        assert_eq!(extractor.max_region_matches(), 5);

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = load_extractor(Some(&missing)).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read"));

        let bad = dir.path().join("bad.json");
        tokio::fs::write(&bad, b"{not json").await.unwrap();
        assert!(load_extractor(Some(&bad)).await.is_err());
    }
}
