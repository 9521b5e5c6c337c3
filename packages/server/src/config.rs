use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use pub_crawler::CrawlConfig;

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// JSON Lines file that receives every extracted record
    pub records_path: PathBuf,
    pub crawl: CrawlConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse()
            .context("PORT must be a valid number")?;

        let records_path = lookup("RECORDS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("records.jsonl"));

        let mut crawl = CrawlConfig::default();
        if let Some(concurrency) = lookup("CRAWL_CONCURRENCY") {
            let concurrency: usize = concurrency
                .parse()
                .context("CRAWL_CONCURRENCY must be a positive number")?;
            crawl = crawl.with_concurrency(concurrency);
        }
        if let Some(secs) = lookup("FETCH_TIMEOUT_SECS") {
            let secs: u64 = secs
                .parse()
                .context("FETCH_TIMEOUT_SECS must be a whole number of seconds")?;
            crawl = crawl.with_fetch_timeout(Duration::from_secs(secs));
        }
        if let Some(same_host) = lookup("SAME_HOST_ONLY") {
            let same_host: bool = same_host
                .parse()
                .context("SAME_HOST_ONLY must be true or false")?;
            crawl = crawl.with_same_host_only(same_host);
        }

        Ok(Self {
            port,
            records_path,
            crawl,
        })
    }
}
