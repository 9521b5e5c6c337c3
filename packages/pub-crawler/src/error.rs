//! Typed errors for the crawler library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can tell a
//! skipped page apart from a crawl that could not start at all.

use thiserror::Error;

/// Errors that can occur while fetching a single page.
///
/// A `FetchError` never aborts a crawl on its own: the traversal logs it and
/// skips the URL. Only a failed seed fetch is escalated to [`CrawlError`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connection reset, TLS, ...)
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Server answered with a non-2xx status
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// Fetch did not complete within the configured timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Body could not be read or decoded
    #[error("unreadable body for {url}: {reason}")]
    Body { url: String, reason: String },

    /// Response is not an HTML document
    #[error("unsupported content type {content_type} for {url}")]
    UnsupportedContent { url: String, content_type: String },

    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

impl FetchError {
    /// The URL this error is about.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Http { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Timeout { url }
            | FetchError::Body { url, .. }
            | FetchError::UnsupportedContent { url, .. }
            | FetchError::InvalidUrl { url } => url,
        }
    }
}

/// Errors that abort a whole crawl.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Seed URL could not be parsed
    #[error("invalid seed URL: {url}")]
    InvalidSeed { url: String },

    /// Seed page could not be fetched; there is nothing to traverse
    #[error("seed fetch failed: {0}")]
    SeedFetch(#[source] FetchError),

    /// Crawl was cancelled before the seed page arrived
    #[error("crawl cancelled")]
    Cancelled,
}

/// Errors raised by record sinks.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Underlying storage write failed
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be serialized
    #[error("record serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors in extraction configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configured regex did not compile
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors while loading validation fixtures.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Manifest or snapshot could not be read
    #[error("fixture I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest is not valid JSON
    #[error("fixture manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    /// Fixture URL could not be parsed
    #[error("invalid fixture URL for {site}: {url}")]
    InvalidUrl { site: String, url: String },
}

/// Result type alias for fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Result type alias for crawl operations.
pub type CrawlResult<T> = std::result::Result<T, CrawlError>;

/// Result type alias for sink operations.
pub type SinkResult<T> = std::result::Result<T, SinkError>;
