//! Page fetching.

use async_trait::async_trait;
use url::Url;

use crate::error::FetchResult;

/// A fetched HTML page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL the body was actually served from, after redirects
    pub final_url: Url,

    /// Decoded HTML body
    pub body: String,
}

impl FetchedPage {
    pub fn new(final_url: Url, body: impl Into<String>) -> Self {
        Self {
            final_url,
            body: body.into(),
        }
    }
}

/// Fetches one URL and returns its HTML.
///
/// Implementations:
/// - `HttpFetcher` - real HTTP via reqwest
/// - `MockFetcher` - canned pages for tests
///
/// A fetcher does not enforce the crawl's timeout or cancellation; the
/// traversal races every call against both.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> FetchResult<FetchedPage>;

    /// Fetcher name, for logging.
    fn name(&self) -> &str {
        "unknown"
    }
}
