//! HTTP fetcher backed by reqwest.

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::traits::fetcher::{FetchedPage, Fetcher};
use crate::types::CrawlConfig;

const MAX_REDIRECTS: usize = 10;

/// Fetches pages over HTTP(S), following redirects.
///
/// Non-2xx answers become [`FetchError::Status`]; responses that declare a
/// non-HTML content type become [`FetchError::UnsupportedContent`]. A missing
/// content type is accepted as HTML.
///
/// # Example
///
/// ```rust,ignore
/// use pub_crawler::{CrawlConfig, HttpFetcher};
///
/// let fetcher = HttpFetcher::new(&CrawlConfig::default())?;
/// let page = fetcher.fetch(&"https://brewery.example/beers".parse()?).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client using the config's timeout and user agent.
    pub fn new(config: &CrawlConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;
        Ok(Self { client })
    }

    /// Use a preconfigured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> FetchResult<FetchedPage> {
        debug!(url = %url, "HTTP fetch starting");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "HTTP request failed");
            transport_error(url, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let final_url = response.url().clone();

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_ascii_lowercase());
        if let Some(content_type) = content_type {
            if !content_type.contains("html") {
                return Err(FetchError::UnsupportedContent {
                    url: url.to_string(),
                    content_type,
                });
            }
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: url.to_string(),
                }
            } else {
                FetchError::Body {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        })?;

        debug!(url = %url, final_url = %final_url, bytes = body.len(), "HTTP fetch complete");
        Ok(FetchedPage::new(final_url, body))
    }

    fn name(&self) -> &str {
        "http"
    }
}

fn transport_error(url: &Url, e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: Box::new(e),
        }
    }
}
