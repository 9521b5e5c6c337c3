//! Configuration types for extraction and crawling.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::extract::vocabulary::DEFAULT_STYLE_TAGS;

/// Label spellings for the category field.
pub const DEFAULT_CATEGORY_LABELS: &[&str] = &["style", "beer style"];

/// Label spellings for the magnitude (alcohol content) field.
pub const DEFAULT_MAGNITUDE_LABELS: &[&str] = &[
    "ABV",
    "abv",
    "alcohol by volume",
    "ALCOHOL BY VOLUME",
    "ALC. BY VOLUME",
];

/// Free-text fallback for the magnitude field; the first group is the value.
pub const DEFAULT_MAGNITUDE_PATTERNS: &[&str] = &[r"(?:ABV[: ~\xa0-]+)([0-9].*[0-9]*%)"];

/// Class-name patterns that mark the sub-elements of a listing entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassPatternConfig {
    pub name: String,
    pub category: String,
    pub magnitude: String,
}

impl Default for ClassPatternConfig {
    fn default() -> Self {
        Self {
            name: r"(?i)(?:^|[\s_-])(?:name|title)(?:$|[\s_-])".to_string(),
            category: r"(?i)(?:^|[\s_-])(?:style|category|type)(?:$|[\s_-])".to_string(),
            magnitude: r"(?i)(?:^|[\s_-])(?:abv|alcohol|strength)(?:$|[\s_-])".to_string(),
        }
    }
}

/// Configuration for the extraction heuristics.
///
/// Everything here is plain data; [`crate::Extractor::new`] compiles it once
/// into spelling sets and regexes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractionConfig {
    /// Base spellings of the category label.
    pub category_labels: Vec<String>,

    /// Base spellings of the magnitude label.
    pub magnitude_labels: Vec<String>,

    /// Regexes tried over the page text when no magnitude label is found.
    pub magnitude_patterns: Vec<String>,

    /// Category keywords for last-resort scoring, in priority order.
    pub style_tags: Vec<String>,

    /// Class patterns that identify listing entries.
    #[serde(default)]
    pub class_patterns: ClassPatternConfig,

    /// A listing region must hold fewer than this many matches of each
    /// class pattern. Default: 5.
    pub max_region_matches: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            category_labels: to_strings(DEFAULT_CATEGORY_LABELS),
            magnitude_labels: to_strings(DEFAULT_MAGNITUDE_LABELS),
            magnitude_patterns: to_strings(DEFAULT_MAGNITUDE_PATTERNS),
            style_tags: to_strings(DEFAULT_STYLE_TAGS),
            class_patterns: ClassPatternConfig::default(),
            max_region_matches: 5,
        }
    }
}

impl ExtractionConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the style vocabulary.
    pub fn with_style_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.style_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Replace the listing class patterns.
    pub fn with_class_patterns(mut self, patterns: ClassPatternConfig) -> Self {
        self.class_patterns = patterns;
        self
    }
}

/// Configuration for one crawl.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// Maximum concurrent link fetches. Default: 8.
    pub concurrency: usize,

    /// Per-fetch timeout. Default: 30s.
    #[serde(with = "duration_secs")]
    pub fetch_timeout: Duration,

    /// Only follow links on the seed's host. Default: false.
    pub same_host_only: bool,

    /// Cap on links followed from the seed page (None = all).
    pub max_links: Option<usize>,

    /// User agent sent by the HTTP fetcher.
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            fetch_timeout: Duration::from_secs(30),
            same_host_only: false,
            max_links: None,
            user_agent: "PubCrawler/0.1".to_string(),
        }
    }
}

impl CrawlConfig {
    /// Create a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set max concurrent fetches (at least 1).
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the per-fetch timeout.
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Only follow links on the seed's host.
    pub fn with_same_host_only(mut self, same_host_only: bool) -> Self {
        self.same_host_only = same_host_only;
        self
    }

    /// Follow at most `max` links from the seed.
    pub fn with_max_links(mut self, max: usize) -> Self {
        self.max_links = Some(max);
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(d)?;
        if !secs.is_finite() || secs < 0.0 {
            return Err(serde::de::Error::custom("timeout must be a non-negative number"));
        }
        Ok(Duration::from_secs_f64(secs))
    }
}
