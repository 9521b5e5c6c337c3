//! Heuristic product-record extraction from brewery web pages.
//!
//! Given a seed URL, the crawler fetches the seed, follows every link on it
//! one hop deep, and pulls `{name, category, magnitude}` records out of each
//! linked page without any per-site template.
//!
//! # Pipeline
//!
//! ```text
//! Crawler -> Fetcher -> PageDocument -> classifier -> extract -> RecordAssembler -> RecordSink
//! ```
//!
//! - A page with repeated record fragments (a menu) is a **listing**: one
//!   record per fragment, read from class-matched sub-elements.
//! - Anything else is a **detail** page: one record, found by label
//!   proximity ("ABV" next to "6.9%"), regex fallbacks, and keyword
//!   scoring against a style vocabulary.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pub_crawler::{CrawlConfig, Crawler, Extractor, HttpFetcher, JsonlSink};
//! use tokio_util::sync::CancellationToken;
//!
//! let config = CrawlConfig::default().with_concurrency(4);
//! let crawler = Crawler::new(
//!     Arc::new(HttpFetcher::new(&config)?),
//!     Arc::new(Extractor::default()),
//!     config,
//! );
//! let sink = JsonlSink::open("records.jsonl").await?;
//! let summary = crawler
//!     .crawl("https://brewery.example/beers", &sink, CancellationToken::new())
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`document`] - read-only queries over a parsed page
//! - [`extract`] - per-field heuristics and the compiled [`Extractor`]
//! - [`classifier`] - listing vs. detail decision
//! - [`assembler`] - per-page de-duplication
//! - [`crawler`] - one-hop concurrent traversal
//! - [`fetchers`], [`sinks`] - I/O implementations
//! - [`testing`] - fixture replay

pub mod assembler;
pub mod classifier;
pub mod crawler;
pub mod document;
pub mod error;
pub mod extract;
pub mod fetchers;
pub mod sinks;
pub mod testing;
pub mod traits;
pub mod types;

pub use assembler::RecordAssembler;
pub use classifier::{classify, extract_records, CandidateRegion, ClassPatterns, PageClass};
pub use crawler::{CrawlSummary, Crawler, VisitedSet};
pub use document::{PageDocument, TextNode};
pub use error::{
    ConfigError, CrawlError, CrawlResult, FetchError, FetchResult, FixtureError, SinkError,
    SinkResult,
};
pub use extract::{Extractor, LabelSpellingSet, StyleTagVocabulary};
pub use fetchers::{FetchedPage, Fetcher, HttpFetcher, MockFetcher};
pub use sinks::{JsonlSink, MemorySink, RecordSink};
pub use testing::{Fixture, FixtureSet};
pub use types::{
    ClassPatternConfig, CrawlConfig, ExtractionConfig, PageKind, Provenance, Record, RecordFields,
};
