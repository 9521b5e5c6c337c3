//! Data types shared across the crawler.

pub mod config;
pub mod record;

pub use config::{ClassPatternConfig, CrawlConfig, ExtractionConfig};
pub use record::{PageKind, Provenance, Record, RecordFields};
