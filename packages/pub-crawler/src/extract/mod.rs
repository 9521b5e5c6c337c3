//! Field extraction heuristics.
//!
//! [`Extractor`] is the compiled form of an [`ExtractionConfig`]: spelling
//! sets, fallback regexes, the style vocabulary and the listing class
//! patterns. It is immutable and cheap to share behind an `Arc`.

pub mod fields;
pub mod spelling;
pub mod vocabulary;

pub use fields::{extract_category, extract_magnitude, extract_name, extract_value};
pub use spelling::LabelSpellingSet;
pub use vocabulary::StyleTagVocabulary;

use regex::Regex;
use url::Url;

use crate::classifier::{self, ClassPatterns};
use crate::document::PageDocument;
use crate::error::ConfigError;
use crate::types::{ExtractionConfig, Record, RecordFields};

/// Compiled extraction settings.
#[derive(Debug, Clone)]
pub struct Extractor {
    pub(crate) category_labels: LabelSpellingSet,
    pub(crate) magnitude_labels: LabelSpellingSet,
    pub(crate) magnitude_patterns: Vec<Regex>,
    pub(crate) vocabulary: StyleTagVocabulary,
    pub(crate) class_patterns: ClassPatterns,
    pub(crate) max_region_matches: usize,
}

impl Extractor {
    /// Compile `config`. Fails only if a configured regex is invalid.
    pub fn new(config: &ExtractionConfig) -> Result<Self, ConfigError> {
        let magnitude_patterns = config
            .magnitude_patterns
            .iter()
            .map(|p| compile(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            category_labels: LabelSpellingSet::new(&config.category_labels),
            magnitude_labels: LabelSpellingSet::new(&config.magnitude_labels),
            magnitude_patterns,
            vocabulary: StyleTagVocabulary::new(&config.style_tags)?,
            class_patterns: ClassPatterns::new(&config.class_patterns)?,
            max_region_matches: config.max_region_matches,
        })
    }

    pub fn category_labels(&self) -> &LabelSpellingSet {
        &self.category_labels
    }

    pub fn magnitude_labels(&self) -> &LabelSpellingSet {
        &self.magnitude_labels
    }

    pub fn class_patterns(&self) -> &ClassPatterns {
        &self.class_patterns
    }

    pub fn max_region_matches(&self) -> usize {
        self.max_region_matches
    }

    /// Page-wide field extraction, used for detail pages.
    pub fn extract_detail(&self, doc: &PageDocument) -> RecordFields {
        RecordFields::new(
            extract_name(doc),
            extract_category(doc, &self.category_labels, &self.vocabulary),
            extract_magnitude(doc, &self.magnitude_labels, &self.magnitude_patterns),
        )
    }

    /// Classify `doc` and return its de-duplicated records.
    pub fn extract_page(&self, doc: &PageDocument) -> Vec<Record> {
        classifier::extract_records(doc, self)
    }

    /// Parse `body` as fetched from `url` and extract its records.
    ///
    /// The parsed document is dropped before returning, so this is safe to
    /// call from async code between awaits.
    pub fn extract_html(&self, url: Url, body: &str) -> Vec<Record> {
        let doc = PageDocument::parse(url, body);
        self.extract_page(&doc)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(&ExtractionConfig::default()).expect("default extraction config compiles")
    }
}

pub(crate) fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_extractor_builds() {
        let extractor = Extractor::default();
        assert_eq!(extractor.max_region_matches(), 5);
        assert!(extractor.category_labels().contains_ignore_case("Beer Style:"));
        assert!(extractor.magnitude_labels().contains_ignore_case("alc. by volume"));
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let mut config = ExtractionConfig::default();
        config.magnitude_patterns = vec!["(unclosed".to_string()];
        let err = Extractor::new(&config).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn test_extract_detail_fields() {
        let doc = PageDocument::parse(
            Url::parse("https://brewery.example/beers/hop-storm").unwrap(),
            "<h1>Hop Storm</h1><p>ABV: 8.2%</p><div><b>Style</b><i>Double IPA</i></div>",
        );
        let fields = Extractor::default().extract_detail(&doc);
        assert_eq!(fields.name.as_deref(), Some("Hop Storm"));
        assert_eq!(fields.category.as_deref(), Some("Double IPA"));
        assert_eq!(fields.magnitude.as_deref(), Some("8.2%"));
    }
}
