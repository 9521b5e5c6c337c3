//! Known category keywords and the last-resort scoring that uses them.

use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};

use crate::document::{collapse_whitespace, TextNode};
use crate::error::ConfigError;

/// Style keywords seen on brewery sites, most generic first.
pub const DEFAULT_STYLE_TAGS: &[&str] = &[
    "dark",
    "saison",
    "red",
    "wine",
    "red wine",
    "red ale",
    "flanders red",
    "barrel",
    "aged",
    "barrel aged",
    "russian",
    "imperial",
    "stout",
    "russian imperial stout",
    "imperial stout",
    "lager",
    "double ipa",
    "ipa",
    "india pale ale",
    "hazy",
    "pils",
    "pilsner",
    "gose",
    "porter",
    "baltic",
    "baltic porter",
    "bock",
    "style",
    "czech",
    "czech pilsner",
    "czech style pilsner",
    "oatmeal",
    "oatmeal stout",
    "altbier",
];

#[derive(Debug, Clone)]
struct Keyword {
    text: String,
    pattern: Regex,
}

/// Ordered keyword list used when a page carries no explicit category label.
///
/// Each keyword matches case-insensitively at a word start anywhere in a
/// text node, so "pils" also hits "Pilsner".
#[derive(Debug, Clone)]
pub struct StyleTagVocabulary {
    keywords: Vec<Keyword>,
}

/// Running tally for one candidate text.
#[derive(Debug, Default)]
struct Tally {
    count: usize,
    keyword_chars: usize,
}

impl StyleTagVocabulary {
    pub fn new<I, S>(keywords: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for keyword in keywords {
            let text = keyword.as_ref().trim();
            if text.is_empty() {
                continue;
            }
            let source = format!(r"\b{}", regex::escape(text));
            let pattern = RegexBuilder::new(&source)
                .case_insensitive(true)
                .build()
                .map_err(|source_err| ConfigError::InvalidPattern {
                    pattern: source.clone(),
                    source: source_err,
                })?;
            compiled.push(Keyword {
                text: text.to_string(),
                pattern,
            });
        }
        Ok(Self { keywords: compiled })
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(|k| k.text.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Pick the text node that best looks like a category name.
    ///
    /// Every (keyword, text node) hit records the node's collapsed text as a
    /// candidate. A candidate scores
    /// `hits - len(candidate) / len(concatenated keywords that hit it)`,
    /// so short, keyword-dense texts beat boilerplate that merely mentions a
    /// style. Ties keep the first candidate in scan order (keyword order,
    /// then document order). This formula was tuned by hand against a small
    /// set of sites and is a heuristic, not a principled ranking.
    pub fn best_match(&self, nodes: &[TextNode<'_>]) -> Option<String> {
        let mut tallies: IndexMap<String, Tally> = IndexMap::new();

        for keyword in &self.keywords {
            let keyword_chars = keyword.text.chars().count();
            for node in nodes {
                if !keyword.pattern.is_match(node.text) {
                    continue;
                }
                let candidate = collapse_whitespace(node.text);
                if candidate.is_empty() {
                    continue;
                }
                let tally = tallies.entry(candidate).or_default();
                tally.count += 1;
                tally.keyword_chars += keyword_chars;
            }
        }

        let mut best: Option<(&String, f64)> = None;
        for (candidate, tally) in &tallies {
            let score = score(candidate, tally);
            if best.map(|(_, top)| score > top).unwrap_or(true) {
                best = Some((candidate, score));
            }
        }
        best.map(|(candidate, _)| candidate.clone())
    }
}

impl Default for StyleTagVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_STYLE_TAGS).expect("default style tags are valid patterns")
    }
}

fn score(candidate: &str, tally: &Tally) -> f64 {
    let length = candidate.chars().count() as f64;
    tally.count as f64 - length / tally.keyword_chars as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PageDocument;
    use url::Url;

    fn doc(html: &str) -> PageDocument {
        PageDocument::parse(Url::parse("https://brewery.example/beer").unwrap(), html)
    }

    #[test]
    fn test_default_vocabulary_compiles() {
        let vocab = StyleTagVocabulary::default();
        assert_eq!(vocab.keywords().count(), DEFAULT_STYLE_TAGS.len());
        assert_eq!(vocab.keywords().next(), Some("dark"));
    }

    #[test]
    fn test_keywords_match_at_word_start_any_case() {
        let vocab = StyleTagVocabulary::new(["pils"]).unwrap();
        let d = doc("<p>Czech PILSNER</p><p>spills</p>");
        assert_eq!(vocab.best_match(&d.all_text()), Some("Czech PILSNER".into()));
    }

    #[test]
    fn test_short_dense_text_beats_boilerplate() {
        let vocab = StyleTagVocabulary::new(["double ipa", "ipa"]).unwrap();
        let d = doc(
            "<span>Double IPA</span>\
             <p>Every IPA we brew is made in small batches by people who love hops.</p>",
        );
        assert_eq!(vocab.best_match(&d.all_text()), Some("Double IPA".into()));
    }

    #[test]
    fn test_repeated_text_accumulates() {
        // "Stout" appears twice: 2 - 5/10 beats "Imperial Stout": 2 - 14/13
        let vocab = StyleTagVocabulary::new(["imperial", "stout"]).unwrap();
        let d = doc("<p>Imperial Stout</p><p>Stout</p><p>Stout</p>");
        assert_eq!(vocab.best_match(&d.all_text()), Some("Stout".into()));
    }

    #[test]
    fn test_tie_keeps_first_in_scan_order() {
        let vocab = StyleTagVocabulary::new(["porter", "gose"]).unwrap();
        // Both score 1 - 6/6 = 0 and 1 - 4/4 = 0; porter is scanned first
        let d = doc("<p>Gose</p><p>Porter</p>");
        assert_eq!(vocab.best_match(&d.all_text()), Some("Porter".into()));
    }

    #[test]
    fn test_no_match_is_none() {
        let vocab = StyleTagVocabulary::default();
        let d = doc("<p>Tap room open daily</p>");
        assert_eq!(vocab.best_match(&d.all_text()), None);
    }
}
