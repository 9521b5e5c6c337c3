//! Per-field heuristics.
//!
//! Every function here is a pure function of a document plus the compiled
//! configuration it is handed; nothing is cached between calls.

use regex::Regex;
use scraper::ElementRef;
use url::Url;

use super::spelling::LabelSpellingSet;
use super::vocabulary::StyleTagVocabulary;
use crate::document::{collapsed_text, own_text, text_nodes_in, PageDocument};

/// Heading levels searched for the record name.
const NAME_HEADINGS: &[&str] = &["h1", "h2"];

/// Keywords taken from the last path segment of `url`, split on `-`.
///
/// `https://x.example/beers/stone-ipa/` gives `["stone", "ipa"]`.
pub fn name_keywords(url: &Url) -> Vec<String> {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(|slug| {
            slug.split('-')
                .filter(|part| !part.is_empty())
                .map(str::to_lowercase)
                .collect()
        })
        .unwrap_or_default()
}

/// First level-1/2 heading that mentions any keyword from the URL slug.
///
/// Every `h1` is tried before any `h2`, each level in document order, so a
/// site banner in an `h2` above the product title does not win. Headings are
/// compared case-insensitively on their whitespace-collapsed text.
pub fn extract_name(doc: &PageDocument) -> Option<String> {
    let keywords = name_keywords(doc.url());
    if keywords.is_empty() {
        return None;
    }

    NAME_HEADINGS
        .iter()
        .flat_map(|level| doc.by_tag(level))
        .find_map(|heading| {
            let text = collapsed_text(heading);
            let lower = text.to_lowercase();
            keywords
                .iter()
                .any(|k| lower.contains(k.as_str()))
                .then_some(text)
        })
}

/// Find a field value next to its label, falling back to regexes.
///
/// For each spelling, in order, the first element whose own text equals the
/// spelling (ignoring case and surrounding whitespace) is taken as the
/// label. The label's parent is the "Label: Value" container; its first
/// non-empty text that is not itself a label spelling is the value.
///
/// When no spelling yields a value, each fallback regex runs over the page
/// text and the first capture of the first pattern with a hit wins.
pub fn extract_value(
    doc: &PageDocument,
    labels: &LabelSpellingSet,
    fallbacks: &[Regex],
) -> Option<String> {
    let elements = doc.elements();

    for spelling in labels.iter() {
        let wanted = spelling.to_lowercase();
        let Some(label) = elements.iter().find(|el| owns_text(**el, &wanted)) else {
            continue;
        };
        let Some(container) = label.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        let value = text_nodes_in(container)
            .into_iter()
            .map(|node| node.text.trim())
            .find(|text| !text.is_empty() && !labels.contains_ignore_case(text));
        if let Some(value) = value {
            return Some(value.to_string());
        }
    }

    fallbacks.iter().find_map(|pattern| {
        doc.text_matching_pattern(pattern)
            .into_iter()
            .map(|m| m.trim().to_string())
            .find(|m| !m.is_empty())
    })
}

/// Category from an explicit label, else from vocabulary scoring.
pub fn extract_category(
    doc: &PageDocument,
    labels: &LabelSpellingSet,
    vocabulary: &StyleTagVocabulary,
) -> Option<String> {
    extract_value(doc, labels, &[]).or_else(|| vocabulary.best_match(&doc.all_text()))
}

/// Magnitude (alcohol content) from an explicit label or free-text regex.
pub fn extract_magnitude(
    doc: &PageDocument,
    labels: &LabelSpellingSet,
    patterns: &[Regex],
) -> Option<String> {
    extract_value(doc, labels, patterns)
}

fn owns_text(el: ElementRef<'_>, wanted_lower: &str) -> bool {
    own_text(el).any(|text| text.trim().to_lowercase() == wanted_lower)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::{DEFAULT_MAGNITUDE_LABELS, DEFAULT_MAGNITUDE_PATTERNS};

    fn doc_at(url: &str, html: &str) -> PageDocument {
        PageDocument::parse(Url::parse(url).unwrap(), html)
    }

    fn abv_labels() -> LabelSpellingSet {
        LabelSpellingSet::new(DEFAULT_MAGNITUDE_LABELS)
    }

    fn abv_patterns() -> Vec<Regex> {
        DEFAULT_MAGNITUDE_PATTERNS
            .iter()
            .map(|p| Regex::new(p).unwrap())
            .collect()
    }

    #[test]
    fn test_name_keywords() {
        let url = Url::parse("https://northcoastbrewing.com/beers/pranqster-belgian-style-golden-ale/").unwrap();
        assert_eq!(
            name_keywords(&url),
            vec!["pranqster", "belgian", "style", "golden", "ale"]
        );

        let root = Url::parse("https://brewery.example/").unwrap();
        assert!(name_keywords(&root).is_empty());

        let doubled = Url::parse("https://brewery.example/beer/red--seal-").unwrap();
        assert_eq!(name_keywords(&doubled), vec!["red", "seal"]);
    }

    #[test]
    fn test_extract_name_first_matching_heading() {
        let d = doc_at(
            "https://www.stonebrewing.com/beer/core/stone-ipa",
            "<h2>Our Beers</h2><h1>Stone <em>IPA</em></h1><h2>Stone IPA Reviews</h2>",
        );
        assert_eq!(extract_name(&d), Some("Stone IPA".to_string()));
    }

    #[test]
    fn test_extract_name_prefers_h1_over_earlier_h2() {
        let d = doc_at(
            "https://brewery.example/stone-ipa",
            "<h2>Stone Brewing Co.</h2><h1>Stone IPA</h1>",
        );
        assert_eq!(extract_name(&d), Some("Stone IPA".to_string()));

        let banner_only = doc_at(
            "https://brewery.example/stone-ipa",
            "<h1>Welcome</h1><h2>Stone Brewing Co.</h2>",
        );
        assert_eq!(extract_name(&banner_only), Some("Stone Brewing Co.".to_string()));
    }

    #[test]
    fn test_extract_name_none_without_match_or_keywords() {
        let d = doc_at("https://brewery.example/beers/hop-storm", "<h1>Welcome</h1><h3>Hop Storm</h3>");
        assert_eq!(extract_name(&d), None);

        let root = doc_at("https://brewery.example/", "<h1>Anything</h1>");
        assert_eq!(extract_name(&root), None);
    }

    #[test]
    fn test_extract_value_label_parent_walk() {
        let d = doc_at(
            "https://brewery.example/beer",
            "<div><span>Abv:</span> <strong>9.4%</strong></div>",
        );
        assert_eq!(
            extract_value(&d, &abv_labels(), &[]),
            Some("9.4%".to_string())
        );
    }

    #[test]
    fn test_extract_value_never_returns_a_label() {
        // The label is echoed in the container before the value.
        let d = doc_at(
            "https://brewery.example/beer",
            "<li><b>ABV</b><i>ABV:</i><span>ALC. BY VOLUME</span> 7.1%</li>",
        );
        let labels = abv_labels();
        let value = extract_value(&d, &labels, &[]).unwrap();
        assert_eq!(value, "7.1%");
        assert!(!labels.contains_ignore_case(&value));
    }

    #[test]
    fn test_extract_value_inline_text_uses_regex() {
        let d = doc_at("https://brewery.example/beer", "<p>ABV: 9.4%</p>");
        let labels = abv_labels();
        let value = extract_value(&d, &labels, &abv_patterns()).unwrap();
        assert_eq!(value, "9.4%");
        assert!(!labels.contains_ignore_case(&value));
    }

    #[test]
    fn test_extract_value_nbsp_separator() {
        let d = doc_at("https://brewery.example/beer", "<p>ABV&nbsp;-&nbsp;5.5%</p>");
        assert_eq!(
            extract_value(&d, &abv_labels(), &abv_patterns()),
            Some("5.5%".to_string())
        );
    }

    #[test]
    fn test_extract_value_absent() {
        let d = doc_at("https://brewery.example/beer", "<p>Brewed with love.</p>");
        assert_eq!(extract_value(&d, &abv_labels(), &abv_patterns()), None);
    }

    #[test]
    fn test_extract_category_prefers_label() {
        let labels = LabelSpellingSet::new(["style", "beer style"]);
        let vocab = StyleTagVocabulary::new(["stout", "porter"]).unwrap();
        let d = doc_at(
            "https://brewery.example/beer",
            "<p>A stout-hearted porter.</p><div><dt>Beer Style</dt><dd>Baltic Porter</dd></div>",
        );
        assert_eq!(
            extract_category(&d, &labels, &vocab),
            Some("Baltic Porter".to_string())
        );
    }

    #[test]
    fn test_extract_category_vocabulary_fallback() {
        let labels = LabelSpellingSet::new(["style"]);
        let vocab = StyleTagVocabulary::new(["stout"]).unwrap();
        let d = doc_at("https://brewery.example/beer", "<p>Oatmeal Stout</p>");
        assert_eq!(
            extract_category(&d, &labels, &vocab),
            Some("Oatmeal Stout".to_string())
        );
    }
}
