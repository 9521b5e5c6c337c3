//! Surface-text variants of a field label.

use indexmap::IndexSet;

/// Symbols that may trail a label ("ABV" / "ABV:").
const POST_SYMBOLS: &[&str] = &[":"];

/// The closed set of spellings under which one logical field label may
/// appear on a page.
///
/// Built from a canonical base list as base × {as-is, UPPER, Title} ×
/// {bare, with trailing symbol}, iterated in exactly that nesting order.
/// Exact duplicates collapse onto their first position, so every member is
/// tried once. The set is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSpellingSet {
    variants: IndexSet<String>,
    lowercase: IndexSet<String>,
}

impl LabelSpellingSet {
    /// Expand `bases` into the full variant set.
    pub fn new<I, S>(bases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut variants = IndexSet::new();
        for base in bases {
            let base = base.as_ref().trim();
            if base.is_empty() {
                continue;
            }
            for cased in [base.to_string(), base.to_uppercase(), title_case(base)] {
                variants.insert(cased.clone());
                for symbol in POST_SYMBOLS {
                    variants.insert(format!("{cased}{symbol}"));
                }
            }
        }
        let lowercase = variants.iter().map(|v| v.to_lowercase()).collect();
        Self {
            variants,
            lowercase,
        }
    }

    /// Variants in their stable checking order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Whether `text` (trimmed) is one of the variants, ignoring case.
    pub fn contains_ignore_case(&self, text: &str) -> bool {
        self.lowercase.contains(&text.trim().to_lowercase())
    }

    /// Strip a leading label ("ABV: 5%", "Style - Stout") from `text`.
    ///
    /// The label must be followed by a separator so that values which merely
    /// start with the same letters are left alone. Returns `text` unchanged
    /// when no label leads it.
    pub fn strip_leading_label<'t>(&self, text: &'t str) -> &'t str {
        let mut best: Option<&'t str> = None;
        for label in &self.lowercase {
            let label =
                label.trim_end_matches(|c: char| POST_SYMBOLS.iter().any(|s| s.contains(c)));
            let Some(head) = text.get(..label.len()) else {
                continue;
            };
            if !head.eq_ignore_ascii_case(label) {
                continue;
            }
            let rest = &text[label.len()..];
            if !rest.starts_with(|c: char| c == ':' || c == '-' || c == '–' || c.is_whitespace()) {
                continue;
            }
            let rest = rest.trim_start_matches(|c: char| {
                c == ':' || c == '-' || c == '–' || c.is_whitespace()
            });
            if rest.is_empty() {
                continue;
            }
            // Prefer the longest label ("beer style" over "style").
            if best.map(|b| rest.len() < b.len()).unwrap_or(true) {
                best = Some(rest);
            }
        }
        best.unwrap_or(text)
    }
}

/// Title-case like a word processor: uppercase every letter that follows a
/// non-letter, lowercase the rest ("alc. by volume" -> "Alc. By Volume").
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("alc. by volume"), "Alc. By Volume");
        assert_eq!(title_case("ABV"), "Abv");
        assert_eq!(title_case("beer style"), "Beer Style");
    }

    #[test]
    fn test_variant_order() {
        let set = LabelSpellingSet::new(["style", "beer style"]);
        let variants: Vec<&str> = set.iter().collect();
        assert_eq!(
            variants,
            vec![
                "style",
                "style:",
                "STYLE",
                "STYLE:",
                "Style",
                "Style:",
                "beer style",
                "beer style:",
                "BEER STYLE",
                "BEER STYLE:",
                "Beer Style",
                "Beer Style:",
            ]
        );
    }

    #[test]
    fn test_duplicates_collapse() {
        // "ABV" as-is and upper-cased are the same string
        let set = LabelSpellingSet::new(["ABV", "abv"]);
        let variants: Vec<&str> = set.iter().collect();
        assert_eq!(variants, vec!["ABV", "ABV:", "Abv", "Abv:", "abv", "abv:"]);
    }

    #[test]
    fn test_contains_ignore_case() {
        let set = LabelSpellingSet::new(["alcohol by volume"]);
        assert!(set.contains_ignore_case("Alcohol By Volume:"));
        assert!(set.contains_ignore_case("  ALCOHOL BY VOLUME "));
        assert!(!set.contains_ignore_case("alcohol"));
    }

    #[test]
    fn test_strip_leading_label() {
        let set = LabelSpellingSet::new(["ABV", "alcohol by volume"]);
        assert_eq!(set.strip_leading_label("ABV: 5.2%"), "5.2%");
        assert_eq!(set.strip_leading_label("abv 5.2%"), "5.2%");
        assert_eq!(set.strip_leading_label("Alcohol by volume - 7%"), "7%");
        assert_eq!(set.strip_leading_label("5% ABV"), "5% ABV");
        assert_eq!(set.strip_leading_label("ABVX 5%"), "ABVX 5%");
        assert_eq!(set.strip_leading_label("ABV:"), "ABV:");

        let style = LabelSpellingSet::new(["style", "beer style"]);
        assert_eq!(style.strip_leading_label("Beer Style: Porter"), "Porter");
        assert_eq!(style.strip_leading_label("Stout"), "Stout");
    }

    proptest! {
        #[test]
        fn every_variant_is_recognised(base in "[a-zA-Z][a-zA-Z .]{0,20}") {
            let set = LabelSpellingSet::new([base.as_str()]);
            prop_assert!(set.len() <= 6);
            for variant in set.iter() {
                prop_assert!(set.contains_ignore_case(variant));
                prop_assert!(set.contains_ignore_case(&variant.to_lowercase()));
            }
        }

        #[test]
        fn building_is_deterministic(bases in proptest::collection::vec("[a-z]{1,8}", 0..5)) {
            let a = LabelSpellingSet::new(&bases);
            let b = LabelSpellingSet::new(&bases);
            prop_assert_eq!(a, b);
        }
    }
}
