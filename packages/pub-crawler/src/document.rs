//! Read-only access to a parsed HTML page.
//!
//! `PageDocument` wraps a `scraper::Html` tree together with the URL it came
//! from. Parsing is tolerant: html5ever repairs malformed markup, and an
//! empty body parses to a document with no text, so every query degrades to
//! an empty result instead of an error.
//!
//! `scraper::Html` is not `Send`. Build and drop documents inside synchronous
//! code; never hold one across an `.await`.

use regex::Regex;
use scraper::{ElementRef, Html, Node};
use url::Url;

/// Elements whose text is not part of the visible page.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// A text node together with the element that directly contains it.
#[derive(Debug, Clone, Copy)]
pub struct TextNode<'a> {
    pub text: &'a str,
    pub parent: ElementRef<'a>,
}

/// An immutable parsed page plus the URL it was fetched from.
pub struct PageDocument {
    url: Url,
    html: Html,
}

impl PageDocument {
    /// Parse an HTML body fetched from `url`.
    pub fn parse(url: Url, body: &str) -> Self {
        Self {
            url,
            html: Html::parse_document(body),
        }
    }

    /// The URL this document was fetched from (after redirects).
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// The `<html>` element; html5ever always synthesizes one.
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// Every element in document order.
    pub fn elements(&self) -> Vec<ElementRef<'_>> {
        elements_in(self.root())
    }

    /// Elements with the given tag name, in document order.
    pub fn by_tag(&self, tag: &str) -> Vec<ElementRef<'_>> {
        self.by_tags(&[tag])
    }

    /// Elements whose tag name is any of `tags`, in document order.
    pub fn by_tags(&self, tags: &[&str]) -> Vec<ElementRef<'_>> {
        elements_in(self.root())
            .into_iter()
            .filter(|el| {
                let name = el.value().name();
                tags.iter().any(|t| t.eq_ignore_ascii_case(name))
            })
            .collect()
    }

    /// Elements whose `class` attribute matches `pattern`, in document order.
    pub fn by_class_pattern(&self, pattern: &Regex) -> Vec<ElementRef<'_>> {
        elements_in(self.root())
            .into_iter()
            .filter(|el| class_matches(*el, pattern))
            .collect()
    }

    /// All visible text nodes in document order.
    pub fn all_text(&self) -> Vec<TextNode<'_>> {
        text_nodes_in(self.root())
    }

    /// Run `pattern` over every visible text node.
    ///
    /// For each match this yields every participating, non-empty capture
    /// group, or the whole match when the pattern has no groups.
    pub fn text_matching_pattern(&self, pattern: &Regex) -> Vec<String> {
        let mut found = Vec::new();
        for node in self.all_text() {
            for caps in pattern.captures_iter(node.text) {
                if caps.len() == 1 {
                    if let Some(m) = caps.get(0).filter(|m| !m.as_str().is_empty()) {
                        found.push(m.as_str().to_string());
                    }
                    continue;
                }
                for group in caps.iter().skip(1).flatten() {
                    if !group.as_str().is_empty() {
                        found.push(group.as_str().to_string());
                    }
                }
            }
        }
        found
    }

    /// Absolute targets of every `<a href>` on the page, in document order.
    ///
    /// Relative hrefs resolve against the document URL. Fragments are
    /// stripped; `javascript:`, `mailto:`, `tel:` and pure `#anchor` links
    /// are dropped, as is anything that does not resolve to http(s).
    pub fn links(&self) -> Vec<Url> {
        self.by_tag("a")
            .into_iter()
            .filter_map(|el| el.value().attr("href"))
            .map(str::trim)
            .filter(|href| !is_skip_href(href))
            .filter_map(|href| self.url.join(href).ok())
            .filter(|u| u.scheme() == "http" || u.scheme() == "https")
            .map(|mut u| {
                u.set_fragment(None);
                u
            })
            .collect()
    }
}

/// `scope` and every element below it, in document order.
pub fn elements_in(scope: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    scope.descendants().filter_map(ElementRef::wrap).collect()
}

/// Elements strictly below `scope` whose class matches `pattern`.
pub fn descendants_by_class<'a>(scope: ElementRef<'a>, pattern: &Regex) -> Vec<ElementRef<'a>> {
    scope
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|el| class_matches(*el, pattern))
        .collect()
}

/// Whether the element's `class` attribute matches `pattern`.
pub fn class_matches(el: ElementRef<'_>, pattern: &Regex) -> bool {
    el.value()
        .attr("class")
        .map(|class| pattern.is_match(class))
        .unwrap_or(false)
}

/// Visible text nodes under `scope`, in document order.
pub fn text_nodes_in(scope: ElementRef<'_>) -> Vec<TextNode<'_>> {
    scope
        .descendants()
        .filter_map(|node| {
            let Node::Text(text) = node.value() else {
                return None;
            };
            let parent = node.parent().and_then(ElementRef::wrap)?;
            if is_hidden(parent) {
                return None;
            }
            Some(TextNode {
                text: &**text,
                parent,
            })
        })
        .collect()
}

/// Text directly owned by `el` (its text-node children, not descendants).
pub fn own_text(el: ElementRef<'_>) -> impl Iterator<Item = &str> {
    el.children()
        .filter_map(|child| child.value().as_text().map(|t| &**t))
}

/// All visible text under `el`, whitespace-collapsed into single spaces.
pub fn collapsed_text(el: ElementRef<'_>) -> String {
    let joined: Vec<&str> = text_nodes_in(el).iter().map(|n| n.text).collect();
    collapse_whitespace(&joined.join(" "))
}

/// Replace every whitespace run with one space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether `el` is, or sits inside, an element whose text is not rendered.
pub(crate) fn is_hidden(el: ElementRef<'_>) -> bool {
    std::iter::once(el)
        .chain(el.ancestors().filter_map(ElementRef::wrap))
        .any(|e| HIDDEN_TAGS.contains(&e.value().name()))
}

fn is_skip_href(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    href.is_empty()
        || href.starts_with('#')
        || lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
}
