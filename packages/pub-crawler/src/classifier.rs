//! Listing vs. detail page classification.
//!
//! A listing page repeats the same small fragment (name, style, strength)
//! once per product. Such a fragment is found structurally: an element whose
//! descendants carry each of the three field classes at least once but fewer
//! than `max_region_matches` times. The bound keeps a whole menu column, which
//! holds every product's fields, from counting as one region. Only the
//! innermost such elements are regions; an ancestor of a region never is.
//!
//! A page with no such region is a detail page and its fields are extracted
//! page-wide.

use std::collections::HashMap;

use regex::Regex;
use scraper::{ElementRef, Node};
use tracing::debug;

use crate::assembler::RecordAssembler;
use crate::document::{
    class_matches, collapse_whitespace, descendants_by_class, is_hidden, PageDocument,
};
use crate::error::ConfigError;
use crate::extract::{compile, Extractor, LabelSpellingSet};
use crate::types::{ClassPatternConfig, PageKind, Provenance, Record, RecordFields};

/// Elements that start a new line when their text is flattened.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "br", "dd", "div", "dl", "dt", "footer", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hr", "li", "ol", "p", "section", "table", "td", "th", "tr", "ul",
];

/// Compiled class-name patterns for the three listing fields.
#[derive(Debug, Clone)]
pub struct ClassPatterns {
    pub name: Regex,
    pub category: Regex,
    pub magnitude: Regex,
}

impl ClassPatterns {
    pub fn new(config: &ClassPatternConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            name: compile(&config.name)?,
            category: compile(&config.category)?,
            magnitude: compile(&config.magnitude)?,
        })
    }

    fn all(&self) -> [&Regex; 3] {
        [&self.name, &self.category, &self.magnitude]
    }
}

/// One repeated record fragment on a listing page.
#[derive(Debug, Clone, Copy)]
pub struct CandidateRegion<'a> {
    /// Position among the page's regions, in document order
    pub index: usize,
    pub root: ElementRef<'a>,
    pub name: ElementRef<'a>,
    pub category: ElementRef<'a>,
    pub magnitude: ElementRef<'a>,
}

/// Outcome of classifying a page.
#[derive(Debug)]
pub enum PageClass<'a> {
    Listing(Vec<CandidateRegion<'a>>),
    Detail,
}

impl PageClass<'_> {
    pub fn kind(&self) -> PageKind {
        match self {
            PageClass::Listing(_) => PageKind::Listing,
            PageClass::Detail => PageKind::Detail,
        }
    }
}

/// Find the innermost bounded regions holding all three field classes.
///
/// Match counts are accumulated bottom-up in one pass over the element
/// list: in document order every descendant follows its ancestor, so a
/// reverse walk sees each child before its parent. A second reverse walk
/// marks elements with a qualifying element below them; those are skipped
/// so a small menu's `<ul>` cannot merge fields of different entries.
pub fn find_candidate_regions<'a>(
    doc: &'a PageDocument,
    patterns: &ClassPatterns,
    max_matches: usize,
) -> Vec<CandidateRegion<'a>> {
    let elements = doc.elements();
    let position: HashMap<_, usize> = elements
        .iter()
        .enumerate()
        .map(|(i, el)| (el.id(), i))
        .collect();

    let own: Vec<[usize; 3]> = elements
        .iter()
        .map(|el| patterns.all().map(|p| class_matches(*el, p) as usize))
        .collect();

    // Matches strictly below each element.
    let mut below = vec![[0usize; 3]; elements.len()];
    for i in (0..elements.len()).rev() {
        let Some(parent) = elements[i].parent().and_then(ElementRef::wrap) else {
            continue;
        };
        let Some(&p) = position.get(&parent.id()) else {
            continue;
        };
        for k in 0..3 {
            below[p][k] += below[i][k] + own[i][k];
        }
    }

    let qualifies: Vec<bool> = below
        .iter()
        .map(|counts| counts.iter().all(|&n| n >= 1 && n < max_matches))
        .collect();

    let mut encloses_region = vec![false; elements.len()];
    for i in (0..elements.len()).rev() {
        let Some(parent) = elements[i].parent().and_then(ElementRef::wrap) else {
            continue;
        };
        if let Some(&p) = position.get(&parent.id()) {
            encloses_region[p] |= qualifies[i] || encloses_region[i];
        }
    }

    let mut regions = Vec::new();
    for (i, root) in elements.iter().enumerate() {
        if !qualifies[i] || encloses_region[i] {
            continue;
        }
        let [name, category, magnitude] = patterns
            .all()
            .map(|p| descendants_by_class(*root, p).into_iter().next());
        let (Some(name), Some(category), Some(magnitude)) = (name, category, magnitude) else {
            continue;
        };
        regions.push(CandidateRegion {
            index: regions.len(),
            root: *root,
            name,
            category,
            magnitude,
        });
    }
    regions
}

/// Decide whether `doc` is a listing or a detail page.
pub fn classify<'a>(doc: &'a PageDocument, extractor: &Extractor) -> PageClass<'a> {
    let regions =
        find_candidate_regions(doc, &extractor.class_patterns, extractor.max_region_matches);
    if regions.is_empty() {
        PageClass::Detail
    } else {
        PageClass::Listing(regions)
    }
}

/// Classify `doc` and extract its records.
///
/// Listing pages give one record per region; detail pages give at most one.
/// Records with no fields are dropped and the rest are de-duplicated on
/// their fields, keeping the first occurrence.
pub fn extract_records(doc: &PageDocument, extractor: &Extractor) -> Vec<Record> {
    let mut assembler = RecordAssembler::new(doc.url().as_str());
    let class = classify(doc, extractor);
    let kind = class.kind();

    match class {
        PageClass::Listing(regions) => {
            for region in &regions {
                let fields = region_fields(region, extractor);
                assembler.push(fields, Provenance::listing(region.index));
            }
        }
        PageClass::Detail => {
            assembler.push(extractor.extract_detail(doc), Provenance::detail());
        }
    }

    let records = assembler.finish();
    debug!(url = %doc.url(), kind = ?kind, records = records.len(), "Extracted page");
    records
}

fn region_fields(region: &CandidateRegion<'_>, extractor: &Extractor) -> RecordFields {
    RecordFields::new(
        field_text(region.name, None),
        field_text(region.category, Some(&extractor.category_labels)),
        field_text(region.magnitude, Some(&extractor.magnitude_labels)),
    )
}

/// The first non-empty rendered line of `el`, minus any leading label.
fn field_text(el: ElementRef<'_>, labels: Option<&LabelSpellingSet>) -> Option<String> {
    let rendered = render_lines(el);
    let line = rendered
        .lines()
        .map(collapse_whitespace)
        .find(|line| !line.is_empty())?;
    let value = match labels {
        Some(labels) => labels.strip_leading_label(&line).trim().to_string(),
        None => line,
    };
    (!value.is_empty()).then_some(value)
}

/// Flatten `el` to text, breaking lines at block elements.
fn render_lines(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in el.descendants() {
        match node.value() {
            Node::Text(text) => {
                let hidden = node.parent().and_then(ElementRef::wrap).map(is_hidden);
                if hidden == Some(false) {
                    out.push_str(text);
                }
            }
            Node::Element(element) if BLOCK_TAGS.contains(&element.name()) => out.push('\n'),
            _ => {}
        }
    }
    out
}
