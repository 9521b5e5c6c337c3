//! Extracted product records.

use serde::{Deserialize, Serialize};

/// Which classifier path produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    /// Many repeated record fragments (a menu or beer list)
    Listing,
    /// One record with loosely scattered label/value pairs
    Detail,
}

/// Where a record came from on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub kind: PageKind,

    /// Zero-based index of the listing region, in document order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<usize>,
}

impl Provenance {
    pub fn detail() -> Self {
        Self {
            kind: PageKind::Detail,
            region: None,
        }
    }

    pub fn listing(region: usize) -> Self {
        Self {
            kind: PageKind::Listing,
            region: Some(region),
        }
    }
}

/// The three canonical fields of a record.
///
/// Two records on the same page are the same record exactly when their
/// fields are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordFields {
    pub name: Option<String>,
    pub category: Option<String>,
    pub magnitude: Option<String>,
}

impl RecordFields {
    pub fn new(
        name: Option<String>,
        category: Option<String>,
        magnitude: Option<String>,
    ) -> Self {
        Self {
            name,
            category,
            magnitude,
        }
    }

    /// True when no field was found.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category.is_none() && self.magnitude.is_none()
    }
}

/// A finished record, ready for a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: Option<String>,
    pub category: Option<String>,
    pub magnitude: Option<String>,
    pub source_url: String,
    pub provenance: Provenance,
}

impl Record {
    pub fn new(fields: RecordFields, source_url: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            name: fields.name,
            category: fields.category,
            magnitude: fields.magnitude,
            source_url: source_url.into(),
            provenance,
        }
    }

    /// The fields that define this record's identity.
    pub fn fields(&self) -> RecordFields {
        RecordFields::new(
            self.name.clone(),
            self.category.clone(),
            self.magnitude.clone(),
        )
    }
}
