//! Fixture replay for validating the extraction heuristics offline.
//!
//! A fixture directory holds HTML snapshots plus a `fixtures.json` manifest
//! mapping a logical site name to the URL the snapshot was taken from:
//!
//! ```json
//! {
//!   "stone-ipa": { "url": "https://www.stonebrewing.com/beer/core/stone-ipa", "file": "stone_ipa.html" }
//! }
//! ```
//!
//! The URL matters: name extraction reads keywords from it, and records
//! carry it as their source.

use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::FixtureError;
use crate::extract::Extractor;
use crate::fetchers::MockFetcher;
use crate::types::Record;

/// Manifest file name inside a fixture directory.
pub const MANIFEST_FILE: &str = "fixtures.json";

#[derive(Debug, Deserialize)]
struct ManifestEntry {
    url: String,
    file: PathBuf,
}

/// One saved page.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub site: String,
    pub url: Url,
    pub path: PathBuf,
}

impl Fixture {
    /// Read the snapshot from disk.
    pub fn body(&self) -> Result<String, FixtureError> {
        Ok(std::fs::read_to_string(&self.path)?)
    }

    /// Run the snapshot through `extractor` as if fetched from its URL.
    pub fn extract(&self, extractor: &Extractor) -> Result<Vec<Record>, FixtureError> {
        let body = self.body()?;
        Ok(extractor.extract_html(self.url.clone(), &body))
    }
}

/// All fixtures of one directory, in manifest order.
#[derive(Debug, Clone, Default)]
pub struct FixtureSet {
    fixtures: IndexMap<String, Fixture>,
}

impl FixtureSet {
    /// Load `dir/fixtures.json`. Snapshot paths are relative to `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let dir = dir.as_ref();
        let manifest = std::fs::read_to_string(dir.join(MANIFEST_FILE))?;
        let entries: IndexMap<String, ManifestEntry> = serde_json::from_str(&manifest)?;

        let mut fixtures = IndexMap::with_capacity(entries.len());
        for (site, entry) in entries {
            let url = Url::parse(&entry.url).map_err(|_| FixtureError::InvalidUrl {
                site: site.clone(),
                url: entry.url.clone(),
            })?;
            let fixture = Fixture {
                site: site.clone(),
                url,
                path: dir.join(&entry.file),
            };
            fixtures.insert(site, fixture);
        }
        Ok(Self { fixtures })
    }

    pub fn get(&self, site: &str) -> Option<&Fixture> {
        self.fixtures.get(site)
    }

    pub fn sites(&self) -> impl Iterator<Item = &str> {
        self.fixtures.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fixture> {
        self.fixtures.values()
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    /// Extract every fixture, keyed by site name.
    pub fn extract_all(
        &self,
        extractor: &Extractor,
    ) -> Result<IndexMap<String, Vec<Record>>, FixtureError> {
        self.iter()
            .map(|f| Ok((f.site.clone(), f.extract(extractor)?)))
            .collect()
    }

    /// An in-memory site serving every snapshot at its URL.
    pub fn mock_fetcher(&self) -> Result<MockFetcher, FixtureError> {
        let mock = MockFetcher::new();
        for fixture in self.iter() {
            mock.add_page(fixture.url.as_str(), fixture.body()?);
        }
        Ok(mock)
    }

    /// HTML for a seed page that links to every fixture.
    pub fn index_page(&self) -> String {
        let links: String = self
            .iter()
            .map(|f| format!("<li><a href=\"{}\">{}</a></li>\n", f.url, f.site))
            .collect();
        format!("<html><body><ul>\n{links}</ul></body></html>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_and_replay() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{"hop-storm": {"url": "https://brewery.example/beers/hop-storm", "file": "hop.html"}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("hop.html"), "<h1>Hop Storm</h1>").unwrap();

        let set = FixtureSet::load(dir.path()).unwrap();
        assert_eq!(set.sites().collect::<Vec<_>>(), vec!["hop-storm"]);

        let records = set.get("hop-storm").unwrap().extract(&Extractor::default()).unwrap();
        assert_eq!(records[0].name.as_deref(), Some("Hop Storm"));
        assert!(set.index_page().contains("https://brewery.example/beers/hop-storm"));
    }

    #[test]
    fn test_bad_manifest_url() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            r#"{"broken": {"url": "not a url", "file": "x.html"}}"#,
        )
        .unwrap();
        let err = FixtureSet::load(dir.path()).unwrap_err();
        assert!(matches!(err, FixtureError::InvalidUrl { ref site, .. } if site == "broken"));
    }

    #[test]
    fn test_missing_manifest_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(FixtureSet::load(dir.path()), Err(FixtureError::Io(_))));
    }
}
