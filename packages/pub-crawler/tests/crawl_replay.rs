//! Full crawls replayed from saved pages, without network access.

use std::path::PathBuf;
use std::sync::Arc;

use pub_crawler::{CrawlConfig, Crawler, Extractor, FixtureSet, MemorySink, PageKind};
use tokio_util::sync::CancellationToken;

const SEED: &str = "https://index.example/";

fn fixtures() -> FixtureSet {
    FixtureSet::load(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")).unwrap()
}

#[tokio::test]
async fn crawl_over_fixture_site() {
    let set = fixtures();
    let mock = set.mock_fetcher().unwrap();
    mock.add_page(SEED, set.index_page());

    let crawler = Crawler::new(
        Arc::new(mock.clone()),
        Arc::new(Extractor::default()),
        CrawlConfig::default().with_concurrency(2),
    );
    let sink = MemorySink::new();

    let summary = crawler
        .crawl(SEED, &sink, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.links_discovered, 4);
    assert_eq!(summary.pages_fetched, 4);
    assert_eq!(summary.pages_failed, 0);
    assert_eq!(summary.records_emitted, 21);
    assert!(!summary.cancelled);

    // One sink batch per page with records
    assert_eq!(sink.batch_count(), 4);
    assert_eq!(mock.call_count(), 5);

    let menu = sink.records_from("https://taproom.example/menu");
    assert_eq!(menu.len(), 18);
    assert!(menu.iter().all(|r| r.provenance.kind == PageKind::Listing));

    let stone = sink.records_from("https://www.stonebrewing.com/beer/core/stone-ipa");
    assert_eq!(stone.len(), 1);
    assert_eq!(stone[0].category.as_deref(), Some("IPA"));
}

#[tokio::test]
async fn same_host_crawl_ignores_fixture_sites() {
    let set = fixtures();
    let mock = set.mock_fetcher().unwrap();
    mock.add_page(SEED, set.index_page());

    let crawler = Crawler::new(
        Arc::new(mock.clone()),
        Arc::new(Extractor::default()),
        CrawlConfig::default().with_same_host_only(true),
    );
    let sink = MemorySink::new();

    let summary = crawler
        .crawl(SEED, &sink, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.links_discovered, 0);
    assert!(sink.is_empty());
    assert_eq!(mock.calls(), vec![SEED.to_string()]);
}
