//! HttpFetcher against a local mock server.

use std::sync::Arc;
use std::time::Duration;

use pub_crawler::{
    CrawlConfig, Crawler, Extractor, FetchError, Fetcher, HttpFetcher, MemorySink,
};
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=utf-8")
}

fn fetcher(timeout: Duration) -> HttpFetcher {
    HttpFetcher::new(&CrawlConfig::default().with_fetch_timeout(timeout)).unwrap()
}

fn url(server: &MockServer, p: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), p)).unwrap()
}

#[tokio::test]
async fn fetches_html_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/beers/stout"))
        .respond_with(html("<h1>Stout</h1>"))
        .mount(&server)
        .await;

    let page = fetcher(Duration::from_secs(5))
        .fetch(&url(&server, "/beers/stout"))
        .await
        .unwrap();
    assert_eq!(page.body, "<h1>Stout</h1>");
    assert_eq!(page.final_url, url(&server, "/beers/stout"));
}

#[tokio::test]
async fn non_success_status_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = fetcher(Duration::from_secs(5))
        .fetch(&url(&server, "/gone"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Status { status: 404, .. }));
}

#[tokio::test]
async fn non_html_content_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/menu.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x25, 0x50], "application/pdf"))
        .mount(&server)
        .await;

    let err = fetcher(Duration::from_secs(5))
        .fetch(&url(&server, "/menu.pdf"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::UnsupportedContent { .. }));
}

#[tokio::test]
async fn redirects_report_final_url() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("Location", format!("{}/new", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/new"))
        .respond_with(html("<h1>New</h1>"))
        .mount(&server)
        .await;

    let page = fetcher(Duration::from_secs(5))
        .fetch(&url(&server, "/old"))
        .await
        .unwrap();
    assert_eq!(page.final_url, url(&server, "/new"));
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("late").set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let err = fetcher(Duration::from_millis(200))
        .fetch(&url(&server, "/slow"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Timeout { .. }));
}

#[tokio::test]
async fn crawl_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/beers"))
        .respond_with(html(
            r#"<a href="/beers/hop-storm">Hop Storm</a><a href="/beers/missing">Gone</a>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/beers/hop-storm"))
        .respond_with(html("<h1>Hop Storm</h1><div><b>ABV</b><b>8.2%</b></div>"))
        .mount(&server)
        .await;

    let config = CrawlConfig::default().with_fetch_timeout(Duration::from_secs(5));
    let crawler = Crawler::new(
        Arc::new(HttpFetcher::new(&config).unwrap()),
        Arc::new(Extractor::default()),
        config,
    );
    let sink = MemorySink::new();

    let summary = crawler
        .crawl(&format!("{}/beers", server.uri()), &sink, CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(summary.pages_fetched, 1);
    assert_eq!(summary.pages_failed, 1);
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name.as_deref(), Some("Hop Storm"));
    assert_eq!(records[0].magnitude.as_deref(), Some("8.2%"));
}
