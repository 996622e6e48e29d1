//! Integration tests for the crawler
//!
//! These tests use wiremock to serve paginated listing pages and run full
//! crawl jobs against them.

use listing_sweep::config::{parse_config, Config};
use listing_sweep::{crawl, CrawlJob, FailureKind, JobError, SiteRegistry, StopReason};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds a configuration with a site profile pointing at the mock server
fn create_test_config(server: &MockServer, concurrency: u32) -> Config {
    let toml = format!(
        r#"
[crawler]
concurrency-limit = {concurrency}
request-timeout-secs = 1
connect-timeout-secs = 1

[user-agent]
value = "ListingSweepTest/1.0"

[[site]]
name = "mockhomes"
hosts = ["127.0.0.1"]
origin = "{origin}"
pagination-suffix = "?page={{page}}"
card-selectors = ["article.listing", "div.result"]
title-selectors = ["h2"]
price-selectors = [".price"]
area-selectors = [".surface"]
location-selectors = [".where"]
"#,
        concurrency = concurrency,
        origin = server.uri(),
    );
    parse_config(&toml).expect("valid test config")
}

fn create_job(server: &MockServer, config: &Config, pages: u32) -> CrawlJob {
    let sites = SiteRegistry::from_config(config).expect("valid profiles");
    let url = format!("{}/rentals", server.uri());
    CrawlJob::new(&url, pages, "mockhomes", config, &sites).expect("valid job")
}

/// A page with `count` listing cards, titled "page P card N"
fn listing_page(page: u32, count: usize) -> String {
    let cards: String = (0..count)
        .map(|n| {
            format!(
                r#"<article class="listing">
                     <a href="/rentals/{page}-{n}"><h2>page {page} card {n}</h2></a>
                     <span class="price">{price} DH</span>
                     <span class="surface">{area} m²</span>
                     <span class="where">Agdal</span>
                     <img data-src="/img/{page}-{n}.jpg" src="data:image/gif;base64,R0lGOD">
                   </article>"#,
                page = page,
                n = n,
                price = 1000 * (n + 1),
                area = 50,
            )
        })
        .collect();
    format!("<html><body><main>{}</main></body></html>", cards)
}

fn empty_page() -> String {
    "<html><body><p>No results</p></body></html>".to_string()
}

async fn mount_page(server: &MockServer, page: u32, template: ResponseTemplate) {
    let mock = Mock::given(method("GET")).and(path("/rentals"));
    if page == 1 {
        mock.respond_with(template)
            .named("page 1")
            .mount(server)
            .await;
    } else {
        mock.and(query_param("page", page.to_string()))
            .respond_with(template)
            .with_priority(1)
            .named(format!("page {}", page))
            .mount(server)
            .await;
    }
}

fn titles(records: &[listing_sweep::ListingRecord]) -> Vec<String> {
    records.iter().map(|r| r.title.clone()).collect()
}

#[tokio::test]
async fn test_three_pages_third_empty() {
    let server = MockServer::start().await;
    mount_page(&server, 1, ResponseTemplate::new(200).set_body_string(listing_page(1, 10))).await;
    mount_page(&server, 2, ResponseTemplate::new(200).set_body_string(listing_page(2, 10))).await;
    mount_page(&server, 3, ResponseTemplate::new(200).set_body_string(empty_page())).await;

    let config = create_test_config(&server, 5);
    let job = create_job(&server, &config, 3);
    let result = crawl(&job, &config).await.expect("crawl succeeds");

    assert_eq!(result.records.len(), 20);
    assert_eq!(result.stop, StopReason::EmptyPage { page: 3 });
    assert_eq!(result.pages_with_listings, 2);

    let expected: Vec<String> = (1..=2)
        .flat_map(|p| (0..10).map(move |n| format!("page {} card {}", p, n)))
        .collect();
    assert_eq!(titles(&result.records), expected);

    let first = &result.records[0];
    assert_eq!(first.price, Some(1000.0));
    assert_eq!(first.currency.as_deref(), Some("MAD"));
    assert_eq!(first.area, Some(50.0));
    assert_eq!(first.unit.as_deref(), Some("m²"));
    assert_eq!(first.price_per_area, Some(20.0));
    assert_eq!(first.location.as_deref(), Some("Agdal"));
    assert_eq!(
        first.link.as_deref(),
        Some(format!("{}/rentals/1-0", server.uri()).as_str())
    );
    assert_eq!(
        first.image.as_deref(),
        Some(format!("{}/img/1-0.jpg", server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_empty_page_stops_even_when_later_pages_have_listings() {
    let server = MockServer::start().await;
    mount_page(&server, 1, ResponseTemplate::new(200).set_body_string(listing_page(1, 4))).await;
    mount_page(&server, 2, ResponseTemplate::new(200).set_body_string(listing_page(2, 4))).await;
    // Page 3 is slow and empty; pages 4 and 5 answer first with listings
    mount_page(
        &server,
        3,
        ResponseTemplate::new(200)
            .set_body_string(empty_page())
            .set_delay(Duration::from_millis(300)),
    )
    .await;
    mount_page(&server, 4, ResponseTemplate::new(200).set_body_string(listing_page(4, 4))).await;
    mount_page(&server, 5, ResponseTemplate::new(200).set_body_string(listing_page(5, 4))).await;

    let config = create_test_config(&server, 5);
    let job = create_job(&server, &config, 5);
    let result = crawl(&job, &config).await.expect("crawl succeeds");

    assert_eq!(result.records.len(), 8);
    assert!(result
        .records
        .iter()
        .all(|r| r.title.starts_with("page 1") || r.title.starts_with("page 2")));
    assert_eq!(result.stop, StopReason::EmptyPage { page: 3 });
}

#[tokio::test]
async fn test_not_found_stops_pagination() {
    let server = MockServer::start().await;
    mount_page(&server, 1, ResponseTemplate::new(200).set_body_string(listing_page(1, 3))).await;
    mount_page(&server, 2, ResponseTemplate::new(404)).await;
    mount_page(&server, 3, ResponseTemplate::new(200).set_body_string(listing_page(3, 3))).await;

    let config = create_test_config(&server, 1);
    let job = create_job(&server, &config, 3);
    let result = crawl(&job, &config).await.expect("crawl succeeds");

    assert_eq!(result.records.len(), 3);
    assert_eq!(
        result.stop,
        StopReason::NotFound {
            page: 2,
            status_code: 404
        }
    );
    // Sequential dispatch never reaches page 3
    assert_eq!(result.pages_fetched, 2);
}

#[tokio::test]
async fn test_timeout_stops_pagination_without_aborting_earlier_pages() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        1,
        ResponseTemplate::new(200)
            .set_body_string(listing_page(1, 2))
            .set_delay(Duration::from_millis(200)),
    )
    .await;
    mount_page(
        &server,
        2,
        ResponseTemplate::new(200)
            .set_body_string(listing_page(2, 2))
            .set_delay(Duration::from_secs(5)),
    )
    .await;

    let config = create_test_config(&server, 2);
    let job = create_job(&server, &config, 2);
    let result = crawl(&job, &config).await.expect("crawl succeeds");

    assert_eq!(titles(&result.records), vec!["page 1 card 0", "page 1 card 1"]);
    match result.stop {
        StopReason::TransportError { page, cause } => {
            assert_eq!(page, 2);
            assert_eq!(cause, "Request timeout");
        }
        other => panic!("unexpected stop reason: {:?}", other),
    }
}

#[tokio::test]
async fn test_crawl_is_idempotent() {
    let server = MockServer::start().await;
    let template = ResponseTemplate::new(200).set_body_string(listing_page(1, 6));
    Mock::given(method("GET"))
        .and(path("/rentals"))
        .respond_with(template)
        .mount(&server)
        .await;
    mount_page(&server, 2, ResponseTemplate::new(200).set_body_string(empty_page())).await;

    let config = create_test_config(&server, 3);
    let job = create_job(&server, &config, 4);

    let first = crawl(&job, &config).await.expect("first crawl");
    let second = crawl(&job, &config).await.expect("second crawl");

    assert_eq!(first.records.len(), 6);
    assert_eq!(first.records.len(), second.records.len());
    for (a, b) in first.records.iter().zip(&second.records) {
        assert!(a.same_listing(b), "{:?} != {:?}", a, b);
    }
}

#[tokio::test]
async fn test_no_listings_error() {
    let server = MockServer::start().await;
    mount_page(&server, 1, ResponseTemplate::new(200).set_body_string(empty_page())).await;

    let config = create_test_config(&server, 5);
    let job = create_job(&server, &config, 10);
    let err = crawl(&job, &config).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::NoListings);
    match err {
        JobError::NoListings { url, reason } => {
            assert_eq!(url, format!("{}/rentals", server.uri()));
            assert_eq!(reason, "no listings on page 1");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_fallback_card_selector() {
    let server = MockServer::start().await;
    let body = r#"<div class="result"><h2>Studio in Hassan</h2><span class="price">4 500 MAD</span></div>"#;
    mount_page(&server, 1, ResponseTemplate::new(200).set_body_string(body)).await;

    let config = create_test_config(&server, 1);
    let job = create_job(&server, &config, 1);
    let result = crawl(&job, &config).await.expect("crawl succeeds");

    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].price, Some(4500.0));
    assert_eq!(result.stop, StopReason::PageLimit { pages: 1 });
}

#[tokio::test]
async fn test_malformed_input_rejected_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(1, 1)))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, 1);
    let sites = SiteRegistry::from_config(&config).unwrap();

    let zero_pages = CrawlJob::new(
        &format!("{}/rentals", server.uri()),
        0,
        "mockhomes",
        &config,
        &sites,
    )
    .unwrap_err();
    assert_eq!(zero_pages.kind(), FailureKind::MalformedInput);

    let bad_url = CrawlJob::new("rentals?page=1", 3, "mockhomes", &config, &sites).unwrap_err();
    assert_eq!(bad_url.kind(), FailureKind::MalformedInput);

    let unsupported = CrawlJob::new(
        "https://www.example.org/rentals",
        3,
        "nowhere",
        &config,
        &sites,
    )
    .unwrap_err();
    assert!(matches!(unsupported, JobError::UnsupportedSite(_)));

    // The expect(0) on the mock is verified when the server drops
}
