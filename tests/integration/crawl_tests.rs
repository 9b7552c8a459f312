//! Integration tests for the crawler
//!
//! Fixed link graphs are served by `MockHttpClient`; the real reqwest
//! transport is exercised against wiremock servers.

use hostcrawl::config::HttpConfig;
use hostcrawl::crawler::{Crawler, FetchError, MockHttpClient, ReqwestClient};
use hostcrawl::storage::{prepare_downloads_dir, DiskStorage, PageStore, StoreError};
use hostcrawl::{CrawlError, Fetcher};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HOME: &str = r#"
	<ul>
		<a href="/">Home</a>
		<a href="/advanced-features">Advance features</a>
		<a href="https://google.com"> External </a>
	</ul>"#;

const ADVANCED_FEATURES: &str = r#"
		<ul>
			<a href="/">Home</a>
			<a href="/advanced-features">Advance features</a>
			<a href="https://google.com"> External </a>
		</ul>

		<section>
			<h2>Progress bar <a href="https://whatsapp.com"></a></h2>
		</section>"#;

fn localhost_site() -> Arc<MockHttpClient> {
    let client = Arc::new(MockHttpClient::new());
    client.mock_request("http://localhost.com", 200, HOME);
    client.mock_request("http://localhost.com/advanced-features", 200, ADVANCED_FEATURES);
    client
}

fn mock_crawler(client: Arc<MockHttpClient>, dir: &Path) -> Crawler {
    let storage = Arc::new(DiskStorage::new(dir));
    Crawler::new(PageStore::new(storage, Fetcher::from_arc(client)))
}

fn reqwest_crawler(dir: &Path) -> Crawler {
    let client = ReqwestClient::from_config(&HttpConfig::default()).expect("Failed to build client");
    Crawler::with_client(client, dir)
}

#[tokio::test]
async fn test_localhost_scenario_concurrent() {
    let root = TempDir::new().unwrap();
    let dir = prepare_downloads_dir(&root.path().join("storage"), "tests").unwrap();
    let client = localhost_site();
    let crawler = Arc::new(mock_crawler(client.clone(), &dir));

    let report = crawler.crawl("http://localhost.com").await;

    assert!(report.is_clean(), "unexpected failures: {:?}", report.failures);
    assert_eq!(
        crawler.retrieved_files(),
        vec![
            dir.join("localhost.com_.html"),
            dir.join("localhost.com_advanced-features.html"),
        ]
    );
    assert_eq!(client.hits("http://localhost.com"), 1);
    assert_eq!(client.hits("http://localhost.com/advanced-features"), 1);
    assert_eq!(client.hits("https://google.com"), 0);
    assert_eq!(client.hits("https://whatsapp.com"), 0);
    assert_eq!(
        crawler.visited_links(),
        vec!["http://localhost.com", "http://localhost.com/advanced-features"]
    );

    let stored = std::fs::read_to_string(dir.join("localhost.com_advanced-features.html")).unwrap();
    assert_eq!(stored, ADVANCED_FEATURES);
}

#[tokio::test]
async fn test_localhost_scenario_sequential() {
    let dir = TempDir::new().unwrap();
    let client = localhost_site();
    let crawler = mock_crawler(client.clone(), dir.path());

    let report = crawler.crawl_sequential("http://localhost.com").await;

    assert!(report.is_clean());
    assert_eq!(report.retrieved.len(), 2);
    assert_eq!(report.pages_fetched(), 2);
    assert_eq!(client.total_hits(), 2);
}

#[tokio::test]
async fn test_modes_agree_on_a_dense_graph() {
    // Every page links to every other page, so each link is discovered many
    // times over while branches are in flight.
    let client = Arc::new(MockHttpClient::new());
    let all_links: String = (0..12)
        .map(|i| format!(r#"<a href="/p{i}">{i}</a>"#))
        .collect();
    client.mock_request("http://localhost.com", 200, all_links.clone());
    for i in 0..12 {
        client.mock_request(&format!("http://localhost.com/p{i}"), 200, all_links.clone());
    }

    let concurrent_dir = TempDir::new().unwrap();
    let concurrent = Arc::new(mock_crawler(client.clone(), concurrent_dir.path()));
    concurrent.crawl("http://localhost.com").await;
    assert_eq!(client.total_hits(), 13);
    for i in 0..12 {
        assert_eq!(client.hits(&format!("http://localhost.com/p{i}")), 1);
    }

    let sequential_dir = TempDir::new().unwrap();
    let sequential = mock_crawler(client.clone(), sequential_dir.path());
    sequential.crawl_sequential("http://localhost.com").await;
    assert_eq!(client.total_hits(), 26);

    assert_eq!(concurrent.visited_links(), sequential.visited_links());
    assert_eq!(
        concurrent.retrieved_files().len(),
        sequential.retrieved_files().len()
    );
}

#[tokio::test]
async fn test_repeated_crawl_keeps_retrieved_count() {
    let dir = TempDir::new().unwrap();
    let client = localhost_site();
    let crawler = Arc::new(mock_crawler(client.clone(), dir.path()));

    crawler.crawl("http://localhost.com").await;
    let before = crawler.retrieved_files().len();
    crawler.crawl("http://localhost.com").await;

    assert_eq!(crawler.retrieved_files().len(), before);
    assert_eq!(client.total_hits(), 2);
}

#[tokio::test]
async fn test_second_crawler_reuses_files_on_disk() {
    let dir = TempDir::new().unwrap();
    let client = localhost_site();

    let first = Arc::new(mock_crawler(client.clone(), dir.path()));
    first.crawl("http://localhost.com").await;

    let second = Arc::new(mock_crawler(client.clone(), dir.path()));
    let report = second.crawl("http://localhost.com").await;

    assert_eq!(report.retrieved.len(), 2);
    assert_eq!(report.cache_hits, 2);
    assert_eq!(client.total_hits(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_links_sharing_a_file_are_stored_once() {
    for _ in 0..20 {
        let dir = TempDir::new().unwrap();
        let client = Arc::new(MockHttpClient::new());
        client.mock_request(
            "http://localhost.com",
            200,
            r#"<a href="/a/b">nested</a><a href="/a_b">flat</a>"#,
        );
        client.mock_request("http://localhost.com/a/b", 200, "AAAA");
        client.mock_request("http://localhost.com/a_b", 200, "BBBB");
        let crawler = Arc::new(mock_crawler(client.clone(), dir.path()));

        let report = crawler.crawl("http://localhost.com").await;

        assert!(report.is_clean());
        assert_eq!(report.links_expanded, 3);
        assert_eq!(report.cache_hits, 1);
        assert_eq!(client.total_hits(), 2);
        let stored = std::fs::read_to_string(dir.path().join("localhost.com_a_b.html")).unwrap();
        assert!(stored == "AAAA" || stored == "BBBB", "stored {:?}", stored);
    }
}

#[tokio::test]
async fn test_crawl_runs_as_spawned_task() {
    let dir = TempDir::new().unwrap();
    let crawler = Arc::new(mock_crawler(localhost_site(), dir.path()));

    let handle = {
        let crawler = Arc::clone(&crawler);
        tokio::spawn(async move { crawler.crawl("http://localhost.com").await })
    };
    let report = handle.await.unwrap();

    assert_eq!(report.links_expanded, 2);
}

#[tokio::test]
async fn test_malformed_href_page_still_counts_as_visited() {
    let dir = TempDir::new().unwrap();
    let client = Arc::new(MockHttpClient::new());
    client.mock_request(
        "http://localhost.com",
        200,
        r#"<a href="/reachable">R</a><a href="http://[::1">broken</a>"#,
    );
    client.mock_request("http://localhost.com/reachable", 200, "<p>never linked</p>");
    let crawler = Arc::new(mock_crawler(client.clone(), dir.path()));

    let report = crawler.crawl("http://localhost.com").await;

    assert!(report.is_clean());
    assert_eq!(report.links_expanded, 1);
    assert!(crawler.has_visited("http://localhost.com"));
    assert_eq!(client.hits("http://localhost.com/reachable"), 0);
}

#[tokio::test]
async fn test_full_crawl_over_http() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<html><body>
                <a href="/page1">Page 1</a>
                <a href="{}/page2/">Page 2</a>
                <a href="mailto:someone@example.com">Mail</a>
                <a href="https://example.org/elsewhere">Elsewhere</a>
            </body></html>"#,
            base_url
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"<a href="/page2">Page 2</a>"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="/">Home</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let crawler = Arc::new(reqwest_crawler(dir.path()));

    let report = crawler.crawl(&base_url).await;

    assert!(report.is_clean(), "unexpected failures: {:?}", report.failures);
    assert_eq!(report.links_expanded, 3);

    let host = url::Url::parse(&base_url).unwrap();
    let host = hostcrawl::url::host_with_port(&host);
    assert!(dir.path().join(format!("{}_.html", host)).exists());
    assert!(dir.path().join(format!("{}_page1.html", host)).exists());
    assert!(dir.path().join(format!("{}_page2.html", host)).exists());
}

#[tokio::test]
async fn test_not_found_branch_is_reported() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="/gone">Gone</a><a href="/alive">Alive</a>"#,
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/alive"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>alive</p>"))
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let crawler = Arc::new(reqwest_crawler(dir.path()));

    let report = crawler.crawl(&base_url).await;

    assert_eq!(report.links_expanded, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].link, format!("{}/gone", base_url));
    assert!(matches!(
        report.failures[0].error,
        CrawlError::Store(StoreError::Fetch(FetchError::UnexpectedStatus { status: 404, .. }))
    ));
    assert_eq!(crawler.retrieved_files().len(), 2);
}

#[tokio::test]
async fn test_unreachable_seed_is_transport_failure() {
    // Bind and immediately release a port so connections to it are refused.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let dir = TempDir::new().unwrap();
    let crawler = Arc::new(reqwest_crawler(dir.path()));

    let report = crawler.crawl(&addr).await;

    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        report.failures[0].error,
        CrawlError::Store(StoreError::Fetch(FetchError::Transport { .. }))
    ));
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}
