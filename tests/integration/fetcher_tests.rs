//! HTTP page fetcher behaviour against a mock server

use sumi_scribe::config::FetcherConfig;
use sumi_scribe::crawler::{
    CacheMode, FetchError, HttpPageFetcher, MarkdownStrategy, PageFetcher, RunOptions,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!(
            "<html><head><title>Test</title></head><body>{}</body></html>",
            body
        ))
        .insert_header("content-type", "text/html")
}

async fn started_fetcher() -> HttpPageFetcher {
    let fetcher = HttpPageFetcher::new(FetcherConfig::default());
    fetcher.start().await.expect("Failed to start fetcher");
    fetcher
}

#[tokio::test]
async fn test_fetch_converts_page_to_markdown() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/guide"))
        .respond_with(html("<h1>Guide</h1><p>Install with <code>cargo</code>.</p>"))
        .mount(&mock_server)
        .await;

    let fetcher = started_fetcher().await;
    let url = format!("{}/guide", mock_server.uri());
    let page = fetcher
        .fetch(&url, &RunOptions::default(), None)
        .await
        .expect("fetch failed");

    assert!(page.success);
    assert_eq!(page.url, url);
    assert!(page.content.contains("Guide"));
    assert!(page.content.contains("Install with"));
    assert!(!page.content.contains("<p>"));
}

#[tokio::test]
async fn test_http_error_is_a_failed_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let fetcher = started_fetcher().await;
    let page = fetcher
        .fetch(
            &format!("{}/missing", mock_server.uri()),
            &RunOptions::default(),
            None,
        )
        .await
        .expect("a status error is not a fetch error");

    assert!(!page.success);
    assert!(page.error.unwrap_or_default().contains("404"));
}

#[tokio::test]
async fn test_connection_failure_is_a_fetch_error() {
    let fetcher = started_fetcher().await;
    let result = fetcher
        .fetch("http://127.0.0.1:9/", &RunOptions::default(), None)
        .await;

    assert!(matches!(result, Err(FetchError::Http { .. })));
}

#[tokio::test]
async fn test_sessions_keep_their_own_cookies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            html("<p>welcome</p>").insert_header("set-cookie", "sid=abc123; Path=/"),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/private"))
        .and(header("cookie", "sid=abc123"))
        .respond_with(html("<p>members only</p>"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let fetcher = started_fetcher().await;
    let options = RunOptions {
        cache: CacheMode::Bypass,
        markdown: MarkdownStrategy::Default,
    };
    let base_url = mock_server.uri();

    let login = fetcher
        .fetch(&format!("{}/login", base_url), &options, Some("session1"))
        .await
        .unwrap();
    assert!(login.success);

    let same_session = fetcher
        .fetch(&format!("{}/private", base_url), &options, Some("session1"))
        .await
        .unwrap();
    assert!(same_session.success);
    assert!(same_session.content.contains("members only"));

    let other_session = fetcher
        .fetch(&format!("{}/private", base_url), &options, Some("session2"))
        .await
        .unwrap();
    assert!(!other_session.success);

    assert_eq!(fetcher.session_count().await, 2);
}

#[tokio::test]
async fn test_enabled_cache_serves_repeats() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cached"))
        .respond_with(html("<p>cached page</p>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = started_fetcher().await;
    let url = format!("{}/cached", mock_server.uri());

    let first = fetcher.fetch(&url, &RunOptions::default(), None).await.unwrap();
    let second = fetcher.fetch(&url, &RunOptions::default(), None).await.unwrap();

    assert!(first.success && second.success);
    assert_eq!(first.content, second.content);
}

#[tokio::test]
async fn test_bypass_cache_always_fetches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fresh"))
        .and(header("cache-control", "no-cache"))
        .respond_with(html("<p>fresh page</p>"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let fetcher = started_fetcher().await;
    let url = format!("{}/fresh", mock_server.uri());
    let options = RunOptions {
        cache: CacheMode::Bypass,
        markdown: MarkdownStrategy::Default,
    };

    for _ in 0..2 {
        let page = fetcher.fetch(&url, &options, None).await.unwrap();
        assert!(page.success);
    }
}

#[tokio::test]
async fn test_restart_clears_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html("<p>page</p>"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let fetcher = started_fetcher().await;
    let url = format!("{}/page", mock_server.uri());

    fetcher.fetch(&url, &RunOptions::default(), None).await.unwrap();
    fetcher.close().await.unwrap();

    assert!(matches!(
        fetcher.fetch(&url, &RunOptions::default(), None).await,
        Err(FetchError::NotStarted)
    ));

    fetcher.start().await.unwrap();
    fetcher.fetch(&url, &RunOptions::default(), None).await.unwrap();
}

#[tokio::test]
async fn test_main_content_strategy_drops_navigation() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(html(
            "<nav>Home | Blog | About</nav><article><p>The article text.</p></article>",
        ))
        .mount(&mock_server)
        .await;

    let fetcher = started_fetcher().await;
    let options = RunOptions {
        cache: CacheMode::Enabled,
        markdown: MarkdownStrategy::MainContent,
    };
    let page = fetcher
        .fetch(&format!("{}/article", mock_server.uri()), &options, None)
        .await
        .unwrap();

    assert!(page.content.contains("The article text."));
    assert!(!page.content.contains("Home | Blog"));
}
