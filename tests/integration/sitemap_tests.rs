//! Sitemap discovery against a mock server

use sumi_scribe::config::FetcherConfig;
use sumi_scribe::crawler::{build_http_client, SitemapError, SitemapResolver};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver() -> SitemapResolver {
    SitemapResolver::new(&FetcherConfig::default()).expect("Failed to build resolver")
}

fn urlset(urls: &[String]) -> String {
    let entries: String = urls
        .iter()
        .map(|u| format!("  <url><loc>{}</loc></url>\n", u))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</urlset>",
        entries
    )
}

#[tokio::test]
async fn test_resolve_lists_sitemap_urls() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let pages = vec![format!("{}/a", base_url), format!("{}/b", base_url)];

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&pages)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let urls = resolver().resolve(&base_url).await;

    assert_eq!(urls, pages);
}

#[tokio::test]
async fn test_resolve_strips_trailing_slashes() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let pages = vec![format!("{}/a", base_url)];

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&pages)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let urls = resolver().resolve(&format!("{}//", base_url)).await;

    assert_eq!(urls, pages);
}

#[tokio::test]
async fn test_resolve_404_is_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let urls = resolver().resolve(&mock_server.uri()).await;

    assert!(urls.is_empty());
}

#[tokio::test]
async fn test_fetch_locs_reports_status_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let result = resolver()
        .fetch_locs(&format!("{}/sitemap.xml", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(SitemapError::Http(_))));
}

#[tokio::test]
async fn test_resolve_malformed_xml_is_empty() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let open = format!(
        r#"<?xml version="1.0"?><urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"><url><loc>{}/a</loc></url>"#,
        base_url
    );

    let bodies = [
        ("/mismatched", format!("{}<url><loc>{}/b</url></loc></urlset>", open, base_url)),
        ("/truncated", format!("{}<url><loc>{}/b</loc>", open, base_url)),
        ("/unclosed", open.clone()),
        ("/trailing", format!("{}</urlset><junk>", open)),
    ];

    for (prefix, body) in &bodies {
        Mock::given(method("GET"))
            .and(path(format!("{}/sitemap.xml", prefix)))
            .respond_with(ResponseTemplate::new(200).set_body_string(body.clone()))
            .mount(&mock_server)
            .await;
    }

    let sitemaps = resolver();
    for (prefix, _) in &bodies {
        let urls = sitemaps.resolve(&format!("{}{}", base_url, prefix)).await;
        assert!(urls.is_empty(), "{} sitemap yielded {:?}", prefix, urls);
    }
}

#[tokio::test]
async fn test_resolve_html_instead_of_xml_is_empty() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body>Not a sitemap</body></html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;

    let urls = resolver().resolve(&mock_server.uri()).await;

    assert!(urls.is_empty());
}

#[tokio::test]
async fn test_resolver_uses_given_client() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let pages = vec![format!("{}/a", base_url)];

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .and(header("user-agent", "docs-bot/2.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(urlset(&pages)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = FetcherConfig {
        user_agent: "docs-bot/2.0".to_string(),
        ..FetcherConfig::default()
    };
    let client = build_http_client(&config).expect("Failed to build client");

    let urls = SitemapResolver::with_client(client).resolve(&base_url).await;

    assert_eq!(urls, pages);
}

#[tokio::test]
async fn test_resolve_unreachable_host_is_empty() {
    // Nothing listens on the discard port
    let urls = resolver().resolve("http://127.0.0.1:9").await;
    assert!(urls.is_empty());
}
