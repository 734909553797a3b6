//! Sitemap discovery
//!
//! The site's pages are taken from `<root>/sitemap.xml`: every `loc` element in
//! the sitemap 0.9 namespace, in document order. Resolution never fails from
//! the caller's point of view; any problem yields an empty list.

use crate::config::FetcherConfig;
use crate::crawler::fetcher::build_http_client;
use crate::url::sitemap_location;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use reqwest::Client;
use thiserror::Error;

/// Namespace of sitemap 0.9 documents
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Reasons a sitemap could not be resolved
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML parse error: {0}")]
    Parse(String),
}

/// Extracts the `loc` values of a sitemap document
///
/// Only `loc` elements bound to [`SITEMAP_NS`] are collected, at any depth, so
/// both `<urlset>` and `<sitemapindex>` documents yield their locations.
/// Values are trimmed; empty values are skipped.
///
/// # Example
///
/// ```
/// use sumi_scribe::crawler::parse_sitemap_locs;
///
/// let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
/// <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc>https://example.com/a</loc></url>
///   <url><loc>https://example.com/b</loc></url>
/// </urlset>"#;
///
/// let urls = parse_sitemap_locs(xml).unwrap();
/// assert_eq!(urls, vec!["https://example.com/a", "https://example.com/b"]);
/// ```
pub fn parse_sitemap_locs(xml: &str) -> Result<Vec<String>, SitemapError> {
    let mut reader = NsReader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut locs = Vec::new();
    let mut current: Option<String> = None;
    let mut depth = 0usize;
    let mut root_seen = false;

    loop {
        let (namespace, event) = reader
            .read_resolved_event()
            .map_err(|e| SitemapError::Parse(e.to_string()))?;

        let in_sitemap_ns = matches!(
            namespace,
            ResolveResult::Bound(Namespace(ns)) if ns == SITEMAP_NS.as_bytes()
        );

        // Anything outside the single root element makes the document invalid
        let outside_root = depth == 0;
        match &event {
            Event::Start(_) | Event::Empty(_) if outside_root && root_seen => {
                return Err(SitemapError::Parse("content after the root element".into()));
            }
            Event::Text(_) | Event::CData(_) if outside_root => {
                return Err(SitemapError::Parse("text outside the root element".into()));
            }
            Event::Start(_) | Event::Empty(_) => root_seen = true,
            _ => {}
        }

        match event {
            Event::Start(e) => {
                depth += 1;
                if in_sitemap_ns && e.local_name().as_ref() == b"loc" {
                    current = Some(String::new());
                }
            }
            Event::Text(text) => {
                if let Some(loc) = current.as_mut() {
                    let text = text
                        .unescape()
                        .map_err(|e| SitemapError::Parse(e.to_string()))?;
                    loc.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(loc) = current.as_mut() {
                    loc.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(e) => {
                depth = depth.saturating_sub(1);
                if e.local_name().as_ref() == b"loc" {
                    if let Some(loc) = current.take() {
                        let loc = loc.trim();
                        if !loc.is_empty() {
                            locs.push(loc.to_string());
                        }
                    }
                }
            }
            Event::Eof if !root_seen => {
                return Err(SitemapError::Parse("no root element".to_string()));
            }
            Event::Eof if depth > 0 => {
                return Err(SitemapError::Parse(format!(
                    "unexpected end of document, {} element(s) left open",
                    depth
                )));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(locs)
}

/// Resolves a site root into the page URLs listed by its sitemap
#[derive(Debug, Clone)]
pub struct SitemapResolver {
    client: Client,
}

impl SitemapResolver {
    /// Creates a resolver using the fetcher's user agent and timeouts
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
        })
    }

    /// Creates a resolver around an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Returns the page URLs of the site at `root_url`
    ///
    /// Failures are logged and produce an empty list.
    pub async fn resolve(&self, root_url: &str) -> Vec<String> {
        let location = sitemap_location(root_url);

        match self.fetch_locs(&location).await {
            Ok(urls) => {
                tracing::info!("Sitemap {} lists {} URLs", location, urls.len());
                urls
            }
            Err(e) => {
                tracing::warn!("Error fetching sitemap {}: {}", location, e);
                Vec::new()
            }
        }
    }

    /// Fetches and parses a sitemap, surfacing the failure reason
    pub async fn fetch_locs(&self, location: &str) -> Result<Vec<String>, SitemapError> {
        let response = self.client.get(location).send().await?.error_for_status()?;
        let body = response.text().await?;
        parse_sitemap_locs(&body)
    }
}
