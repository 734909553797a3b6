//! Crawl strategies
//!
//! Three interchangeable policies turn a list of URLs into a [`Document`]:
//!
//! | Strategy | Fetches | Sessions | Cache |
//! |----------|---------|----------|-------|
//! | [`SinglePage`] | first URL only | none | enabled |
//! | [`Sequential`] | one at a time, in order | one shared | enabled |
//! | [`ParallelBatched`] | batches fanned out together | one per slot | bypassed |
//!
//! Page-level failures are logged and left out of the document. Only a
//! failure of the strategy as a whole is returned as [`StrategyError`].

use crate::crawler::fetcher::{CacheMode, FetchError, MarkdownStrategy, PageFetcher, RunOptions};
use crate::output::{Document, PageRecord};
use async_trait::async_trait;
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;

/// Failures that abort a whole strategy run
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("Failed to start page fetcher: {0}")]
    Launch(#[source] FetchError),

    #[error("No URL to crawl")]
    NoTarget,

    #[error("Failed to crawl {url}: {message}")]
    PageFailed { url: String, message: String },
}

/// A policy for crawling a list of URLs into a document
#[async_trait]
pub trait CrawlStrategy: Send + Sync {
    /// Human-readable name used in logs
    fn name(&self) -> &'static str;

    /// Crawls `urls` and aggregates the pages that succeeded
    async fn run(&self, urls: &[String]) -> Result<Document, StrategyError>;
}

async fn start_fetcher(fetcher: &dyn PageFetcher) -> Result<(), StrategyError> {
    fetcher.start().await.map_err(StrategyError::Launch)
}

async fn close_fetcher(fetcher: &dyn PageFetcher) {
    tracing::info!("Closing crawler...");
    if let Err(e) = fetcher.close().await {
        tracing::warn!("Failed to close page fetcher: {}", e);
    }
}

/// Fetches the root page alone and keeps its Markdown verbatim
pub struct SinglePage {
    fetcher: Arc<dyn PageFetcher>,
}

impl SinglePage {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl CrawlStrategy for SinglePage {
    fn name(&self) -> &'static str {
        "Start page"
    }

    async fn run(&self, urls: &[String]) -> Result<Document, StrategyError> {
        let url = urls.first().ok_or(StrategyError::NoTarget)?;

        start_fetcher(self.fetcher.as_ref()).await?;
        let result = self.fetcher.fetch(url, &RunOptions::default(), None).await;
        close_fetcher(self.fetcher.as_ref()).await;

        match result {
            Ok(page) if page.success => {
                tracing::info!("Successfully crawled: {}", url);
                tracing::info!("Markdown length: {}", page.content.chars().count());
                Ok(Document::PlainText(page.content))
            }
            Ok(page) => Err(StrategyError::PageFailed {
                url: url.clone(),
                message: page.error.unwrap_or_else(|| "unknown error".to_string()),
            }),
            Err(e) => Err(StrategyError::PageFailed {
                url: url.clone(),
                message: e.to_string(),
            }),
        }
    }
}

/// Fetches pages one at a time, reusing a single session
pub struct Sequential {
    fetcher: Arc<dyn PageFetcher>,
    session_id: String,
    options: RunOptions,
}

impl Sequential {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        session_id: impl Into<String>,
        markdown: MarkdownStrategy,
    ) -> Self {
        Self {
            fetcher,
            session_id: session_id.into(),
            options: RunOptions {
                cache: CacheMode::Enabled,
                markdown,
            },
        }
    }

    async fn crawl(&self, urls: &[String]) -> Vec<PageRecord> {
        let mut records = Vec::new();

        for url in urls {
            let result = self
                .fetcher
                .fetch(url, &self.options, Some(&self.session_id))
                .await;

            match result {
                Ok(page) if page.success => {
                    tracing::info!("Successfully crawled: {}", url);
                    tracing::info!("Markdown length: {}", page.content.chars().count());
                    records.push(PageRecord::new(url.clone(), page.content));
                }
                Ok(page) => {
                    tracing::info!(
                        "Failed: {} - Error: {}",
                        url,
                        page.error.as_deref().unwrap_or("unknown error")
                    );
                }
                Err(e) => {
                    tracing::warn!("Error crawling {}: {}", url, e);
                }
            }
        }

        records
    }
}

#[async_trait]
impl CrawlStrategy for Sequential {
    fn name(&self) -> &'static str {
        "Sequential"
    }

    async fn run(&self, urls: &[String]) -> Result<Document, StrategyError> {
        tracing::info!("=== Sequential Crawling with Session Reuse ===");

        start_fetcher(self.fetcher.as_ref()).await?;
        let records = self.crawl(urls).await;
        close_fetcher(self.fetcher.as_ref()).await;

        Ok(Document::Records(records))
    }
}

/// Fetches pages in fixed-size batches, all pages of a batch concurrently
///
/// Every fetch of a batch is launched before any is awaited and the next batch
/// starts only once the whole batch has settled, so at most `batch_size`
/// fetches are in flight.
pub struct ParallelBatched {
    fetcher: Arc<dyn PageFetcher>,
    batch_size: usize,
    session_prefix: String,
    options: RunOptions,
}

impl ParallelBatched {
    /// Creates the strategy; a `batch_size` of zero is treated as one
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        batch_size: usize,
        session_prefix: impl Into<String>,
        markdown: MarkdownStrategy,
    ) -> Self {
        Self {
            fetcher,
            batch_size: batch_size.max(1),
            session_prefix: session_prefix.into(),
            options: RunOptions {
                cache: CacheMode::Bypass,
                markdown,
            },
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Session identifier of the URL at `index` in the crawl list
    fn session_for(&self, index: usize) -> String {
        format!("{}_{}", self.session_prefix, index)
    }

    async fn crawl(&self, urls: &[String]) -> Vec<PageRecord> {
        let mut records = Vec::new();
        let mut success_count = 0usize;
        let mut fail_count = 0usize;

        for (batch_index, batch) in urls.chunks(self.batch_size).enumerate() {
            let offset = batch_index * self.batch_size;

            let fetches = batch.iter().enumerate().map(|(j, url)| {
                let session_id = self.session_for(offset + j);
                async move {
                    self.fetcher
                        .fetch(url, &self.options, Some(&session_id))
                        .await
                }
            });

            let results = join_all(fetches).await;

            for (url, result) in batch.iter().zip(results) {
                match result {
                    Ok(page) if page.success => {
                        tracing::info!("Successfully crawled: {}", url);
                        tracing::info!("Markdown length: {}", page.content.chars().count());
                        success_count += 1;
                        records.push(PageRecord::new(url.clone(), page.content));
                    }
                    Ok(page) => {
                        tracing::info!(
                            "Failed: {} - Error: {}",
                            url,
                            page.error.as_deref().unwrap_or("unknown error")
                        );
                        fail_count += 1;
                    }
                    Err(e) => {
                        tracing::warn!("Error crawling {}: {}", url, e);
                        fail_count += 1;
                    }
                }
            }
        }

        tracing::info!("Summary:");
        tracing::info!("  - Successfully crawled: {}", success_count);
        tracing::info!("  - Failed: {}", fail_count);

        records
    }
}

#[async_trait]
impl CrawlStrategy for ParallelBatched {
    fn name(&self) -> &'static str {
        "Parallel"
    }

    async fn run(&self, urls: &[String]) -> Result<Document, StrategyError> {
        tracing::info!("=== Parallel Crawling with Browser Reuse ===");

        start_fetcher(self.fetcher.as_ref()).await?;
        let records = self.crawl(urls).await;
        close_fetcher(self.fetcher.as_ref()).await;

        Ok(Document::Records(records))
    }
}
