//! Crawler coordinator - main orchestration logic
//!
//! For each target the coordinator:
//! - Resolves the URL list once (root URL, or the sitemap's pages)
//! - Runs an ordered chain of strategies, stopping at the first success
//! - Falls back to an empty document when every strategy fails
//! - Hands the document to the writer

use crate::config::Config;
use crate::crawler::fetcher::{HttpPageFetcher, PageFetcher};
use crate::crawler::sitemap::SitemapResolver;
use crate::crawler::strategy::{CrawlStrategy, ParallelBatched, Sequential, SinglePage};
use crate::crawler::target::{CrawlMode, CrawlTarget};
use crate::logging::TargetLogger;
use crate::output::{Document, DocumentWriter};
use crate::ScribeError;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::instrument::WithSubscriber;

/// Runs strategies in order and returns the first document produced
///
/// Every strategy receives the same `urls`. When all of them fail the empty
/// document is returned.
pub async fn run_strategies(strategies: &[Box<dyn CrawlStrategy>], urls: &[String]) -> Document {
    for (i, strategy) in strategies.iter().enumerate() {
        match strategy.run(urls).await {
            Ok(document) => return document,
            Err(e) => match strategies.get(i + 1) {
                Some(next) => tracing::warn!(
                    "{} crawling failed: {}. Trying {} crawling...",
                    strategy.name(),
                    e,
                    next.name()
                ),
                None => tracing::warn!("{} crawling failed: {}.", strategy.name(), e),
            },
        }
    }

    tracing::warn!("No crawl strategy succeeded, writing an empty document");
    Document::empty()
}

/// Main scraper coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    fetcher: Arc<dyn PageFetcher>,
    resolver: SitemapResolver,
    writer: DocumentWriter,
}

impl Coordinator {
    /// Creates a coordinator fetching pages over HTTP
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(ScribeError)` - The sitemap HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, ScribeError> {
        let fetcher = Arc::new(HttpPageFetcher::new(config.fetcher.clone()));
        Self::with_fetcher(config, fetcher)
    }

    /// Creates a coordinator around any page fetcher
    pub fn with_fetcher(
        config: Config,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Result<Self, ScribeError> {
        let resolver = SitemapResolver::new(&config.fetcher)?;
        let writer = DocumentWriter::new(&config.output.docs_dir);

        Ok(Self {
            config: Arc::new(config),
            fetcher,
            resolver,
            writer,
        })
    }

    /// Builds the strategy chain for a crawl mode, in fallback order
    pub fn strategies(&self, mode: CrawlMode) -> Vec<Box<dyn CrawlStrategy>> {
        let crawler = &self.config.crawler;

        match mode {
            CrawlMode::SinglePage => {
                vec![Box::new(SinglePage::new(self.fetcher.clone())) as Box<dyn CrawlStrategy>]
            }
            CrawlMode::AllPages => vec![
                Box::new(ParallelBatched::new(
                    self.fetcher.clone(),
                    crawler.batch_size,
                    crawler.parallel_session_prefix.clone(),
                    crawler.markdown,
                )) as Box<dyn CrawlStrategy>,
                Box::new(Sequential::new(
                    self.fetcher.clone(),
                    crawler.sequential_session.clone(),
                    crawler.markdown,
                )),
            ],
        }
    }

    /// Returns the URLs a target covers
    pub async fn discover(&self, target: &CrawlTarget) -> Vec<String> {
        match target.mode {
            CrawlMode::SinglePage => vec![target.url.clone()],
            CrawlMode::AllPages => self.resolver.resolve(&target.url).await,
        }
    }

    /// Crawls a target into a document without writing it
    pub async fn crawl(&self, target: &CrawlTarget) -> Document {
        let urls = self.discover(target).await;
        tracing::debug!("Crawling {} URLs for {}", urls.len(), target.url);
        run_strategies(&self.strategies(target.mode), &urls).await
    }

    /// Crawls a target and writes its document
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of the written Markdown file
    /// * `Err(ScribeError)` - The file could not be written
    pub async fn run(&self, target: &CrawlTarget) -> Result<PathBuf, ScribeError> {
        tracing::info!(
            "Now processing: {} to be saved to {}",
            target.url,
            target.filename
        );

        let document = self.crawl(target).await;
        let path = self.writer.write(&document, &target.filename)?;

        Ok(path)
    }

    /// Runs a target with all of its logging routed to `logger`
    pub async fn execute(
        &self,
        target: &CrawlTarget,
        logger: &TargetLogger,
    ) -> Result<PathBuf, ScribeError> {
        self.run(target)
            .with_subscriber(logger.dispatch().clone())
            .await
    }
}
