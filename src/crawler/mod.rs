//! Crawler module for turning sites into Markdown documents
//!
//! This module contains the core crawling logic, including:
//! - Sitemap discovery
//! - The page fetcher abstraction and its HTTP implementation
//! - HTML to Markdown conversion
//! - Single-page, sequential and parallel crawl strategies
//! - Orchestration with strategy fallback

mod coordinator;
mod fetcher;
mod parser;
mod sitemap;
mod strategy;
mod target;

#[cfg(test)]
mod testing;

pub use coordinator::{run_strategies, Coordinator};
pub use fetcher::{
    build_http_client, CacheMode, FetchError, HttpPageFetcher, MarkdownStrategy, PageFetcher,
    PageResult, RunOptions,
};
pub use parser::html_to_markdown;
pub use sitemap::{parse_sitemap_locs, SitemapError, SitemapResolver, SITEMAP_NS};
pub use strategy::{CrawlStrategy, ParallelBatched, Sequential, SinglePage, StrategyError};
pub use target::{CrawlMode, CrawlTarget};

pub use crate::output::{Document, PageRecord};
