use crate::crawler::MarkdownStrategy;
use serde::Deserialize;

/// Main configuration structure for Sumi-Scribe
///
/// Every section and key is optional; a missing config file is equivalent to
/// `Config::default()`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetcher: FetcherConfig,
    pub crawler: CrawlerConfig,
    pub output: OutputConfig,
}

/// Page fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// User agent sent with every request (sitemap and pages)
    pub user_agent: String,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Log every request and conversion at debug level
    pub verbose: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("sumi-scribe/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            verbose: false,
        }
    }
}

/// Crawl strategy configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Number of pages fetched concurrently by the parallel strategy
    pub batch_size: usize,

    /// Session shared by every page of a sequential crawl
    pub sequential_session: String,

    /// Prefix of the per-slot sessions used by a parallel crawl
    pub parallel_session_prefix: String,

    /// How page HTML is turned into Markdown for multi-page crawls
    pub markdown: MarkdownStrategy,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            batch_size: 3,
            sequential_session: "session1".to_string(),
            parallel_session_prefix: "parallel_session".to_string(),
            markdown: MarkdownStrategy::Default,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory receiving the Markdown files
    pub docs_dir: String,

    /// Directory receiving the per-target log files
    pub logs_dir: String,

    /// File name used when none can be derived from the target URL
    pub default_filename: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            docs_dir: "docs".to_string(),
            logs_dir: "logs".to_string(),
            default_filename: "output.md".to_string(),
        }
    }
}
