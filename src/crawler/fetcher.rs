//! Page fetcher abstraction and its HTTP implementation
//!
//! Strategies only see the [`PageFetcher`] trait: start a session context,
//! fetch a URL as Markdown, close the context. [`HttpPageFetcher`] provides it
//! with reqwest:
//! - One base client per started context
//! - One cookie-keeping client per session identifier
//! - An in-memory Markdown cache honoured according to [`CacheMode`]

use crate::config::FetcherConfig;
use crate::crawler::parser::html_to_markdown;
use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use reqwest::{redirect::Policy, Client, ClientBuilder};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors raised by a page fetcher
///
/// A page that was reached but could not be turned into Markdown is not an
/// error; it is reported as a [`PageResult`] with `success == false`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Page fetcher has not been started")]
    NotStarted,

    #[error("Failed to launch fetch session: {0}")]
    Launch(String),

    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Whether the fetcher may answer from, and store into, its page cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    #[default]
    Enabled,
    /// Always hit the network and leave the cache untouched
    Bypass,
}

/// Which part of a page is converted to Markdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkdownStrategy {
    /// The whole `<body>`
    #[default]
    Default,
    /// The main content region (`main`, `article`, ...), falling back to the body
    MainContent,
}

/// Per-fetch options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunOptions {
    pub cache: CacheMode,
    pub markdown: MarkdownStrategy,
}

/// Outcome of fetching one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub url: String,
    pub content: String,
    pub success: bool,
    pub error: Option<String>,
}

impl PageResult {
    /// A page fetched and converted successfully
    pub fn succeeded(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: content.into(),
            success: true,
            error: None,
        }
    }

    /// A page that was reached but not converted
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: String::new(),
            success: false,
            error: Some(error.into()),
        }
    }
}

/// "Fetch page, get Markdown" capability used by every crawl strategy
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Opens the shared context (browser, connection pool, ...)
    async fn start(&self) -> Result<(), FetchError>;

    /// Fetches one page; `session_id` scopes context reuse across fetches
    async fn fetch(
        &self,
        url: &str,
        options: &RunOptions,
        session_id: Option<&str>,
    ) -> Result<PageResult, FetchError>;

    /// Tears down the context opened by [`PageFetcher::start`]
    async fn close(&self) -> Result<(), FetchError>;
}

/// Builds an HTTP client with the configured user agent and timeouts
///
/// # Example
///
/// ```no_run
/// use sumi_scribe::config::FetcherConfig;
/// use sumi_scribe::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    client_builder(config).build()
}

/// Builds a client that keeps cookies between requests of one session
fn build_session_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    client_builder(config).cookie_store(true).build()
}

fn client_builder(config: &FetcherConfig) -> ClientBuilder {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
}

/// State of a started HTTP fetcher
struct SessionPool {
    base: Client,
    sessions: HashMap<String, Client>,
    cache: HashMap<String, String>,
}

impl SessionPool {
    fn client_for(
        &mut self,
        session_id: Option<&str>,
        config: &FetcherConfig,
    ) -> Result<Client, FetchError> {
        let Some(id) = session_id else {
            return Ok(self.base.clone());
        };

        if let Some(client) = self.sessions.get(id) {
            return Ok(client.clone());
        }

        let client =
            build_session_client(config).map_err(|e| FetchError::Launch(e.to_string()))?;
        tracing::debug!("Opened session {}", id);
        self.sessions.insert(id.to_string(), client.clone());
        Ok(client)
    }
}

/// Page fetcher backed by plain HTTP requests
///
/// Pages are not rendered; JavaScript-only content is not visible to it.
pub struct HttpPageFetcher {
    config: FetcherConfig,
    state: Mutex<Option<SessionPool>>,
}

impl HttpPageFetcher {
    pub fn new(config: FetcherConfig) -> Self {
        Self {
            config,
            state: Mutex::new(None),
        }
    }

    /// Number of sessions opened since the last start
    pub async fn session_count(&self) -> usize {
        self.state
            .lock()
            .await
            .as_ref()
            .map_or(0, |pool| pool.sessions.len())
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn start(&self) -> Result<(), FetchError> {
        let base = build_http_client(&self.config).map_err(|e| FetchError::Launch(e.to_string()))?;

        let mut state = self.state.lock().await;
        if state.is_some() {
            tracing::debug!("Page fetcher restarted, dropping previous sessions");
        }
        *state = Some(SessionPool {
            base,
            sessions: HashMap::new(),
            cache: HashMap::new(),
        });

        Ok(())
    }

    async fn fetch(
        &self,
        url: &str,
        options: &RunOptions,
        session_id: Option<&str>,
    ) -> Result<PageResult, FetchError> {
        // The lock is released before the request goes out so that
        // concurrent fetches do not serialize on it.
        let client = {
            let mut state = self.state.lock().await;
            let pool = state.as_mut().ok_or(FetchError::NotStarted)?;

            if options.cache == CacheMode::Enabled {
                if let Some(markdown) = pool.cache.get(url) {
                    tracing::debug!("Cache hit for {}", url);
                    return Ok(PageResult::succeeded(url, markdown.clone()));
                }
            }

            pool.client_for(session_id, &self.config)?
        };

        if self.config.verbose {
            tracing::debug!("GET {} (session: {:?}, {:?})", url, session_id, options);
        }

        let mut request = client.get(url);
        if options.cache == CacheMode::Bypass {
            request = request.header(CACHE_CONTROL, "no-cache");
        }

        let response = request.send().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Ok(PageResult::failed(url, format!("HTTP {}", status)));
        }

        let body = response.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        let markdown = match html_to_markdown(&body, options.markdown) {
            Ok(markdown) => markdown,
            Err(e) => return Ok(PageResult::failed(url, e)),
        };

        if self.config.verbose {
            tracing::debug!(
                "Converted {} ({} bytes of HTML, {} bytes of Markdown)",
                url,
                body.len(),
                markdown.len()
            );
        }

        if options.cache == CacheMode::Enabled {
            if let Some(pool) = self.state.lock().await.as_mut() {
                pool.cache.insert(url.to_string(), markdown.clone());
            }
        }

        Ok(PageResult::succeeded(url, markdown))
    }

    async fn close(&self) -> Result<(), FetchError> {
        if let Some(pool) = self.state.lock().await.take() {
            tracing::debug!(
                "Closed page fetcher ({} sessions, {} cached pages)",
                pool.sessions.len(),
                pool.cache.len()
            );
        }
        Ok(())
    }
}
