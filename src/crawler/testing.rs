//! Scripted page fetcher for strategy and coordinator tests

use crate::crawler::fetcher::{FetchError, PageFetcher, PageResult, RunOptions};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

enum Scripted {
    Page(String),
    Failure(String),
    Error,
}

/// One recorded `fetch` call
#[derive(Debug, Clone)]
pub(crate) struct FetchCall {
    pub url: String,
    pub options: RunOptions,
    pub session: Option<String>,
}

/// Fetcher answering from a script; unscripted URLs succeed with `# <url>`
#[derive(Default)]
pub(crate) struct ScriptedFetcher {
    outcomes: HashMap<String, Scripted>,
    failing_starts: AtomicUsize,
    calls: Mutex<Vec<FetchCall>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    batch_starts: AtomicUsize,
    starts: AtomicUsize,
    closes: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, markdown: &str) -> Self {
        self.outcomes
            .insert(url.to_string(), Scripted::Page(markdown.to_string()));
        self
    }

    pub fn failure(mut self, url: &str, error: &str) -> Self {
        self.outcomes
            .insert(url.to_string(), Scripted::Failure(error.to_string()));
        self
    }

    pub fn error(mut self, url: &str) -> Self {
        self.outcomes.insert(url.to_string(), Scripted::Error);
        self
    }

    /// Makes the next `count` calls to `start` fail
    pub fn failing_starts(self, count: usize) -> Self {
        self.failing_starts.store(count, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Number of times a fetch started while no other fetch was in flight
    pub fn batches_observed(&self) -> usize {
        self.batch_starts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn start(&self) -> Result<(), FetchError> {
        self.starts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failing_starts.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failing_starts.store(remaining - 1, Ordering::SeqCst);
            return Err(FetchError::Launch("browser failed to launch".to_string()));
        }
        Ok(())
    }

    async fn fetch(
        &self,
        url: &str,
        options: &RunOptions,
        session_id: Option<&str>,
    ) -> Result<PageResult, FetchError> {
        self.calls.lock().unwrap().push(FetchCall {
            url: url.to_string(),
            options: *options,
            session: session_id.map(String::from),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        if now == 1 {
            self.batch_starts.fetch_add(1, Ordering::SeqCst);
        }
        self.peak.fetch_max(now, Ordering::SeqCst);

        // Let the other fetches of a batch start before this one settles
        tokio::task::yield_now().await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.outcomes.get(url) {
            Some(Scripted::Page(markdown)) => Ok(PageResult::succeeded(url, markdown.clone())),
            Some(Scripted::Failure(error)) => Ok(PageResult::failed(url, error.clone())),
            Some(Scripted::Error) => Err(FetchError::Launch(format!("page crashed: {}", url))),
            None => Ok(PageResult::succeeded(url, format!("# {}", url))),
        }
    }

    async fn close(&self) -> Result<(), FetchError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
