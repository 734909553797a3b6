//! Document types and output errors
//!
//! A crawl produces a [`Document`]: either one page's Markdown kept verbatim
//! or an ordered list of per-page records.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Invalid content shape: {0}")]
    InvalidContentShape(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// One successfully crawled page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    pub url: String,
    pub content: String,
}

impl PageRecord {
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: content.into(),
        }
    }
}

/// Aggregated result of a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Document {
    /// A single page's Markdown, written as-is
    PlainText(String),
    /// Pages in crawl order, written as headed sections
    Records(Vec<PageRecord>),
}

impl Document {
    /// The document written when nothing could be crawled
    pub fn empty() -> Self {
        Self::Records(Vec::new())
    }

    /// Number of pages the document holds
    pub fn page_count(&self) -> usize {
        match self {
            Self::PlainText(_) => 1,
            Self::Records(records) => records.len(),
        }
    }
}

/// Interprets untyped content as a document
///
/// | Value | Document |
/// |-------|----------|
/// | string | `PlainText` |
/// | array of objects | `Records` (`url` defaults to "No URL", `content` to "No Content") |
/// | anything else | `InvalidContentShape` |
impl TryFrom<Value> for Document {
    type Error = OutputError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(text) => Ok(Self::PlainText(text)),
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::Object(map) => Ok(PageRecord::new(
                        field_text(map.get("url"), "No URL"),
                        field_text(map.get("content"), "No Content"),
                    )),
                    other => Err(OutputError::InvalidContentShape(format!(
                        "item {} is {}, expected an object with url and content",
                        i,
                        kind(&other)
                    ))),
                })
                .collect::<OutputResult<Vec<_>>>()
                .map(Self::Records),
            other => Err(OutputError::InvalidContentShape(format!(
                "content is {}, expected a string or a list of records",
                kind(&other)
            ))),
        }
    }
}

fn field_text(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => default.to_string(),
        Some(other) => other.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
