//! HTML to Markdown conversion
//!
//! The HTML is parsed with `scraper` to pick the region to convert, then the
//! region is handed to `htmd`.

use crate::crawler::fetcher::MarkdownStrategy;
use scraper::{Html, Selector};

/// Elements whose text never belongs in the Markdown output
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template", "iframe"];

/// Candidate main-content regions, most specific first
const MAIN_CONTENT_SELECTORS: &[&str] = &[
    "main",
    "article",
    "[role='main']",
    "#content",
    "#main",
    ".content",
];

/// Converts an HTML document to Markdown
///
/// # Arguments
///
/// * `html` - The HTML content to convert
/// * `strategy` - Which region of the document to keep
///
/// # Returns
///
/// * `Ok(String)` - Trimmed Markdown
/// * `Err(String)` - The converter rejected the document
///
/// # Example
///
/// ```no_run
/// use sumi_scribe::crawler::{html_to_markdown, MarkdownStrategy};
///
/// let html = "<html><body><h1>Hello</h1><p>World</p></body></html>";
/// let markdown = html_to_markdown(html, MarkdownStrategy::Default).unwrap();
/// assert!(markdown.contains("Hello"));
/// ```
pub fn html_to_markdown(html: &str, strategy: MarkdownStrategy) -> Result<String, String> {
    let region = select_region(html, strategy);

    let converter = htmd::HtmlToMarkdown::builder()
        .skip_tags(SKIPPED_TAGS.to_vec())
        .build();

    converter
        .convert(&region)
        .map(|markdown| markdown.trim().to_string())
        .map_err(|e| format!("Markdown conversion failed: {}", e))
}

/// Returns the outer HTML of the region to convert
fn select_region(html: &str, strategy: MarkdownStrategy) -> String {
    let document = Html::parse_document(html);

    let candidates: &[&str] = match strategy {
        MarkdownStrategy::Default => &[],
        MarkdownStrategy::MainContent => MAIN_CONTENT_SELECTORS,
    };

    candidates
        .iter()
        .chain(std::iter::once(&"body"))
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| document.select(&selector).next().map(|el| el.html()))
        .unwrap_or_else(|| html.to_string())
}
