//! URL handling module for Sumi-Scribe
//!
//! This module turns the command-line URL argument into crawl targets and
//! derives the per-site names used for output and log files.

mod arguments;
mod normalize;

pub use arguments::parse_url_argument;
pub use normalize::{filename_for_url, sitemap_location};

/// Derives the output file name for a URL, falling back to `default` when the
/// URL has no usable host
///
/// # Examples
///
/// ```
/// use sumi_scribe::url::filename_or_default;
///
/// assert_eq!(filename_or_default("https://www.example.com/docs", "output.md"), "example_com.md");
/// assert_eq!(filename_or_default("not a url", "output.md"), "output.md");
/// ```
pub fn filename_or_default(url: &str, default: &str) -> String {
    match filename_for_url(url) {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("Cannot derive file name from {}: {}", url, e);
            default.to_string()
        }
    }
}
