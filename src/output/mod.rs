//! Output module for persisting crawl results
//!
//! This module handles:
//! - The aggregated document produced by a crawl
//! - Formatting documents as Markdown
//! - Writing them under the output directory

mod markdown;
mod traits;

pub use markdown::{format_document, DocumentWriter};
pub use traits::{Document, OutputError, OutputResult, PageRecord};
