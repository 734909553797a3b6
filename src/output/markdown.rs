//! Markdown file writer
//!
//! Documents are written to `<output_dir>/<filename>`. Plain text is written
//! verbatim; records become one `## <url>` section each, separated by `---`.

use crate::output::traits::{Document, OutputResult};
use serde_json::Value;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Formats a document as Markdown
///
/// # Example
///
/// ```
/// use sumi_scribe::output::{format_document, Document, PageRecord};
///
/// let document = Document::Records(vec![PageRecord::new("https://example.com/a", "Body")]);
/// assert_eq!(format_document(&document), "## https://example.com/a\n\nBody\n\n---\n\n");
/// ```
pub fn format_document(document: &Document) -> String {
    match document {
        Document::PlainText(text) => text.clone(),
        Document::Records(records) => {
            let mut md = String::new();
            for record in records {
                md.push_str(&format!("## {}\n\n", record.url));
                md.push_str(&format!("{}\n\n", record.content));
                md.push_str("---\n\n");
            }
            md
        }
    }
}

/// Writes documents into a fixed output directory
#[derive(Debug, Clone)]
pub struct DocumentWriter {
    output_dir: PathBuf,
}

impl DocumentWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Writes a document, replacing any existing file
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of the written file
    /// * `Err(OutputError)` - The directory or file could not be written
    pub fn write(&self, document: &Document, filename: &str) -> OutputResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join(filename);
        let markdown = format_document(document);

        let mut file = File::create(&path)?;
        file.write_all(markdown.as_bytes())?;

        tracing::info!(
            "File is written to {} ({} pages)",
            path.display(),
            document.page_count()
        );

        Ok(path)
    }

    /// Writes untyped content; nothing is written if its shape is invalid
    pub fn write_value(&self, content: Value, filename: &str) -> OutputResult<PathBuf> {
        let document = Document::try_from(content)?;
        self.write(&document, filename)
    }
}
