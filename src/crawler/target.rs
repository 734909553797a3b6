use crate::url::filename_or_default;

/// How much of a site a crawl covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlMode {
    /// Only the root URL
    SinglePage,
    /// Every page listed in the site's sitemap
    AllPages,
}

impl CrawlMode {
    pub fn from_all_pages_flag(get_all_pages: bool) -> Self {
        if get_all_pages {
            Self::AllPages
        } else {
            Self::SinglePage
        }
    }
}

/// One site to crawl and where its Markdown goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// Root URL of the site
    pub url: String,
    pub mode: CrawlMode,
    /// File name inside the output directory
    pub filename: String,
}

impl CrawlTarget {
    pub fn new(url: impl Into<String>, mode: CrawlMode, filename: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mode,
            filename: filename.into(),
        }
    }

    /// Creates a target whose file name is derived from its URL
    pub fn from_url(url: &str, mode: CrawlMode, default_filename: &str) -> Self {
        Self::new(url, mode, filename_or_default(url, default_filename))
    }
}
