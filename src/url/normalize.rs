use crate::UrlError;
use url::Url;

/// Derives a Markdown file name from a site URL
///
/// # Naming Steps
///
/// 1. Parse the URL; reject if malformed or not HTTP(S)
/// 2. Take the host, with `:port` appended when the port is explicit
/// 3. Remove a leading `www.`
/// 4. Replace every character outside `[A-Za-z0-9_]` with `_`
/// 5. Append `.md`
///
/// # Examples
///
/// ```
/// use sumi_scribe::url::filename_for_url;
///
/// let name = filename_for_url("https://www.docs.example.com/guide/").unwrap();
/// assert_eq!(name, "docs_example_com.md");
/// ```
pub fn filename_for_url(url_str: &str) -> Result<String, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    let host = url.host_str().ok_or(UrlError::MissingHost)?;
    let mut netloc = host.to_lowercase();
    if let Some(port) = url.port() {
        netloc.push(':');
        netloc.push_str(&port.to_string());
    }

    let netloc = netloc.strip_prefix("www.").unwrap_or(&netloc);

    let stem: String = netloc
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    Ok(format!("{}.md", stem))
}

/// Returns the sitemap location for a site root
///
/// All trailing slashes are stripped before `/sitemap.xml` is appended.
///
/// # Examples
///
/// ```
/// use sumi_scribe::url::sitemap_location;
///
/// assert_eq!(sitemap_location("https://example.com/"), "https://example.com/sitemap.xml");
/// assert_eq!(
///     sitemap_location("https://example.com/docs"),
///     "https://example.com/docs/sitemap.xml"
/// );
/// ```
pub fn sitemap_location(root_url: &str) -> String {
    format!("{}/sitemap.xml", root_url.trim_end_matches('/'))
}
