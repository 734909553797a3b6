/// Splits the positional URL argument into individual target URLs
///
/// Three forms are accepted:
///
/// 1. A JSON array of strings: `["https://a.com", "https://b.com"]`
/// 2. A comma-separated list: `https://a.com, https://b.com`
/// 3. A single URL
///
/// Anything that is not a JSON array of strings is treated as a comma list.
/// Entries are trimmed and empty entries dropped. Order and duplicates are
/// preserved.
///
/// # Examples
///
/// ```
/// use sumi_scribe::url::parse_url_argument;
///
/// let urls = parse_url_argument(r#"["https://a.com","https://b.com"]"#);
/// assert_eq!(urls, vec!["https://a.com", "https://b.com"]);
///
/// let urls = parse_url_argument("https://a.com, https://b.com");
/// assert_eq!(urls, vec!["https://a.com", "https://b.com"]);
/// ```
pub fn parse_url_argument(arg: &str) -> Vec<String> {
    let trimmed = arg.trim();

    if let Ok(urls) = serde_json::from_str::<Vec<String>>(trimmed) {
        return urls
            .into_iter()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .collect();
    }

    trimmed
        .split(',')
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(String::from)
        .collect()
}
