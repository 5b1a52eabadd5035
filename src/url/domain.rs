use url::Url;

/// Extracts the domain from a URL
///
/// Retrieves the host portion of a URL and converts it to lowercase.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemap_scout::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns the host in the form used for same-site comparison
///
/// The host is lowercased and a leading `www.` is dropped. This form is only
/// ever compared, never used to build request URLs.
///
/// # Examples
///
/// ```
/// use sitemap_scout::url::comparable_host;
///
/// assert_eq!(comparable_host("WWW.Example.com"), "example.com");
/// assert_eq!(comparable_host("blog.example.com"), "blog.example.com");
/// ```
pub fn comparable_host(host: &str) -> String {
    let lower = host.to_lowercase();
    match lower.strip_prefix("www.") {
        Some(stripped) if !stripped.is_empty() => stripped.to_string(),
        _ => lower,
    }
}
