use crate::url::domain::{comparable_host, extract_domain};
use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// Scheme and host (plus any non-default port) of the audited site
///
/// Always rendered without a trailing slash, so well-known paths are appended
/// directly: `{origin}/robots.txt`. Host comparison against other URLs ignores
/// a leading `www.`; request URLs keep the host exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SiteOrigin {
    scheme: String,
    host: String,
    serialized: String,
}

impl SiteOrigin {
    /// Derives the origin from an absolute HTTP(S) URL
    ///
    /// Path, query and fragment are discarded. A bare host such as
    /// `example.com` is treated as `https://example.com`.
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemap_scout::url::SiteOrigin;
    ///
    /// let origin = SiteOrigin::parse("https://www.Example.com/shop/?page=2").unwrap();
    /// assert_eq!(origin.as_str(), "https://www.example.com");
    /// assert_eq!(origin.join("/robots.txt"), "https://www.example.com/robots.txt");
    /// ```
    pub fn parse(input: &str) -> UrlResult<Self> {
        let trimmed = input.trim();
        let candidate = if trimmed.contains("://") {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        let url = Url::parse(&candidate).map_err(|e| UrlError::Parse(e.to_string()))?;
        Self::from_url(&url)
    }

    /// Derives the origin from an already-parsed URL
    pub fn from_url(url: &Url) -> UrlResult<Self> {
        let scheme = url.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS schemes are supported, got: {}",
                scheme
            )));
        }

        let host = extract_domain(url)
            .filter(|h| !h.is_empty())
            .ok_or(UrlError::MissingHost)?;

        let serialized = match url.port() {
            Some(port) => format!("{}://{}:{}", scheme, host, port),
            None => format!("{}://{}", scheme, host),
        };

        Ok(Self {
            scheme: scheme.to_string(),
            host,
            serialized,
        })
    }

    /// The origin as `scheme://host[:port]`, without a trailing slash
    pub fn as_str(&self) -> &str {
        &self.serialized
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Appends an absolute path to the origin
    pub fn join(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.serialized, path)
        } else {
            format!("{}/{}", self.serialized, path)
        }
    }

    /// URL of the site's robots.txt
    pub fn robots_url(&self) -> String {
        self.join("/robots.txt")
    }

    /// Returns true if `url` is hosted on this site, ignoring `www.` and case
    ///
    /// # Examples
    ///
    /// ```
    /// use sitemap_scout::url::SiteOrigin;
    ///
    /// let origin = SiteOrigin::parse("https://example.com").unwrap();
    /// assert!(origin.is_same_site("http://www.example.com/about"));
    /// assert!(!origin.is_same_site("https://cdn.example.net/a"));
    /// ```
    pub fn is_same_site(&self, url: &str) -> bool {
        Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(comparable_host))
            .map(|host| host == comparable_host(&self.host))
            .unwrap_or(false)
    }
}

impl fmt::Display for SiteOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialized)
    }
}
