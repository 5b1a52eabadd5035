//! Robots.txt parser implementation
//!
//! Extracts `Sitemap:` declarations and answers allow/deny questions for the
//! audit of listed URLs. Rule matching is delegated to the robotstxt crate.

use regex::bytes::Regex;
use robotstxt::DefaultMatcher;
use std::sync::OnceLock;

const SITEMAP_PREFIX: &str = "sitemap:";

/// Parsed robots.txt data
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content
    content: String,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Returns the raw robots.txt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Sitemap URLs declared in the file, in file order
    pub fn sitemaps(&self) -> Vec<String> {
        extract_sitemap_directives(&self.content)
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// Empty content allows everything.
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }
}

/// Extracts `Sitemap:` declarations from robots.txt text
///
/// A declaration is any line whose trimmed, case-insensitive prefix is
/// `sitemap:`; the rest of the line (trimmed) is the URL. File order is kept
/// and duplicates are not removed.
///
/// # Examples
///
/// ```
/// use sitemap_scout::robots::extract_sitemap_directives;
///
/// let robots = "User-agent: *\nSITEMAP: https://example.com/a.xml\n  sitemap:https://example.com/b.xml";
/// assert_eq!(
///     extract_sitemap_directives(robots),
///     vec!["https://example.com/a.xml", "https://example.com/b.xml"]
/// );
/// ```
pub fn extract_sitemap_directives(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let trimmed = line.trim();
            let prefix = trimmed.get(..SITEMAP_PREFIX.len())?;
            if !prefix.eq_ignore_ascii_case(SITEMAP_PREFIX) {
                return None;
            }

            let url = trimmed[SITEMAP_PREFIX.len()..].trim();
            (!url.is_empty()).then(|| url.to_string())
        })
        .collect()
}

fn sitemap_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"(?i-u)sitemap:[ \t]*(https?://[A-Za-z0-9\-._~:/?#\[\]@!$&'()*+,;=%]+)")
                .ok()
        })
        .as_ref()
}

/// Scans raw, possibly binary content for `Sitemap: <url>` declarations
///
/// Used when the robots.txt payload fails the text heuristic. Matches are
/// found anywhere in the bytes, so surrounding binary noise is tolerated.
pub fn scan_sitemap_urls(raw: &[u8]) -> Vec<String> {
    let Some(pattern) = sitemap_pattern() else {
        return Vec::new();
    };

    pattern
        .captures_iter(raw)
        .filter_map(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
        .collect()
}
