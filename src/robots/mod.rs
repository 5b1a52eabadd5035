//! Robots.txt handling module
//!
//! This module locates a site's sitemaps. robots.txt is inspected for
//! `Sitemap:` declarations; when it cannot be fetched or declares nothing the
//! conventional well-known locations are used instead, so location never fails.
//! The parsed file is also kept for checking listed URLs against its rules.

mod locator;
mod parser;

pub use locator::{
    LocateOutcome, ReferenceSource, SitemapLocator, SitemapReference, PRIMARY_SITEMAP_PATH,
    SECONDARY_SITEMAP_PATH,
};
pub use parser::{extract_sitemap_directives, scan_sitemap_urls, ParsedRobots};

/// Checks if a URL is allowed by robots.txt
pub fn is_allowed(robots: &ParsedRobots, url: &str, user_agent: &str) -> bool {
    robots.is_allowed(url, user_agent)
}
