//! Sitemap location via robots.txt and conventional paths

use crate::fetch::{content_preview, ContentFetcher};
use crate::robots::parser::{extract_sitemap_directives, scan_sitemap_urls, ParsedRobots};
use crate::url::SiteOrigin;
use std::fmt;

/// Conventional primary sitemap location
pub const PRIMARY_SITEMAP_PATH: &str = "/sitemap.xml";

/// Conventional secondary sitemap location
pub const SECONDARY_SITEMAP_PATH: &str = "/sitemap_index.xml";

/// How a sitemap reference was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceSource {
    /// A `Sitemap:` line in robots.txt
    Robots,
    /// A pattern match in binary robots.txt content
    RobotsScan,
    /// A conventional well-known path
    Conventional,
}

/// A URL believed to point to a sitemap or sitemap index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SitemapReference {
    url: String,
    source: ReferenceSource,
}

impl SitemapReference {
    pub fn new(url: impl Into<String>, source: ReferenceSource) -> Self {
        Self {
            url: url.into(),
            source,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn source(&self) -> ReferenceSource {
        self.source
    }
}

impl fmt::Display for SitemapReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// Everything learned from inspecting a site's robots.txt
#[derive(Debug, Clone)]
pub struct LocateOutcome {
    /// Candidate sitemaps, never empty
    pub references: Vec<SitemapReference>,

    /// Parsed robots.txt, when it was fetched and textual
    pub robots: Option<ParsedRobots>,
}

impl LocateOutcome {
    pub fn urls(&self) -> Vec<String> {
        self.references.iter().map(|r| r.url().to_string()).collect()
    }
}

/// Determines candidate sitemap URLs for a site
#[derive(Debug, Clone)]
pub struct SitemapLocator {
    fetcher: ContentFetcher,
}

impl SitemapLocator {
    pub fn new(fetcher: ContentFetcher) -> Self {
        Self { fetcher }
    }

    /// Returns the site's candidate sitemaps in declaration order
    ///
    /// Never fails and never returns an empty list.
    pub async fn locate(&self, origin: &SiteOrigin) -> Vec<SitemapReference> {
        self.inspect(origin).await.references
    }

    /// Locates sitemaps and keeps the parsed robots.txt for later rule checks
    ///
    /// # Fallbacks
    ///
    /// | robots.txt | Result |
    /// |------------|--------|
    /// | fetch failed | `/sitemap.xml`, `/sitemap_index.xml` |
    /// | fetched, no declarations | `/sitemap.xml` |
    /// | fetched, binary | declarations found by pattern scan |
    pub async fn inspect(&self, origin: &SiteOrigin) -> LocateOutcome {
        let robots_url = origin.robots_url();
        tracing::debug!(url = %robots_url, "Fetching robots.txt");

        let result = match self.fetcher.fetch(&robots_url).await {
            Ok(result) => result,
            Err(e) => {
                tracing::info!(
                    url = %robots_url,
                    "robots.txt unavailable ({}); using conventional sitemap locations",
                    e
                );
                return LocateOutcome {
                    references: vec![
                        SitemapReference::new(
                            origin.join(PRIMARY_SITEMAP_PATH),
                            ReferenceSource::Conventional,
                        ),
                        SitemapReference::new(
                            origin.join(SECONDARY_SITEMAP_PATH),
                            ReferenceSource::Conventional,
                        ),
                    ],
                    robots: None,
                };
            }
        };

        let (references, robots) = if result.is_textual() {
            let references = extract_sitemap_directives(&result.text)
                .into_iter()
                .map(|url| SitemapReference::new(url, ReferenceSource::Robots))
                .collect::<Vec<_>>();
            (references, Some(ParsedRobots::from_content(&result.text)))
        } else {
            tracing::warn!(
                url = %robots_url,
                prefix = %content_preview(&result.text, 200),
                "robots.txt is not textual; scanning raw content for sitemap declarations"
            );
            let references = scan_sitemap_urls(&result.raw_bytes)
                .into_iter()
                .map(|url| SitemapReference::new(url, ReferenceSource::RobotsScan))
                .collect::<Vec<_>>();
            (references, None)
        };

        if references.is_empty() {
            tracing::info!(
                url = %robots_url,
                "robots.txt declares no sitemaps; falling back to {}",
                PRIMARY_SITEMAP_PATH
            );
            return LocateOutcome {
                references: vec![SitemapReference::new(
                    origin.join(PRIMARY_SITEMAP_PATH),
                    ReferenceSource::Conventional,
                )],
                robots,
            };
        }

        tracing::info!(
            count = references.len(),
            "Found {} sitemap declaration(s) in robots.txt",
            references.len()
        );

        LocateOutcome { references, robots }
    }
}
