//! Discovery orchestration
//!
//! Runs the sequential pipeline for one site:
//! 1. Locate candidate sitemaps (robots.txt, then conventional paths)
//! 2. Expand each located sitemap into a tree, one at a time
//! 3. Flatten the page URLs and audit them against robots.txt rules

mod result;

pub use result::DiscoveryResult;

use crate::config::Config;
use crate::fetch::{ContentFetcher, RetryPolicy};
use crate::robots::{is_allowed, LocateOutcome, ParsedRobots, SitemapLocator};
use crate::sitemap::SitemapExpander;
use crate::url::SiteOrigin;
use crate::Result;
use std::collections::HashSet;

/// Discovery pipeline for a single configuration
pub struct Discoverer {
    config: Config,
    locator: SitemapLocator,
    expander: SitemapExpander,
}

impl Discoverer {
    /// Creates a discoverer; the configuration is fixed for its lifetime
    pub fn new(config: Config) -> Result<Self> {
        let fetcher = ContentFetcher::new(&config.fetcher)?;
        let locator = SitemapLocator::new(fetcher.clone());
        let expander = SitemapExpander::new(
            fetcher,
            RetryPolicy::from_config(&config.retry),
            config.discovery.max_index_depth,
        );

        Ok(Self {
            config,
            locator,
            expander,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Locates candidate sitemaps without expanding them
    pub async fn locate(&self, origin: &SiteOrigin) -> LocateOutcome {
        self.locator.inspect(origin).await
    }

    /// Runs a complete discovery for `origin`
    ///
    /// Never fails on network or parse problems; those surface as ambiguous
    /// leaves in the returned tree.
    pub async fn run(&self, origin: &SiteOrigin) -> DiscoveryResult {
        tracing::info!(origin = %origin, "Starting sitemap discovery");

        let outcome = self.locate(origin).await;

        let mut roots = Vec::with_capacity(outcome.references.len());
        for reference in &outcome.references {
            tracing::info!(url = %reference, source = ?reference.source(), "Expanding located sitemap");
            roots.push(self.expander.expand(reference.url()).await);
        }

        let mut result = DiscoveryResult::new(origin.clone(), outcome.references, roots);

        if self.config.discovery.check_robots_rules {
            if let Some(robots) = &outcome.robots {
                result.blocked_urls =
                    blocked_urls(robots, &result.urls, &self.config.discovery.robots_agent);
            }
        }

        let ambiguous = result.ambiguous().len();
        if ambiguous > 0 {
            tracing::warn!(ambiguous, "Some sitemaps could not be fetched or classified");
        }

        tracing::info!(
            urls = result.urls.len(),
            blocked = result.blocked_urls.len(),
            "Discovery finished"
        );

        result
    }
}

/// Listed URLs that robots.txt disallows, first occurrence order, no repeats
pub fn blocked_urls(robots: &ParsedRobots, urls: &[String], agent: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.iter()
        .filter(|url| seen.insert(*url))
        .filter(|url| !is_allowed(robots, url, agent))
        .cloned()
        .collect()
}

/// Runs a discovery for `origin` with the given configuration
///
/// # Errors
///
/// Fails only if the origin is not an HTTP(S) URL or the HTTP client cannot
/// be built.
///
/// # Example
///
/// ```no_run
/// use sitemap_scout::{discover, Config};
///
/// # async fn example() -> sitemap_scout::Result<()> {
/// let result = discover("https://example.com", Config::default()).await?;
/// for url in &result.urls {
///     println!("{}", url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn discover(origin: &str, config: Config) -> Result<DiscoveryResult> {
    let origin = SiteOrigin::parse(origin)?;
    let discoverer = Discoverer::new(config)?;
    Ok(discoverer.run(&origin).await)
}
