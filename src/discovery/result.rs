use crate::robots::SitemapReference;
use crate::sitemap::SitemapNode;
use crate::url::SiteOrigin;

/// Outcome of one discovery run
///
/// Owned by the caller; nothing is retained between runs.
#[derive(Debug, Clone)]
pub struct DiscoveryResult {
    /// The audited site
    pub origin: SiteOrigin,

    /// Sitemaps returned by the locator, in order
    pub references: Vec<SitemapReference>,

    /// One expanded tree per located sitemap, same order as `references`
    pub roots: Vec<SitemapNode>,

    /// Every page URL across all leaves, in order, duplicates kept
    pub urls: Vec<String>,

    /// Listed URLs that robots.txt disallows for the configured agent
    pub blocked_urls: Vec<String>,
}

impl DiscoveryResult {
    /// Builds a result from expanded roots, flattening their page URLs
    pub fn new(
        origin: SiteOrigin,
        references: Vec<SitemapReference>,
        roots: Vec<SitemapNode>,
    ) -> Self {
        let urls = roots.iter().flat_map(SitemapNode::flatten).collect();
        Self {
            origin,
            references,
            roots,
            urls,
            blocked_urls: Vec::new(),
        }
    }

    /// All leaves across every root, in order
    pub fn leaves(&self) -> Vec<&SitemapNode> {
        self.roots.iter().flat_map(SitemapNode::leaves).collect()
    }

    /// Leaves that could not be fetched or classified
    pub fn ambiguous(&self) -> Vec<&SitemapNode> {
        self.leaves()
            .into_iter()
            .filter(|leaf| leaf.is_ambiguous())
            .collect()
    }

    /// Returns true if no page URLs were discovered
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
