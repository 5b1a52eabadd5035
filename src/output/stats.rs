//! Statistics for a discovery run

use crate::discovery::DiscoveryResult;
use std::collections::HashSet;

/// Discovery statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveryStatistics {
    /// Sitemaps returned by the locator
    pub located_sitemaps: usize,

    /// Sitemap documents in all trees (indexes and leaves)
    pub total_sitemaps: usize,

    /// Sitemap indexes expanded
    pub index_sitemaps: usize,

    /// Leaf sitemaps, ambiguous ones included
    pub leaf_sitemaps: usize,

    /// Leaves that could not be fetched or classified
    pub ambiguous_sitemaps: usize,

    /// Page URLs, duplicates included
    pub total_urls: usize,

    /// Distinct page URLs
    pub unique_urls: usize,

    /// Page URLs hosted outside the audited site
    pub offsite_urls: usize,

    /// Page URLs disallowed by robots.txt
    pub blocked_urls: usize,
}

impl DiscoveryStatistics {
    /// Computes statistics from a discovery result
    pub fn from_result(result: &DiscoveryResult) -> Self {
        let leaves = result.leaves();
        let unique: HashSet<&str> = result.urls.iter().map(String::as_str).collect();

        Self {
            located_sitemaps: result.references.len(),
            total_sitemaps: result.roots.iter().map(|r| r.sitemap_count()).sum(),
            index_sitemaps: result.roots.iter().map(|r| r.index_count()).sum(),
            leaf_sitemaps: leaves.len(),
            ambiguous_sitemaps: leaves.iter().filter(|l| l.is_ambiguous()).count(),
            total_urls: result.urls.len(),
            unique_urls: unique.len(),
            offsite_urls: result
                .urls
                .iter()
                .filter(|url| !result.origin.is_same_site(url))
                .count(),
            blocked_urls: result.blocked_urls.len(),
        }
    }

    /// Share of URLs that are repeats of an earlier URL, as a percentage
    pub fn duplicate_rate(&self) -> f64 {
        if self.total_urls == 0 {
            return 0.0;
        }
        ((self.total_urls - self.unique_urls) as f64 / self.total_urls as f64) * 100.0
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &DiscoveryStatistics) {
    println!("=== Sitemap Discovery Statistics ===\n");

    println!("Sitemaps:");
    println!("  Located: {}", stats.located_sitemaps);
    println!("  Fetched documents: {}", stats.total_sitemaps);
    println!("  Indexes: {}", stats.index_sitemaps);
    println!("  Leaves: {}", stats.leaf_sitemaps);
    println!("  Ambiguous: {}", stats.ambiguous_sitemaps);
    println!();

    println!("Page URLs:");
    println!("  Total: {}", stats.total_urls);
    println!(
        "  Unique: {} ({:.1}% duplicates)",
        stats.unique_urls,
        stats.duplicate_rate()
    );
    println!("  Off-site: {}", stats.offsite_urls);
    println!("  Blocked by robots.txt: {}", stats.blocked_urls);
}
