//! Markdown summary generation
//!
//! This module generates a human-readable markdown summary of a discovery run,
//! including the sitemap topology, per-sitemap URL counts, ambiguous sitemaps
//! and URLs blocked by robots.txt.

use crate::discovery::DiscoveryResult;
use crate::output::stats::DiscoveryStatistics;
use crate::output::traits::{OutputError, OutputHandler, OutputResult};
use crate::sitemap::SitemapNode;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Blocked URLs listed before the remainder is elided
const MAX_LISTED_BLOCKED: usize = 50;

/// Writes a markdown summary of `result` to `output_path`
///
/// # Arguments
///
/// * `result` - The discovery result
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(result: &DiscoveryResult, output_path: &Path) -> OutputResult<()> {
    let generated_at = chrono::Utc::now().to_rfc3339();
    let markdown = format_markdown_summary(result, &generated_at);

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(output_path).map_err(|source| OutputError::Write {
        path: output_path.display().to_string(),
        source,
    })?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a discovery result as markdown
///
/// # Arguments
///
/// * `result` - The discovery result
/// * `generated_at` - Timestamp shown in the header
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_summary(result: &DiscoveryResult, generated_at: &str) -> String {
    let stats = DiscoveryStatistics::from_result(result);
    let mut md = String::new();

    md.push_str("# Sitemap Discovery Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Site**: {}\n", result.origin));
    md.push_str(&format!("- **Generated**: {}\n\n", generated_at));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!(
        "- **Located Sitemaps**: {}\n",
        stats.located_sitemaps
    ));
    md.push_str(&format!(
        "- **Sitemap Documents**: {} ({} indexes, {} leaves)\n",
        stats.total_sitemaps, stats.index_sitemaps, stats.leaf_sitemaps
    ));
    md.push_str(&format!(
        "- **Ambiguous Sitemaps**: {}\n",
        stats.ambiguous_sitemaps
    ));
    md.push_str(&format!("- **Total URLs**: {}\n", stats.total_urls));
    md.push_str(&format!("- **Unique URLs**: {}\n", stats.unique_urls));
    md.push_str(&format!("- **Off-site URLs**: {}\n", stats.offsite_urls));
    md.push_str(&format!(
        "- **Blocked by robots.txt**: {}\n\n",
        stats.blocked_urls
    ));

    md.push_str("## Located Sitemaps\n\n");
    if result.references.is_empty() {
        md.push_str("None\n\n");
    } else {
        md.push_str("| Sitemap | Source |\n");
        md.push_str("|---------|--------|\n");
        for reference in &result.references {
            md.push_str(&format!(
                "| {} | {:?} |\n",
                reference.url(),
                reference.source()
            ));
        }
        md.push('\n');
    }

    if !result.roots.is_empty() {
        md.push_str("## Topology\n\n");
        for root in &result.roots {
            write_tree(&mut md, root, 0);
        }
        md.push('\n');
    }

    let leaves = result.leaves();
    if !leaves.is_empty() {
        md.push_str("## Leaf Sitemaps\n\n");
        md.push_str("| Sitemap | URLs |\n");
        md.push_str("|---------|------|\n");
        for leaf in &leaves {
            md.push_str(&format!("| {} | {} |\n", leaf.url(), leaf.page_urls().len()));
        }
        md.push('\n');
    }

    let ambiguous = result.ambiguous();
    if !ambiguous.is_empty() {
        md.push_str("## Ambiguous Sitemaps\n\n");
        md.push_str("| Sitemap | Reason |\n");
        md.push_str("|---------|--------|\n");
        for leaf in ambiguous {
            if let Some(reason) = leaf.ambiguity() {
                md.push_str(&format!("| {} | {} |\n", leaf.url(), reason));
            }
        }
        md.push('\n');
    }

    if !result.blocked_urls.is_empty() {
        md.push_str("## Blocked by robots.txt\n\n");
        for url in result.blocked_urls.iter().take(MAX_LISTED_BLOCKED) {
            md.push_str(&format!("- {}\n", url));
        }
        if result.blocked_urls.len() > MAX_LISTED_BLOCKED {
            md.push_str(&format!(
                "\n... and {} more\n\n",
                result.blocked_urls.len() - MAX_LISTED_BLOCKED
            ));
        } else {
            md.push('\n');
        }
    }

    md
}

/// Renders a node and its children as a nested markdown list
fn write_tree(md: &mut String, node: &SitemapNode, depth: usize) {
    let indent = "  ".repeat(depth);
    match node {
        SitemapNode::Index { url, children } => {
            md.push_str(&format!(
                "{}- {} (index, {} children)\n",
                indent,
                url,
                children.len()
            ));
            for child in children {
                write_tree(md, child, depth + 1);
            }
        }
        SitemapNode::Leaf {
            url,
            ambiguity: Some(reason),
            ..
        } => {
            md.push_str(&format!("{}- {} (ambiguous: {})\n", indent, url, reason));
        }
        SitemapNode::Leaf { url, urls, .. } => {
            md.push_str(&format!("{}- {} ({} URLs)\n", indent, url, urls.len()));
        }
    }
}

/// Writes the markdown summary of a discovery run
#[derive(Debug, Clone)]
pub struct MarkdownOutput {
    path: PathBuf,
}

impl MarkdownOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl OutputHandler for MarkdownOutput {
    fn name(&self) -> &str {
        "markdown summary"
    }

    fn write(&self, result: &DiscoveryResult) -> OutputResult<()> {
        generate_markdown_summary(result, &self.path)
    }
}
