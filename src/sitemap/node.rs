//! Discovery tree types

use std::fmt;

/// Why a sitemap could not be classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ambiguity {
    /// The sitemap could not be fetched
    FetchFailed(String),
    /// The content is not well-formed XML; carries the parse error
    Malformed(String),
    /// Well-formed, but neither a populated `sitemapindex` nor `urlset`
    Unrecognized { root: Option<String> },
    /// A sitemap index nested beyond the configured depth
    DepthExceeded { depth: u32 },
    /// An index entry (1-based) without a `loc`; the node carries the index URL
    MissingLoc { entry: usize },
}

impl fmt::Display for Ambiguity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchFailed(error) => write!(f, "fetch failed: {}", error),
            Self::Malformed(error) => f.write_str(error),
            Self::Unrecognized { root: Some(root) } => {
                write!(f, "unrecognized structure (root <{}>)", root)
            }
            Self::Unrecognized { root: None } => write!(f, "unrecognized structure (no root element)"),
            Self::DepthExceeded { depth } => write!(f, "index nesting exceeds depth {}", depth),
            Self::MissingLoc { entry } => write!(f, "index entry {} has no <loc>", entry),
        }
    }
}

/// A node in the discovery tree
///
/// Every fetched sitemap becomes exactly one node. Sitemaps that cannot be
/// classified become leaves with no URLs and an [`Ambiguity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapNode {
    /// A sitemap index and its expanded children, in document order
    Index {
        url: String,
        children: Vec<SitemapNode>,
    },
    /// A leaf sitemap and its page URLs, in document order, duplicates kept
    Leaf {
        url: String,
        urls: Vec<String>,
        ambiguity: Option<Ambiguity>,
    },
}

impl SitemapNode {
    pub fn leaf(url: impl Into<String>, urls: Vec<String>) -> Self {
        Self::Leaf {
            url: url.into(),
            urls,
            ambiguity: None,
        }
    }

    pub fn ambiguous(url: impl Into<String>, reason: Ambiguity) -> Self {
        Self::Leaf {
            url: url.into(),
            urls: Vec::new(),
            ambiguity: Some(reason),
        }
    }

    /// The sitemap URL this node was expanded from
    pub fn url(&self) -> &str {
        match self {
            Self::Index { url, .. } | Self::Leaf { url, .. } => url,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Self::Index { .. })
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(
            self,
            Self::Leaf {
                ambiguity: Some(_),
                ..
            }
        )
    }

    pub fn ambiguity(&self) -> Option<&Ambiguity> {
        match self {
            Self::Leaf { ambiguity, .. } => ambiguity.as_ref(),
            Self::Index { .. } => None,
        }
    }

    /// Direct children of an index; empty for leaves
    pub fn children(&self) -> &[SitemapNode] {
        match self {
            Self::Index { children, .. } => children,
            Self::Leaf { .. } => &[],
        }
    }

    /// Page URLs of a leaf; empty for indexes
    pub fn page_urls(&self) -> &[String] {
        match self {
            Self::Leaf { urls, .. } => urls,
            Self::Index { .. } => &[],
        }
    }

    /// All leaves below (or at) this node, depth-first in document order
    pub fn leaves(&self) -> Vec<&SitemapNode> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a SitemapNode>) {
        match self {
            Self::Index { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
            Self::Leaf { .. } => out.push(self),
        }
    }

    /// All page URLs below this node, in order, duplicates kept
    pub fn flatten(&self) -> Vec<String> {
        self.leaves()
            .into_iter()
            .flat_map(|leaf| leaf.page_urls().iter().cloned())
            .collect()
    }

    /// Number of sitemap documents in this subtree (this node included)
    pub fn sitemap_count(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(SitemapNode::sitemap_count)
            .sum::<usize>()
    }

    /// Number of index nodes in this subtree
    pub fn index_count(&self) -> usize {
        match self {
            Self::Index { children, .. } => {
                1 + children.iter().map(SitemapNode::index_count).sum::<usize>()
            }
            Self::Leaf { .. } => 0,
        }
    }
}
