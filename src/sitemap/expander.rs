//! Recursive sitemap expansion

use crate::fetch::{content_preview, ContentFetcher, RetryPolicy};
use crate::sitemap::document::{parse_document, SitemapDocument};
use crate::sitemap::node::{Ambiguity, SitemapNode};
use crate::ScoutError;
use std::future::Future;
use std::pin::Pin;

/// Characters of unexpected content included in diagnostics
const DIAGNOSTIC_PREFIX_CHARS: usize = 200;

type NodeFuture<'a> = Pin<Box<dyn Future<Output = SitemapNode> + Send + 'a>>;

/// Expands sitemap URLs into discovery trees
///
/// Children of an index are expanded one at a time, in document order.
#[derive(Debug, Clone)]
pub struct SitemapExpander {
    fetcher: ContentFetcher,
    retry: RetryPolicy,
    max_index_depth: u32,
}

impl SitemapExpander {
    pub fn new(fetcher: ContentFetcher, retry: RetryPolicy, max_index_depth: u32) -> Self {
        Self {
            fetcher,
            retry,
            max_index_depth,
        }
    }

    /// Expands a sitemap URL into a node
    ///
    /// Never fails: a sitemap that cannot be fetched or classified becomes an
    /// ambiguous leaf with no URLs, and a failing child of an index only
    /// affects that child.
    pub async fn expand(&self, url: &str) -> SitemapNode {
        self.expand_at_depth(url.to_string(), 0).await
    }

    fn expand_at_depth(&self, url: String, depth: u32) -> NodeFuture<'_> {
        Box::pin(async move {
            tracing::debug!(url = %url, depth, "Expanding sitemap");

            let fetched = match self.fetcher.fetch_with_retry(&url, &self.retry).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    tracing::warn!(url = %url, "Failed to fetch sitemap: {}", e);
                    return SitemapNode::ambiguous(url, Ambiguity::FetchFailed(e.to_string()));
                }
            };

            let document =
                parse_document(&fetched.text).map_err(|e| ScoutError::XmlParse {
                    url: fetched.final_url.clone(),
                    message: e.to_string(),
                });

            match document {
                Ok(SitemapDocument::IndexDoc(children)) => {
                    if depth >= self.max_index_depth {
                        tracing::warn!(
                            url = %url,
                            depth,
                            "Sitemap index nested too deeply; not expanding"
                        );
                        return SitemapNode::ambiguous(
                            url,
                            Ambiguity::DepthExceeded {
                                depth: self.max_index_depth,
                            },
                        );
                    }

                    tracing::info!(
                        url = %url,
                        children = children.len(),
                        "Expanding sitemap index"
                    );

                    let mut nodes = Vec::with_capacity(children.len());
                    for (position, child) in children.into_iter().enumerate() {
                        let node = match child {
                            Some(child) => self.expand_at_depth(child, depth + 1).await,
                            None => {
                                tracing::warn!(
                                    url = %url,
                                    entry = position + 1,
                                    "Sitemap index entry has no <loc>"
                                );
                                SitemapNode::ambiguous(
                                    url.clone(),
                                    Ambiguity::MissingLoc {
                                        entry: position + 1,
                                    },
                                )
                            }
                        };
                        nodes.push(node);
                    }

                    SitemapNode::Index {
                        url,
                        children: nodes,
                    }
                }
                Ok(SitemapDocument::UrlSetDoc(urls)) => {
                    tracing::info!(url = %url, count = urls.len(), "Parsed sitemap");
                    SitemapNode::leaf(url, urls)
                }
                Ok(SitemapDocument::Unrecognized { root }) => {
                    tracing::warn!(
                        url = %url,
                        final_url = %fetched.final_url,
                        root = ?root,
                        prefix = %content_preview(&fetched.text, DIAGNOSTIC_PREFIX_CHARS),
                        "Unrecognized sitemap structure"
                    );
                    SitemapNode::ambiguous(url, Ambiguity::Unrecognized { root })
                }
                Err(error) => {
                    tracing::warn!(
                        url = %url,
                        final_url = %fetched.final_url,
                        prefix = %content_preview(&fetched.text, DIAGNOSTIC_PREFIX_CHARS),
                        "{}",
                        error
                    );
                    SitemapNode::ambiguous(url, Ambiguity::Malformed(error.to_string()))
                }
            }
        })
    }
}
