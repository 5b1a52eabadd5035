//! Sitemap expansion module
//!
//! Fetches sitemap documents, classifies each as a sitemap index or a leaf
//! URL set, and recursively expands indexes into a tree of [`SitemapNode`]s.
//! Expansion degrades to partial results instead of failing.

mod document;
mod expander;
mod node;

pub use document::{parse_document, SitemapDocument};
pub use expander::SitemapExpander;
pub use node::{Ambiguity, SitemapNode};
