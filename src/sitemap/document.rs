//! Sitemap XML classification
//!
//! A fetched document is classified exactly once, by its root element:
//! `sitemapindex` with at least one `sitemap` entry, `urlset` with at least one
//! `url` entry, or anything else. Element names are matched by local name, so
//! namespace prefixes are ignored.

use quick_xml::events::{BytesText, Event};
use quick_xml::Reader;

const INDEX_ROOT: &str = "sitemapindex";
const INDEX_ENTRY: &str = "sitemap";
const URLSET_ROOT: &str = "urlset";
const URLSET_ENTRY: &str = "url";
const LOC: &str = "loc";

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapDocument {
    /// Sitemap index: one item per `sitemap` entry, in document order; `None`
    /// for an entry without a `loc`
    IndexDoc(Vec<Option<String>>),
    /// Leaf sitemap: `loc` of each `url` entry, in document order
    UrlSetDoc(Vec<String>),
    /// Neither shape; carries the root element name if there was one
    Unrecognized { root: Option<String> },
}

/// Parses and classifies sitemap XML
///
/// Every `sitemap` entry of an index yields exactly one item, so the index
/// keeps its entry count even when a `loc` is missing. A `url` entry without a
/// `loc` names no page and contributes nothing to a `UrlSetDoc`, though it
/// still makes the `urlset` recognised. Only the first `loc` of an entry is
/// used. A recognised root with no entries is `Unrecognized`.
///
/// # Errors
///
/// Returns the XML reader error for malformed markup.
///
/// # Examples
///
/// ```
/// use sitemap_scout::sitemap::{parse_document, SitemapDocument};
///
/// let xml = r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
///   <url><loc>https://example.com/</loc></url>
///   <url><loc>https://example.com/about</loc></url>
/// </urlset>"#;
///
/// assert_eq!(
///     parse_document(xml).unwrap(),
///     SitemapDocument::UrlSetDoc(vec![
///         "https://example.com/".to_string(),
///         "https://example.com/about".to_string(),
///     ])
/// );
/// ```
pub fn parse_document(xml: &str) -> Result<SitemapDocument, quick_xml::Error> {
    let xml = xml.trim_start_matches('\u{feff}').trim_start();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root: Option<String> = None;
    let mut entry_tag: Option<&'static str> = None;
    let mut entry_locs: Vec<Option<String>> = Vec::new();

    let mut depth = 0usize;
    let mut in_entry = false;
    let mut entry_loc: Option<String> = None;
    let mut loc_text: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                let name = element_name(e.local_name().as_ref());

                if root.is_none() {
                    entry_tag = entry_tag_for(&name);
                    root = Some(name);
                } else if depth == 2 && entry_tag == Some(name.as_str()) {
                    in_entry = true;
                    entry_loc = None;
                } else if depth == 3 && in_entry && name == LOC {
                    loc_text = Some(String::new());
                }
            }
            Event::Empty(e) => {
                let name = element_name(e.local_name().as_ref());

                if root.is_none() {
                    root = Some(name);
                    break;
                }
                if depth == 1 && entry_tag == Some(name.as_str()) {
                    entry_locs.push(None);
                }
            }
            Event::Text(e) => {
                if let Some(text) = loc_text.as_mut() {
                    text.push_str(&unescape_text(&e));
                }
            }
            Event::CData(e) => {
                if let Some(text) = loc_text.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(e) => {
                let name = element_name(e.local_name().as_ref());

                if depth == 3 && name == LOC {
                    if let Some(loc) = loc_text.take() {
                        let loc = loc.trim();
                        if !loc.is_empty() && entry_loc.is_none() {
                            entry_loc = Some(loc.to_string());
                        }
                    }
                } else if depth == 2 && in_entry {
                    in_entry = false;
                    entry_locs.push(entry_loc.take());
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let document = match root.as_deref() {
        Some(INDEX_ROOT) if !entry_locs.is_empty() => SitemapDocument::IndexDoc(entry_locs),
        Some(URLSET_ROOT) if !entry_locs.is_empty() => {
            SitemapDocument::UrlSetDoc(entry_locs.into_iter().flatten().collect())
        }
        _ => SitemapDocument::Unrecognized { root },
    };

    Ok(document)
}

fn element_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).into_owned()
}

fn entry_tag_for(root: &str) -> Option<&'static str> {
    match root {
        INDEX_ROOT => Some(INDEX_ENTRY),
        URLSET_ROOT => Some(URLSET_ENTRY),
        _ => None,
    }
}

/// Unescapes entity references, keeping the raw text if an entity is unknown
fn unescape_text(text: &BytesText<'_>) -> String {
    match text.unescape() {
        Ok(unescaped) => unescaped.into_owned(),
        Err(_) => String::from_utf8_lossy(text).into_owned(),
    }
}
