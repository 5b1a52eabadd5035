//! Content fetching module
//!
//! Retrieves robots.txt and sitemap payloads. Every fetch is sequential and
//! self-contained: redirects are followed iteratively, gzip/deflate bodies are
//! decoded with a fall-back to the raw bytes, and payloads that remain binary
//! are retried through an external command-line client.

mod client;
mod decode;
mod external;
mod retry;
mod text;

pub use client::{build_http_client, ContentFetcher, FetchResult, FetchSource};
pub use decode::{
    bytes_to_text, decode_body, gunzip, has_gzip_magic, inflate, strip_bom, DecodeError,
};
pub use external::fetch_with_client;
pub use retry::RetryPolicy;
pub use text::{content_preview, is_textual, TEXTUAL_THRESHOLD, TEXT_SAMPLE_LIMIT};
