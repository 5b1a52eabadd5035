//! HTTP content fetcher
//!
//! This module handles every HTTP request made during discovery, including:
//! - Building the HTTP client with a browser user agent
//! - Manual redirect following with a hop limit
//! - gzip/deflate decoding with fall-back-to-raw on failure
//! - External client fallback for payloads that stay binary
//! - Error classification

use crate::config::FetcherConfig;
use crate::fetch::decode::{bytes_to_text, decode_body, strip_bom};
use crate::fetch::external::fetch_with_client;
use crate::fetch::retry::RetryPolicy;
use crate::fetch::text::{content_preview, is_textual};
use crate::{Result, ScoutError};
use reqwest::header::{ACCEPT_ENCODING, CONTENT_ENCODING, LOCATION};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Encodings advertised on every request; decoding is done by hand
const ACCEPTED_ENCODINGS: &str = "gzip, deflate";

/// Where the returned content came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    /// The HTTP client
    Primary,
    /// The external command-line client
    External,
}

/// Result of a successful fetch
///
/// Created per fetch and discarded once parsed.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Body bytes after content decoding (raw as received if decoding failed)
    pub raw_bytes: Vec<u8>,

    /// Body decoded as UTF-8 (lossy, BOM stripped)
    pub text: String,

    /// Final URL after redirects
    pub final_url: String,

    /// `content-encoding` header of the final response
    pub content_encoding: Option<String>,

    /// HTTP status code of the final response
    pub status_code: u16,

    /// Which retrieval path produced the content
    pub source: FetchSource,
}

impl FetchResult {
    fn new(
        final_url: String,
        status_code: u16,
        body: Vec<u8>,
        content_encoding: Option<String>,
        source: FetchSource,
    ) -> Self {
        let raw_bytes = decode_body(body, content_encoding.as_deref());
        let text = bytes_to_text(&raw_bytes);
        Self {
            raw_bytes,
            text,
            final_url,
            content_encoding,
            status_code,
            source,
        }
    }

    /// Returns true if the content passes the text heuristic
    ///
    /// A leading UTF-8 BOM is not counted, matching `text`.
    pub fn is_textual(&self) -> bool {
        is_textual(strip_bom(&self.raw_bytes))
    }
}

/// Builds an HTTP client for sitemap retrieval
///
/// Redirects are not followed automatically, and automatic decompression is
/// off so that decoding failures can fall back to the raw payload.
pub fn build_http_client(config: &FetcherConfig) -> std::result::Result<Client, reqwest::Error> {
    let timeout = config.timeout();

    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::none())
        .gzip(false)
        .build()
}

/// Retrieves URL content over HTTP(S)
///
/// Holds no state between calls besides the connection pool.
#[derive(Debug, Clone)]
pub struct ContentFetcher {
    client: Client,
    config: FetcherConfig,
}

impl ContentFetcher {
    /// Creates a fetcher from its configuration
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = build_http_client(config)?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Fetches a URL, falling back to the external client for binary payloads
    ///
    /// # Request Flow
    ///
    /// 1. GET with `Accept-Encoding: gzip, deflate`
    /// 2. Follow 3xx responses carrying a `Location` header, up to
    ///    `max-redirects` hops
    /// 3. Fail on any other non-2xx status
    /// 4. Decode gzip/deflate bodies; keep raw bytes if decoding fails
    /// 5. If the result is not textual, try the external client and prefer
    ///    its output when that is textual
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Connection/DNS failure | `Network` |
    /// | Timeout | `Timeout` |
    /// | Non-2xx, non-redirect | `HttpStatus` |
    /// | Redirect chain too long | `TooManyRedirects` |
    ///
    /// Decompression failures alone never fail the fetch.
    pub async fn fetch(&self, url: &str) -> Result<FetchResult> {
        let primary = self.fetch_primary(url).await?;
        if primary.is_textual() {
            return Ok(primary);
        }

        tracing::debug!(
            url = %primary.final_url,
            len = primary.raw_bytes.len(),
            "Fetched content is not textual"
        );

        match self.fetch_external(&primary.final_url).await {
            Some(external) => Ok(external),
            None => Ok(primary),
        }
    }

    /// Fetches a URL, retrying any failure according to `policy`
    pub async fn fetch_with_retry(&self, url: &str, policy: &RetryPolicy) -> Result<FetchResult> {
        policy.run(url, move || self.fetch(url)).await
    }

    /// Fetches a URL with the HTTP client only
    pub async fn fetch_primary(&self, url: &str) -> Result<FetchResult> {
        let mut current = Url::parse(url)?;

        for hop in 0..=self.config.max_redirects {
            let response = self
                .client
                .get(current.clone())
                .header(ACCEPT_ENCODING, ACCEPTED_ENCODINGS)
                .send()
                .await
                .map_err(|e| classify_error(current.as_str(), e))?;

            let status = response.status();

            if status.is_redirection() {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);

                if let Some(location) = location {
                    let next = current.join(&location)?;
                    tracing::debug!(
                        from = %current,
                        to = %next,
                        hop = hop + 1,
                        "Following redirect"
                    );
                    current = next;
                    continue;
                }
            }

            if !status.is_success() {
                return Err(ScoutError::HttpStatus {
                    url: current.to_string(),
                    status: status.as_u16(),
                });
            }

            let content_encoding = response
                .headers()
                .get(CONTENT_ENCODING)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            let body = response
                .bytes()
                .await
                .map_err(|e| classify_error(current.as_str(), e))?;

            return Ok(FetchResult::new(
                current.to_string(),
                status.as_u16(),
                body.to_vec(),
                content_encoding,
                FetchSource::Primary,
            ));
        }

        Err(ScoutError::TooManyRedirects {
            url: url.to_string(),
            hops: self.config.max_redirects,
        })
    }

    /// Retrieves the URL with the external client; `None` unless the result is textual
    async fn fetch_external(&self, url: &str) -> Option<FetchResult> {
        let program = self.config.external_client()?;

        match fetch_with_client(program, url, &self.config.user_agent, self.config.timeout()).await
        {
            Ok(stdout) => {
                let result =
                    FetchResult::new(url.to_string(), 200, stdout, None, FetchSource::External);
                if result.is_textual() {
                    tracing::info!(url, program, "Recovered textual content via external client");
                    Some(result)
                } else {
                    tracing::debug!(
                        url,
                        prefix = %content_preview(&result.text, 80),
                        "External client output is not textual either"
                    );
                    None
                }
            }
            Err(e) => {
                tracing::warn!(url, program, "External client fallback failed: {}", e);
                None
            }
        }
    }
}

/// Maps a reqwest error onto the crate's error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> ScoutError {
    if error.is_timeout() {
        ScoutError::Timeout {
            url: url.to_string(),
        }
    } else {
        ScoutError::Network {
            url: url.to_string(),
            source: error,
        }
    }
}
