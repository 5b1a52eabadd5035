use serde::Deserialize;
use std::time::Duration;

/// Browser-like user agent; some hosts serve empty or blocked sitemaps to bots
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Main configuration structure for Sitemap-Scout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// HTTP fetching configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum number of redirect hops followed for a single fetch
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Command-line HTTP client used when the primary fetch yields binary content
    #[serde(rename = "external-client", default = "default_external_client")]
    pub external_client: Option<String>,
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The external client program, if enabled (an empty string disables it)
    pub fn external_client(&self) -> Option<&str> {
        self.external_client
            .as_deref()
            .map(str::trim)
            .filter(|program| !program.is_empty())
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_redirects: default_max_redirects(),
            external_client: default_external_client(),
        }
    }
}

/// Retry policy for sitemap fetches
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Attempt N waits N times this delay (milliseconds)
    #[serde(rename = "base-delay-ms", default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

impl RetryConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

/// Discovery behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryConfig {
    /// Maximum nesting of sitemap indexes below a located sitemap
    #[serde(rename = "max-index-depth", default = "default_max_index_depth")]
    pub max_index_depth: u32,

    /// Report sitemap URLs that robots.txt disallows
    #[serde(rename = "check-robots-rules", default = "default_check_robots_rules")]
    pub check_robots_rules: bool,

    /// Agent token used when matching robots.txt rules
    #[serde(rename = "robots-agent", default = "default_robots_agent")]
    pub robots_agent: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_index_depth: default_max_index_depth(),
            check_robots_rules: default_check_robots_rules(),
            robots_agent: default_robots_agent(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Line-delimited URL list consumed by the downstream crawler
    #[serde(rename = "url-list-path", default = "default_url_list_path")]
    pub url_list_path: String,

    /// Path to the markdown topology summary
    #[serde(rename = "summary-path", default = "default_summary_path")]
    pub summary_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            url_list_path: default_url_list_path(),
            summary_path: default_summary_path(),
        }
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    10
}

fn default_external_client() -> Option<String> {
    Some("curl".to_string())
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_max_index_depth() -> u32 {
    8
}

fn default_check_robots_rules() -> bool {
    true
}

fn default_robots_agent() -> String {
    "Googlebot".to_string()
}

fn default_url_list_path() -> String {
    "sitemap_urls.txt".to_string()
}

fn default_summary_path() -> String {
    "sitemap_summary.md".to_string()
}
