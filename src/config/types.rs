use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub search: SearchConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    pub output: OutputConfig,
}

/// What to search for
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Country, state or city, e.g. "Germany" or "Munich, Bavaria, Germany"
    pub location: String,

    /// Search keywords; empty searches for all jobs
    #[serde(default)]
    pub keywords: String,

    /// Only include jobs posted within this many seconds; a negative value
    /// disables the filter
    #[serde(rename = "posted-within", default = "default_posted_within")]
    pub posted_within: i64,
}

fn default_posted_within() -> i64 {
    -1
}

/// Detail-fetch behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Requests allowed per rolling second
    #[serde(rename = "requests-per-second")]
    pub requests_per_second: u32,

    /// How many times a throttled (HTTP 429) request is retried
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Whether records are enriched with their detail page at all
    pub enrich: bool,

    /// Upper bound on concurrently running enrichments
    #[serde(rename = "max-inflight")]
    pub max_inflight: usize,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            requests_per_second: 1,
            max_retries: 5,
            enrich: true,
            max_inflight: 8,
        }
    }
}

/// Browser session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self { headless: true }
    }
}

/// Where records end up
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Directory for JSONL batches (jsonl format)
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Path to the SQLite database file (sqlite format)
    #[serde(rename = "database-path", default = "default_database_path")]
    pub database_path: String,
}

fn default_directory() -> String {
    "data".to_string()
}

fn default_database_path() -> String {
    "jobs.db".to_string()
}

/// Supported sink formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jsonl,
    Sqlite,
}
