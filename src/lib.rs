//! Jobharvest: a rate-limited job-listing harvester
//!
//! This crate walks LinkedIn's public, infinitely-scrolling job search
//! listing through a browser session, extracts one record per job card, and
//! optionally enriches every record with its detail page through a
//! rate-limited, retrying HTTP fetcher.

pub mod browser;
pub mod config;
pub mod harvest;
pub mod model;
pub mod sink;

use thiserror::Error;

/// Main error type for harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] browser::BrowserError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] harvest::FetchError),

    #[error("Sink error: {0}")]
    Sink(#[from] sink::SinkError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{
    build_search_url, DetailEnricher, ListingWalker, Pipeline, RateGate, RetryingFetcher,
};
pub use model::{Company, Job, Location};
