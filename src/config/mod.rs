//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files.
//!
//! # Example
//!
//! ```no_run
//! use jobharvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Harvesting for location: {}", config.search.location);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BrowserConfig, Config, FetcherConfig, OutputConfig, OutputFormat, SearchConfig};

// Re-export parser functions
pub use parser::load_config;
