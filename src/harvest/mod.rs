//! The harvesting pipeline
//!
//! This module contains the core harvesting logic:
//! - Walking the infinite-scroll listing and extracting job cards
//! - Rate-limited detail fetching with bounded 429 retries
//! - Enriching records with detail-page fields
//! - Composing the walk, enrichment, and sink into one run

mod enricher;
mod extract;
mod fetcher;
mod pipeline;
mod rate_gate;
mod walker;

pub use enricher::DetailEnricher;
pub use extract::{apply_details, extract_job};
pub use fetcher::{FetchError, RetryingFetcher};
pub use pipeline::{Pipeline, RunStats};
pub use rate_gate::RateGate;
pub use walker::{
    build_search_url, ListingWalker, WalkerConfig, RESULTS_LIST, RESULT_ITEM, SCREENSHOT_ENV,
    SEARCH_URL, SHOW_MORE_BUTTON,
};
