//! Incremental listing walker
//!
//! Drives one browser session over the infinite-scrolling search results,
//! yielding every job exactly once, in rendering order. A cursor counts how
//! many result elements have been consumed; after each load step only the
//! slice beyond the cursor is extracted, so re-rendered earlier cards are
//! never revisited.

use crate::browser::{BrowserError, BrowserSession, DomNode};
use crate::harvest::extract;
use crate::model::Job;
use crate::Result;
use std::collections::VecDeque;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use url::Url;

/// Public job search endpoint
pub const SEARCH_URL: &str = "https://www.linkedin.com/jobs/search";

/// Container holding all rendered result cards
pub const RESULTS_LIST: &str = ".jobs-search__results-list";

/// One result card inside [`RESULTS_LIST`]
pub const RESULT_ITEM: &str = "li";

/// The "show more" control at the bottom of the listing
pub const SHOW_MORE_BUTTON: &str = ".infinite-scroller__show-more-button";

/// Environment flag: capture a screenshot when the walk dies unexpectedly
pub const SCREENSHOT_ENV: &str = "JOBHARVEST_SCREENSHOT_ON_FAILURE";

/// Builds the search URL for a location, optional keywords, and an optional
/// recency filter (seconds; negative disables it).
pub fn build_search_url(location: &str, keywords: &str, posted_within: i64) -> Url {
    let mut url = Url::parse(SEARCH_URL).expect("static base URL parses");
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("location", location);
        if posted_within >= 0 {
            query.append_pair("f_TPR", &posted_within.to_string());
        }
        if !keywords.is_empty() {
            query.append_pair("keywords", keywords);
        }
    }
    url
}

/// Walk behavior knobs
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// How long to poll for freshly rendered cards after a load step;
    /// rendering is asynchronous, so absence right after the step is normal
    pub poll_timeout: Duration,

    /// Interval between polls
    pub poll_interval: Duration,

    /// Pause after a load step that rendered nothing new
    pub stall_pause: Duration,

    /// Consecutive empty load steps tolerated before giving up
    pub max_stalls: u32,

    /// Capture a screenshot before surfacing a session error
    pub screenshot_on_failure: bool,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_secs(6),
            poll_interval: Duration::from_millis(200),
            stall_pause: Duration::from_secs(1),
            max_stalls: 10,
            screenshot_on_failure: std::env::var_os(SCREENSHOT_ENV).is_some(),
        }
    }
}

/// Single-pass iterator over the jobs of one listing session.
///
/// The walk is non-restartable: once it returns `None` (listing exhausted
/// or stalled out) it stays finished. Abandoning it mid-stream is fine;
/// tearing down the browser session is the owner's business.
pub struct ListingWalker<B: BrowserSession> {
    browser: B,
    url: Url,
    config: WalkerConfig,
    cursor: usize,
    stalls: u32,
    harvested: usize,
    buffer: VecDeque<Job>,
    started: bool,
    done: bool,
}

impl<B: BrowserSession> ListingWalker<B> {
    pub fn new(browser: B, url: Url) -> Self {
        Self::with_config(browser, url, WalkerConfig::default())
    }

    pub fn with_config(browser: B, url: Url, config: WalkerConfig) -> Self {
        Self {
            browser,
            url,
            config,
            cursor: 0,
            stalls: 0,
            harvested: 0,
            buffer: VecDeque::new(),
            started: false,
            done: false,
        }
    }

    /// Count of listing elements consumed so far, extraction failures
    /// included. Monotonically non-decreasing.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// One walk cycle: navigate (first time) or load more, then collect the
    /// cards beyond the cursor. `Ok(false)` means the listing is exhausted.
    fn advance(&mut self) -> Result<bool> {
        if self.stalls >= self.config.max_stalls {
            tracing::info!("giving up after {} empty load steps", self.stalls);
            return Ok(false);
        }

        let is_load_step = self.started;
        if !self.started {
            tracing::info!("navigating to {}", self.url);
            self.browser.navigate(self.url.as_str())?;
            self.started = true;
        } else if !self.load_more()? {
            tracing::info!("no more content after {} jobs", self.harvested);
            return Ok(false);
        }

        let jobs = self.collect_new()?;
        if jobs.is_empty() {
            // the initial render is not a load step and doesn't count
            if is_load_step {
                self.stalls += 1;
                tracing::debug!(
                    "no new jobs rendered (stall {}/{})",
                    self.stalls,
                    self.config.max_stalls
                );
                thread::sleep(self.config.stall_pause);
            }
        } else {
            self.stalls = 0;
            self.harvested += jobs.len();
            tracing::info!("{} jobs so far", self.harvested);
            self.buffer.extend(jobs);
        }

        Ok(true)
    }

    /// Reveals more results: click the control, or scroll when it refuses
    /// the click. Scrolling to the top first works around pages where a
    /// direct scroll to the bottom does nothing. A missing control means
    /// there is no more content.
    fn load_more(&mut self) -> Result<bool> {
        let button = match self.browser.find_one(SHOW_MORE_BUTTON) {
            Ok(button) => button,
            Err(BrowserError::NotFound { .. }) => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        match button.click() {
            Ok(()) => Ok(true),
            Err(BrowserError::NotInteractable) => {
                self.browser.run_script("window.scrollTo(0, 0);")?;
                self.browser
                    .run_script("window.scrollTo(0, document.body.scrollHeight);")?;
                Ok(true)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Polls for cards beyond the cursor until some appear or the budget
    /// runs out; an empty result is a normal outcome, not an error.
    ///
    /// The cursor advances by the raw slice length, so cards that fail
    /// extraction are never revisited either.
    fn collect_new(&mut self) -> Result<Vec<Job>> {
        let deadline = Instant::now() + self.config.poll_timeout;

        loop {
            let cards = match self.browser.find_one(RESULTS_LIST) {
                Ok(list) => list.find_all(RESULT_ITEM)?,
                // the list itself may not have rendered yet
                Err(BrowserError::NotFound { .. }) => Vec::new(),
                Err(e) => return Err(e.into()),
            };

            if cards.len() > self.cursor {
                let fresh = &cards[self.cursor..];
                self.cursor += fresh.len();
                return Ok(fresh.iter().filter_map(extract::extract_job).collect());
            }

            if Instant::now() >= deadline {
                return Ok(Vec::new());
            }
            thread::sleep(self.config.poll_interval);
        }
    }

    fn capture_failure_screenshot(&self) {
        if !self.config.screenshot_on_failure {
            return;
        }
        let path = Path::new("screenshot.png");
        match self.browser.screenshot(path) {
            Ok(()) => tracing::info!("wrote diagnostic screenshot to {}", path.display()),
            Err(e) => tracing::warn!("diagnostic screenshot failed: {e}"),
        }
    }
}

impl<B: BrowserSession> Iterator for ListingWalker<B> {
    type Item = Result<Job>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(job) = self.buffer.pop_front() {
                return Some(Ok(job));
            }
            if self.done {
                return None;
            }
            match self.advance() {
                Ok(true) => {}
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    self.capture_failure_screenshot();
                    return Some(Err(e));
                }
            }
        }
    }
}
