//! Browser-automation boundary
//!
//! The listing walker drives a live browser page through this trait pair.
//! All calls are synchronous: the walker owns the session and serializes
//! every interaction with it, so implementations never see concurrent DOM
//! queries. [`ChromeSession`] is the provided backend; tests substitute
//! their own implementations.

mod chrome;

pub use chrome::ChromeSession;

use std::path::Path;
use thiserror::Error;

/// Errors surfaced by a browser session
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("no element matches selector `{selector}`")]
    NotFound { selector: String },

    #[error("element is not interactable")]
    NotInteractable,

    #[error("browser session error: {0}")]
    Session(String),
}

/// Result type alias for browser operations
pub type BrowserResult<T> = std::result::Result<T, BrowserError>;

/// A DOM element owned by the browser session.
///
/// Nodes are ephemeral: they stay valid only until the page re-renders, and
/// reading them never mutates the page.
pub trait DomNode: Sized {
    /// First descendant matching a CSS selector.
    fn find_one(&self, selector: &str) -> BrowserResult<Self>;

    /// Every descendant matching a CSS selector, in document order.
    fn find_all(&self, selector: &str) -> BrowserResult<Vec<Self>>;

    /// Rendered text content.
    fn text(&self) -> BrowserResult<String>;

    /// Attribute value; `Ok(None)` when the attribute is absent.
    fn attr(&self, name: &str) -> BrowserResult<Option<String>>;

    /// Clicks the element. [`BrowserError::NotInteractable`] means it is
    /// present but cannot receive the click right now.
    fn click(&self) -> BrowserResult<()>;
}

/// A live browser page
pub trait BrowserSession {
    type Node<'a>: DomNode
    where
        Self: 'a;

    fn navigate(&self, url: &str) -> BrowserResult<()>;

    /// First element in the page matching a CSS selector.
    fn find_one(&self, selector: &str) -> BrowserResult<Self::Node<'_>>;

    /// Runs a JavaScript snippet in the page, discarding its result.
    fn run_script(&self, js: &str) -> BrowserResult<()>;

    /// Captures the current viewport as a PNG.
    fn screenshot(&self, path: &Path) -> BrowserResult<()>;
}
