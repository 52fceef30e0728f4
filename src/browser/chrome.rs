//! Headless Chrome backend for the browser boundary

use super::{BrowserError, BrowserResult, BrowserSession, DomNode};
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use std::path::Path;
use std::sync::Arc;

/// One Chrome tab driven over the DevTools protocol.
///
/// The browser process lives as long as the session; dropping the session
/// tears the whole browser down.
pub struct ChromeSession {
    // kept alive for the tab's sake
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSession {
    /// Launches a Chrome instance and opens a fresh tab.
    pub fn launch(headless: bool) -> BrowserResult<Self> {
        let options = LaunchOptions::default_builder()
            .headless(headless)
            .build()
            .map_err(|e| BrowserError::Session(e.to_string()))?;
        let browser = Browser::new(options).map_err(|e| BrowserError::Session(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| BrowserError::Session(e.to_string()))?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }
}

impl BrowserSession for ChromeSession {
    type Node<'a> = Element<'a> where Self: 'a;

    fn navigate(&self, url: &str) -> BrowserResult<()> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| BrowserError::Session(e.to_string()))?;
        Ok(())
    }

    fn find_one(&self, selector: &str) -> BrowserResult<Element<'_>> {
        // the protocol reports every resolution failure the same way, so a
        // failed lookup is treated as "not there"
        self.tab
            .find_element(selector)
            .map_err(|_| BrowserError::NotFound {
                selector: selector.to_string(),
            })
    }

    fn run_script(&self, js: &str) -> BrowserResult<()> {
        self.tab
            .evaluate(js, false)
            .map_err(|e| BrowserError::Session(e.to_string()))?;
        Ok(())
    }

    fn screenshot(&self, path: &Path) -> BrowserResult<()> {
        let png = self
            .tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| BrowserError::Session(e.to_string()))?;
        std::fs::write(path, png).map_err(|e| BrowserError::Session(e.to_string()))
    }
}

impl<'a> DomNode for Element<'a> {
    fn find_one(&self, selector: &str) -> BrowserResult<Self> {
        self.find_element(selector)
            .map_err(|_| BrowserError::NotFound {
                selector: selector.to_string(),
            })
    }

    fn find_all(&self, selector: &str) -> BrowserResult<Vec<Self>> {
        self.find_elements(selector)
            .map_err(|_| BrowserError::NotFound {
                selector: selector.to_string(),
            })
    }

    fn text(&self) -> BrowserResult<String> {
        self.get_inner_text()
            .map_err(|e| BrowserError::Session(e.to_string()))
    }

    fn attr(&self, name: &str) -> BrowserResult<Option<String>> {
        let attributes = self
            .get_attributes()
            .map_err(|e| BrowserError::Session(e.to_string()))?;
        let Some(attributes) = attributes else {
            return Ok(None);
        };
        // the protocol hands attributes back as a flat name/value list
        Ok(attributes
            .chunks_exact(2)
            .find(|pair| pair[0] == name)
            .map(|pair| pair[1].clone()))
    }

    fn click(&self) -> BrowserResult<()> {
        // a click refused by the page (covered, zero-sized, detached) comes
        // back as a protocol error; callers get the scroll fallback
        Element::click(self)
            .map(|_| ())
            .map_err(|_| BrowserError::NotInteractable)
    }
}
