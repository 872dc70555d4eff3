//! Browser abstraction: page loads, DOM waits, clicks and tab handling.

pub mod scoped;
pub mod webdriver;

#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

pub use scoped::{follow_and_return, in_detail_tab};
pub use webdriver::WebDriverBrowser;

/// Failures surfaced by a [`Browser`].
#[derive(Debug, Error)]
pub enum BrowserError {
    /// A page could not be loaded.
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    /// Any other driver-level fault (stale session, closed window, protocol error).
    #[error("browser driver fault: {0}")]
    Driver(String),
}

impl BrowserError {
    /// Returns true for page-load failures.
    pub fn is_navigation(&self) -> bool {
        matches!(self, BrowserError::Navigation { .. })
    }
}

/// Opaque identifier of a browser tab.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TabHandle(String);

impl TabHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TabHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait for browser operations - enables mocking for tests.
///
/// Every call acts on the currently focused tab. Extraction works on
/// [`Browser::page_source`] snapshots, so element handles never leak out of
/// an implementation.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Loads a URL in the current tab.
    async fn goto(&self, url: &str) -> Result<(), BrowserError>;

    /// Waits until an element matching `selector` is present.
    ///
    /// Returns `Ok(false)` when the timeout elapses first.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<bool, BrowserError>;

    /// Returns the serialized DOM of the current page.
    async fn page_source(&self) -> Result<String, BrowserError>;

    /// Clicks the first element matching `selector` whose text contains one of
    /// `labels` (lowercase). An empty `labels` slice accepts any element.
    ///
    /// Returns whether something was clicked.
    async fn click_first(&self, selector: &str, labels: &[&str]) -> Result<bool, BrowserError>;

    /// Returns the handle of the focused tab.
    async fn current_tab(&self) -> Result<TabHandle, BrowserError>;

    /// Opens a new blank tab without focusing it.
    async fn open_tab(&self) -> Result<TabHandle, BrowserError>;

    /// Focuses a tab.
    async fn switch_to(&self, tab: &TabHandle) -> Result<(), BrowserError>;

    /// Closes the focused tab. Focus must be moved explicitly afterwards.
    async fn close_tab(&self) -> Result<(), BrowserError>;

    /// Navigates back in the current tab's history.
    async fn back(&self) -> Result<(), BrowserError>;
}
