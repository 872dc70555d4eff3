//! In-memory browser serving canned HTML, for tests.

use super::{Browser, BrowserError, TabHandle};
use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

const BLANK: &str = "about:blank";
const EMPTY_PAGE: &str = "<html><head></head><body></body></html>";

/// Mock browser: pages by URL, per-tab history, links followed on click.
pub(crate) struct MockBrowser {
    state: Mutex<State>,
}

struct Tab {
    handle: TabHandle,
    history: Vec<String>,
}

#[derive(Default)]
struct State {
    pages: HashMap<String, String>,
    failing: HashSet<String>,
    faulty: HashSet<String>,
    tabs: Vec<Tab>,
    focused: Option<usize>,
    next_tab: u32,
    visits: Vec<String>,
    clicks: Vec<String>,
    tabs_closed: usize,
    switch_failures: usize,
}

impl State {
    fn focused(&self) -> Result<&Tab, BrowserError> {
        self.focused
            .and_then(|i| self.tabs.get(i))
            .ok_or_else(|| BrowserError::Driver("no such window".to_string()))
    }

    fn focused_mut(&mut self) -> Result<&mut Tab, BrowserError> {
        match self.focused {
            Some(i) if i < self.tabs.len() => Ok(&mut self.tabs[i]),
            _ => Err(BrowserError::Driver("no such window".to_string())),
        }
    }

    fn current_url(&self) -> Result<String, BrowserError> {
        let tab = self.focused()?;
        Ok(tab.history.last().cloned().unwrap_or_else(|| BLANK.to_string()))
    }

    fn current_html(&self) -> Result<String, BrowserError> {
        let url = self.current_url()?;
        if self.faulty.contains(&url) {
            return Err(BrowserError::Driver(format!("stale element reference on {}", url)));
        }
        Ok(self.pages.get(&url).cloned().unwrap_or_else(|| EMPTY_PAGE.to_string()))
    }

    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.visits.push(url.to_string());
        if self.failing.contains(url) {
            return Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_CONNECTION_REFUSED".to_string(),
            });
        }
        self.focused_mut()?.history.push(url.to_string());
        Ok(())
    }

    fn new_tab(&mut self) -> TabHandle {
        let handle = TabHandle::new(format!("tab-{}", self.next_tab));
        self.next_tab += 1;
        self.tabs.push(Tab { handle: handle.clone(), history: vec![BLANK.to_string()] });
        handle
    }
}

impl MockBrowser {
    /// Creates a browser with one blank, focused tab.
    pub(crate) fn new() -> Self {
        let mut state = State::default();
        state.new_tab();
        state.focused = Some(0);
        Self { state: Mutex::new(state) }
    }

    /// Registers the HTML served for `url`.
    pub(crate) fn with_page(self, url: &str, html: &str) -> Self {
        self.lock().pages.insert(url.to_string(), html.to_string());
        self
    }

    /// Puts the focused tab on `url` without recording a visit.
    pub(crate) fn starting_at(self, url: &str) -> Self {
        if let Ok(tab) = self.lock().focused_mut() {
            tab.history.push(url.to_string());
        }
        self
    }

    /// Makes every navigation to `url` fail.
    pub(crate) fn fail_navigation(&self, url: &str) {
        self.lock().failing.insert(url.to_string());
    }

    /// Makes the next `count` tab switches fail.
    pub(crate) fn fail_switches(&self, count: usize) {
        self.lock().switch_failures = count;
    }

    /// Makes reading `url`'s DOM raise a driver fault.
    pub(crate) fn fault_on(&self, url: &str) {
        self.lock().faulty.insert(url.to_string());
    }

    pub(crate) fn current_url(&self) -> String {
        self.lock().current_url().unwrap_or_else(|_| BLANK.to_string())
    }

    /// Every URL passed to `goto` or reached through a clicked link.
    pub(crate) fn visits(&self) -> Vec<String> {
        self.lock().visits.clone()
    }

    /// Selectors of every successful click.
    pub(crate) fn clicks(&self) -> Vec<String> {
        self.lock().clicks.clone()
    }

    pub(crate) fn tab_count(&self) -> usize {
        self.lock().tabs.len()
    }

    pub(crate) fn tabs_closed(&self) -> usize {
        self.lock().tabs_closed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn parse_selector(selector: &str) -> Result<Selector, BrowserError> {
    Selector::parse(selector)
        .map_err(|e| BrowserError::Driver(format!("invalid selector {}: {}", selector, e)))
}

fn is_in_page(href: &str) -> bool {
    let href = href.trim();
    href.is_empty() || href.starts_with('#') || href.starts_with("javascript:")
}

#[async_trait]
impl Browser for MockBrowser {
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        self.lock().navigate(url)
    }

    async fn wait_for(&self, selector: &str, _timeout: Duration) -> Result<bool, BrowserError> {
        let selector = parse_selector(selector)?;
        let html = self.lock().current_html()?;
        let document = Html::parse_document(&html);
        let found = document.select(&selector).next().is_some();
        Ok(found)
    }

    async fn page_source(&self) -> Result<String, BrowserError> {
        self.lock().current_html()
    }

    async fn click_first(&self, selector: &str, labels: &[&str]) -> Result<bool, BrowserError> {
        let parsed = parse_selector(selector)?;
        let mut state = self.lock();
        let base = state.current_url()?;
        let html = state.current_html()?;

        let target = {
            let document = Html::parse_document(&html);
            let hit = document.select(&parsed).find(|el| {
                let text = el.text().collect::<String>().to_lowercase();
                labels.is_empty() || labels.iter().any(|l| text.contains(l))
            });
            match hit {
                None => return Ok(false),
                // In-page toggles do not navigate.
                Some(el) => el.value().attr("href").filter(|href| !is_in_page(href)).map(|href| {
                    Url::parse(&base)
                        .and_then(|b| b.join(href))
                        .map(|u| u.to_string())
                        .unwrap_or_else(|_| href.to_string())
                }),
            }
        };

        state.clicks.push(selector.to_string());
        if let Some(url) = target {
            state.navigate(&url)?;
        }
        Ok(true)
    }

    async fn current_tab(&self) -> Result<TabHandle, BrowserError> {
        Ok(self.lock().focused()?.handle.clone())
    }

    async fn open_tab(&self) -> Result<TabHandle, BrowserError> {
        Ok(self.lock().new_tab())
    }

    async fn switch_to(&self, tab: &TabHandle) -> Result<(), BrowserError> {
        let mut state = self.lock();
        if state.switch_failures > 0 {
            state.switch_failures -= 1;
            return Err(BrowserError::Driver(format!("cannot switch to {}", tab)));
        }
        let index = state
            .tabs
            .iter()
            .position(|t| &t.handle == tab)
            .ok_or_else(|| BrowserError::Driver(format!("no such window: {}", tab)))?;
        state.focused = Some(index);
        Ok(())
    }

    async fn close_tab(&self) -> Result<(), BrowserError> {
        let mut state = self.lock();
        let index = state
            .focused
            .filter(|i| *i < state.tabs.len())
            .ok_or_else(|| BrowserError::Driver("no such window".to_string()))?;
        state.tabs.remove(index);
        state.focused = None;
        state.tabs_closed += 1;
        Ok(())
    }

    async fn back(&self) -> Result<(), BrowserError> {
        let mut state = self.lock();
        let tab = state.focused_mut()?;
        if tab.history.len() > 1 {
            tab.history.pop();
        }
        Ok(())
    }
}
