//! WebDriver-backed browser using thirtyfour (chromedriver/geckodriver).

use super::{Browser, BrowserError, TabHandle};
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::RngExt;
use std::time::Duration;
use thirtyfour::prelude::*;
use thirtyfour::{ChromiumLikeCapabilities, WindowHandle};
use tracing::{debug, info, trace};

const POLL_INTERVAL: Duration = Duration::from_millis(250);
const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Chrome flags for a desktop-sized, less automation-looking session.
const CHROME_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--window-size=1920,1080",
    "--lang=en-US,en;q=0.9",
];

/// Real browser session driven over the WebDriver protocol.
pub struct WebDriverBrowser {
    driver: WebDriver,
    settle_ms: u64,
    settle_jitter_ms: u64,
}

impl WebDriverBrowser {
    /// Starts a Chrome session on the configured WebDriver endpoint.
    pub async fn connect(config: &Config) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if config.headless {
            caps.add_arg("--headless=new").context("Failed to set headless mode")?;
        }
        for arg in CHROME_ARGS {
            caps.add_arg(arg).with_context(|| format!("Failed to set browser flag {}", arg))?;
        }

        info!("Connecting to WebDriver at {}", config.webdriver_url);
        let driver = WebDriver::new(config.webdriver_url.as_str(), caps)
            .await
            .with_context(|| format!("Failed to start session at {}", config.webdriver_url))?;

        driver
            .set_page_load_timeout(PAGE_LOAD_TIMEOUT)
            .await
            .context("Failed to set page load timeout")?;

        Ok(Self {
            driver,
            settle_ms: config.settle_ms,
            settle_jitter_ms: config.settle_jitter_ms,
        })
    }

    /// Ends the session and closes the browser.
    pub async fn quit(self) -> Result<()> {
        self.driver.quit().await.context("Failed to close browser session")
    }

    /// Pauses so late-rendering content can appear.
    async fn settle(&self) {
        if self.settle_ms == 0 {
            return;
        }

        let jitter = if self.settle_jitter_ms > 0 {
            rand::rng().random_range(0..=self.settle_jitter_ms)
        } else {
            0
        };

        let total = self.settle_ms + jitter;
        debug!("Settling {}ms", total);
        tokio::time::sleep(Duration::from_millis(total)).await;
    }
}

fn fault(e: WebDriverError) -> BrowserError {
    BrowserError::Driver(e.to_string())
}

#[async_trait]
impl Browser for WebDriverBrowser {
    async fn goto(&self, url: &str) -> Result<(), BrowserError> {
        debug!("GET {}", url);
        self.driver.goto(url).await.map_err(|e| BrowserError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        self.settle().await;
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<bool, BrowserError> {
        let found = self
            .driver
            .query(By::Css(selector))
            .wait(timeout, POLL_INTERVAL)
            .exists()
            .await
            .map_err(fault)?;

        if !found {
            debug!("Timed out after {:?} waiting for {}", timeout, selector);
        }
        Ok(found)
    }

    async fn page_source(&self) -> Result<String, BrowserError> {
        self.driver.source().await.map_err(fault)
    }

    async fn click_first(&self, selector: &str, labels: &[&str]) -> Result<bool, BrowserError> {
        let elements = self.driver.find_all(By::Css(selector)).await.map_err(fault)?;

        for element in elements {
            if !labels.is_empty() {
                let text = match element.text().await {
                    Ok(text) => text.to_lowercase(),
                    Err(e) => {
                        trace!("Could not read text of {} candidate: {}", selector, e);
                        continue;
                    }
                };
                if !labels.iter().any(|l| text.contains(l)) {
                    continue;
                }
            }

            if let Err(e) = element.scroll_into_view().await {
                trace!("Could not scroll {} into view: {}", selector, e);
            }
            if let Err(e) = element.click().await {
                // Overlays intercept native clicks; a script click bypasses them.
                debug!("Native click on {} failed ({}), using script click", selector, e);
                let arg = element.to_json().map_err(fault)?;
                self.driver
                    .execute("arguments[0].click();", vec![arg])
                    .await
                    .map_err(fault)?;
            }

            self.settle().await;
            return Ok(true);
        }

        Ok(false)
    }

    async fn current_tab(&self) -> Result<TabHandle, BrowserError> {
        let handle = self.driver.window().await.map_err(fault)?;
        Ok(TabHandle::new(handle.to_string()))
    }

    async fn open_tab(&self) -> Result<TabHandle, BrowserError> {
        let handle = self.driver.new_tab().await.map_err(fault)?;
        Ok(TabHandle::new(handle.to_string()))
    }

    async fn switch_to(&self, tab: &TabHandle) -> Result<(), BrowserError> {
        let handle = WindowHandle::from(tab.as_str().to_string());
        self.driver.switch_to_window(handle).await.map_err(fault)
    }

    async fn close_tab(&self) -> Result<(), BrowserError> {
        self.driver.close_window().await.map_err(fault)
    }

    async fn back(&self) -> Result<(), BrowserError> {
        self.driver.back().await.map_err(fault)?;
        self.settle().await;
        Ok(())
    }
}
